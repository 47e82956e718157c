use anyhow::Result;
use clap::{value_parser, Arg, Command};
use nearby::constants::EARTH_RADIUS_KM;
use nearby::db::{get_db_pool, DatabaseConfig, PgStore, Store};
use nearby::services::locations::{self, LocationUpdate};
use nearby::services::profiles::{self, ProfileUpdate};
use nearby::utils::init_logging;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

const INTEREST_POOL: &[&str] = &[
    "hiking", "food", "museums", "surfing", "nightlife", "photography", "diving",
    "street-art", "architecture", "climbing", "coffee", "markets", "music", "cycling",
];

const NAME_POOL: &[&str] = &[
    "Ana", "Ben", "Chiara", "Dev", "Elif", "Femi", "Goran", "Hana", "Ines", "Jonas",
];

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("seed")
        .about("Insert demo travelers scattered around a coordinate")
        .arg(
            Arg::new("lat")
                .long("lat")
                .help("Centre latitude")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .required(true),
        )
        .arg(
            Arg::new("lon")
                .long("lon")
                .help("Centre longitude")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .required(true),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('n')
                .help("Number of travelers to create")
                .value_parser(value_parser!(usize))
                .default_value("25"),
        )
        .arg(
            Arg::new("radius-km")
                .long("radius-km")
                .help("Scatter radius around the centre")
                .value_parser(value_parser!(f64))
                .default_value("20"),
        )
        .arg(
            Arg::new("befriend")
                .long("befriend")
                .help("Existing traveler id that every seeded traveler mutually follows")
                .value_parser(value_parser!(Uuid)),
        )
        .get_matches();

    let lat = *matches.get_one::<f64>("lat").expect("required");
    let lon = *matches.get_one::<f64>("lon").expect("required");
    let count = *matches.get_one::<usize>("count").expect("has default");
    let radius_km = *matches.get_one::<f64>("radius-km").expect("has default");
    let befriend = matches.get_one::<Uuid>("befriend").copied();

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    let store = PgStore::new(pool);
    info!("Connected to database");

    let mut rng = rand::rng();
    for i in 0..count {
        let user_id = Uuid::new_v4();
        let name = NAME_POOL.choose(&mut rng).copied().unwrap_or("Traveler");
        let interest_count = rng.random_range(1..=4);
        let interests = INTEREST_POOL
            .choose_multiple(&mut rng, interest_count)
            .map(|t| t.to_string())
            .collect();

        profiles::upsert_profile(
            &store,
            user_id,
            &ProfileUpdate { display_name: format!("{} {}", name, i + 1), interests },
        )
        .await?;

        // Uniform over the disc: sqrt keeps density flat towards the rim
        let distance = radius_km * rng.random::<f64>().sqrt();
        let bearing = rng.random_range(0.0..std::f64::consts::TAU);
        let angular = distance / EARTH_RADIUS_KM;
        let seeded_lat = (lat + (angular * bearing.cos()).to_degrees()).clamp(-90.0, 90.0);
        let lon_scale = lat.to_radians().cos().max(0.01);
        let seeded_lon = lon + (angular * bearing.sin() / lon_scale).to_degrees();
        let seeded_lon = ((seeded_lon + 540.0) % 360.0) - 180.0;

        locations::update_location(
            &store,
            user_id,
            &LocationUpdate { latitude: seeded_lat, longitude: seeded_lon, city: None, country: None },
        )
        .await?;

        if let Some(friend) = befriend {
            store.follow(user_id, friend).await?;
            store.follow(friend, user_id).await?;
        }
    }

    info!("🌍 Seeded {} travelers within {} km of ({}, {})", count, radius_km, lat, lon);

    Ok(())
}
