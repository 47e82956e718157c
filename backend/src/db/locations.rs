use crate::geo::BoundingBox;
use crate::models::{LocatedTraveler, TravelerProfile, UserLocation};
use anyhow::Result;
use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub async fn upsert_location(
    pool: &PgPool,
    user_id: Uuid,
    latitude: f64,
    longitude: f64,
    city: Option<&str>,
    country: Option<&str>,
) -> Result<UserLocation> {
    let location = sqlx::query_as::<_, UserLocation>(
        r#"
        INSERT INTO user_locations (user_id, latitude, longitude, city, country, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT (user_id) DO UPDATE
        SET latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            city = EXCLUDED.city,
            country = EXCLUDED.country,
            updated_at = EXCLUDED.updated_at
        RETURNING user_id, latitude, longitude, city, country, updated_at
        "#,
    )
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(city)
    .bind(country)
    .fetch_one(pool)
    .await?;

    Ok(location)
}

pub async fn get_location(pool: &PgPool, user_id: Uuid) -> Result<Option<UserLocation>> {
    let location = sqlx::query_as::<_, UserLocation>(
        r#"
        SELECT user_id, latitude, longitude, city, country, updated_at
        FROM user_locations
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

#[derive(FromRow)]
struct LocatedTravelerRow {
    id: Uuid,
    display_name: String,
    interests: Vec<String>,
    last_active_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    city: Option<String>,
    country: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<LocatedTravelerRow> for LocatedTraveler {
    fn from(row: LocatedTravelerRow) -> Self {
        LocatedTraveler {
            location: UserLocation {
                user_id: row.id,
                latitude: row.latitude,
                longitude: row.longitude,
                city: row.city,
                country: row.country,
                updated_at: row.updated_at,
            },
            profile: TravelerProfile {
                id: row.id,
                display_name: row.display_name,
                interests: row.interests,
                last_active_at: row.last_active_at,
                created_at: row.created_at,
            },
        }
    }
}

pub async fn list_located_travelers(
    pool: &PgPool,
    exclude: Uuid,
    bounds: Option<BoundingBox>,
) -> Result<Vec<LocatedTraveler>> {
    let base = r#"
        SELECT t.id, t.display_name, t.interests, t.last_active_at, t.created_at,
               l.latitude, l.longitude, l.city, l.country, l.updated_at
        FROM user_locations l
        JOIN travelers t ON t.id = l.user_id
        WHERE t.id <> $1
    "#;

    let rows = match bounds {
        Some(bbox) => {
            let sql = format!(
                "{} AND l.latitude BETWEEN $2 AND $3 AND l.longitude BETWEEN $4 AND $5",
                base
            );
            sqlx::query_as::<_, LocatedTravelerRow>(&sql)
                .bind(exclude)
                .bind(bbox.min_lat)
                .bind(bbox.max_lat)
                .bind(bbox.min_lon)
                .bind(bbox.max_lon)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query_as::<_, LocatedTravelerRow>(base)
                .bind(exclude)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows.into_iter().map(LocatedTraveler::from).collect())
}
