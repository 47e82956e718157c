pub mod connection;
pub mod migrations;
pub mod store;
pub mod memory;
pub mod postgres;
pub mod travelers;
pub mod locations;
pub mod follows;
pub mod chats;
pub mod connection_requests;
#[cfg(test)]
pub mod faulty;

pub use connection::{get_db_pool, DatabaseConfig};
#[cfg(test)]
pub use faulty::FaultyStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{SharedStore, Store};
