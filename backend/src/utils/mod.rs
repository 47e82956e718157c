pub mod config;
pub mod logging;

pub use config::{Config, StoreBackend};
pub use logging::init_logging;
