pub mod auth;
pub mod connection_requests;
pub mod extract;
pub mod nearby;
pub mod private_chat;
pub mod users;

use crate::db::SharedStore;
use crate::utils::Config;

/// Router state shared by every handler.
pub type AppState = (SharedStore, Config);

pub use auth::{require_auth, AuthenticatedUser};
pub use extract::{ValidJson, ValidPath, ValidQuery};
