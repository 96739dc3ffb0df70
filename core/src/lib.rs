//! Ordering state, the AI concierge operations and the worker that runs them.

pub mod cart;
pub mod chat;
pub mod client;
pub mod concierge;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod orders;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{CampusError, Result};
pub use session::Concierge;
pub use store::Store;
