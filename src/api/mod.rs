// Jothida API module.
// Provides the client and types for the astrology backend's REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::*;
