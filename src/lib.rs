// Jothida client library.
// Typed access to the astrology API, the unified scoring cache, and chart reports.

pub mod api;
pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod storage;

pub use api::ApiClient;
pub use config::Config;
pub use error::{JothidaError, Result, ScoringError};
pub use scoring::{ScoringService, UserProfile};
