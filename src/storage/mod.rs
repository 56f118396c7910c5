// Storage module for local files.
// Resolves platform directories and keeps the API token between runs.

pub mod paths;
pub mod token;

pub use token::TokenStore;
