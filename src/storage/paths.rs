// Storage path utilities.
// Resolves the platform config and data directories used by jothida.

use std::path::PathBuf;

use directories::ProjectDirs;

const APP_NAME: &str = "jothida";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the config directory (~/.config/jothida on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory (~/.local/share/jothida on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the configuration file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Path to the stored bearer token.
pub fn token_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        // Path construction only; nothing is created on disk.
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.json"));
        }
        if let Some(path) = token_path() {
            assert!(path.ends_with("token"));
        }
    }
}
