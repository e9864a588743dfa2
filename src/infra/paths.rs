// src/infra/paths.rs — Path management
//
// All paths respect the PERSUADE_HOME environment variable for isolation.
// When unset, everything lives under ~/.persuade/.

use directories::BaseDirs;
use std::path::PathBuf;

fn persuade_home() -> Option<PathBuf> {
    std::env::var_os("PERSUADE_HOME").map(PathBuf::from)
}

/// Configuration directory: $PERSUADE_HOME/ or ~/.persuade/
pub fn config_dir() -> PathBuf {
    if let Some(home) = persuade_home() {
        return home;
    }
    dirs_home().join(".persuade")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Credentials directory
pub fn credentials_dir() -> PathBuf {
    config_dir().join("credentials")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
