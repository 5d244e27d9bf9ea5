use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("whackr");
            Some(state_dir.join("stats.db"))
        } else {
            ProjectDirs::from("", "", "whackr")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("stats.db"))
        }
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "whackr").map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
    }
}
