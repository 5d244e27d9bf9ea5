use crate::app_dirs::AppDirs;
use crate::difficulty::Difficulty;
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Persisted game settings. The difficulty is stored as a string so a
/// hand-edited file with a bogus value fails loudly at startup instead of
/// silently falling back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub difficulty: String,
    pub duration_secs: u64,
    pub silent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy.to_string(),
            duration_secs: 30,
            silent: false,
        }
    }
}

impl Config {
    /// Parses the stored difficulty, case-insensitively. An unrecognized
    /// value is a configuration defect and propagates as an error.
    pub fn difficulty(&self) -> Result<Difficulty, strum::ParseError> {
        Difficulty::from_str(&self.difficulty)
    }

    pub fn to_session_config(&self) -> Result<SessionConfig, strum::ParseError> {
        Ok(SessionConfig {
            difficulty: self.difficulty()?,
            duration_secs: self.duration_secs,
            silent: self.silent,
        })
    }

    pub fn from_session_config(sc: &SessionConfig) -> Self {
        Self {
            difficulty: sc.difficulty.to_string(),
            duration_secs: sc.duration_secs,
            silent: sc.silent,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(dir) = AppDirs::config_dir() {
            dir.join("config.json")
        } else {
            PathBuf::from("whackr_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            difficulty: "hard".into(),
            duration_secs: 60,
            silent: true,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn difficulty_parse_is_case_insensitive() {
        let cfg = Config {
            difficulty: "NORMAL".into(),
            ..Config::default()
        };
        assert_eq!(cfg.difficulty().unwrap(), Difficulty::Normal);
    }

    #[test]
    fn bogus_difficulty_surfaces_an_error() {
        let cfg = Config {
            difficulty: "ludicrous".into(),
            ..Config::default()
        };
        assert!(cfg.difficulty().is_err());
        assert!(cfg.to_session_config().is_err());
    }

    #[test]
    fn session_config_round_trip() {
        let sc = SessionConfig {
            difficulty: Difficulty::Hard,
            duration_secs: 45,
            silent: true,
        };
        let cfg = Config::from_session_config(&sc);
        assert_eq!(cfg.to_session_config().unwrap(), sc);
    }
}
