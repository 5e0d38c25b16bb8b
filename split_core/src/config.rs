//! # Settings
//!
//! Where the ledger lives, who is editing it, and how money is shown.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults (`data.json`, the OS user name, `$`)
//! 2. `config.toml` in the user config dir (`~/.config/evenly/config.toml` on Linux)
//! 3. Environment: `EVENLY_DATA_FILE`, `EVENLY_USER`
//! 4. Explicit overrides from the front end (command-line flags)
//!
//! ```toml
//! data_file = "/srv/shared/flat.json"
//! user_id = "ana@example.com"
//! currency_symbol = "€"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{SplitError, SplitResult};

pub const DATA_FILE_ENV: &str = "EVENLY_DATA_FILE";
pub const USER_ENV: &str = "EVENLY_USER";
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ledger data file
    pub data_file: PathBuf,
    /// Name recorded in lock files
    pub user_id: String,
    /// Prefix used when printing amounts
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            user_id: whoami::username(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// The subset of settings a config file may set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    data_file: Option<PathBuf>,
    user_id: Option<String>,
    currency_symbol: Option<String>,
}

impl Settings {
    /// Defaults, then the user's config file (if any), then the environment.
    pub fn load() -> SplitResult<Self> {
        let mut settings = Settings::default();
        if let Some(path) = default_config_path() {
            if path.exists() {
                settings.merge_file(&path)?;
            }
        }
        settings.merge_env();
        Ok(settings)
    }

    /// Like [`Settings::load`] but reading an explicit config file.
    pub fn load_from(path: &Path) -> SplitResult<Self> {
        let mut settings = Settings::default();
        settings.merge_file(path)?;
        settings.merge_env();
        Ok(settings)
    }

    fn merge_file(&mut self, path: &Path) -> SplitResult<()> {
        let text = fs::read_to_string(path).map_err(|e| SplitError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file = parse_settings_file(&text).map_err(|reason| SplitError::ConfigError {
            path: path.display().to_string(),
            reason,
        })?;

        debug!(path = %path.display(), "config file applied");
        self.apply(file);
        Ok(())
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(data_file) = file.data_file {
            self.data_file = data_file;
        }
        if let Some(user_id) = file.user_id {
            self.user_id = user_id;
        }
        if let Some(symbol) = file.currency_symbol {
            self.currency_symbol = symbol;
        }
    }

    fn merge_env(&mut self) {
        self.merge_vars(|key| env::var(key).ok());
    }

    fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(DATA_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(user) = lookup(USER_ENV).filter(|v| !v.trim().is_empty()) {
            self.user_id = user;
        }
    }

    /// Apply front-end overrides; `None` keeps the current value.
    pub fn with_overrides(mut self, data_file: Option<PathBuf>, user_id: Option<String>) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }
        if let Some(user_id) = user_id {
            self.user_id = user_id;
        }
        self
    }
}

/// `<config dir>/evenly/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("evenly").join("config.toml"))
}

fn parse_settings_file(text: &str) -> Result<SettingsFile, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.data_file, PathBuf::from("data.json"));
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_file_layer() {
        let file = parse_settings_file(
            r#"
            data_file = "/srv/flat.json"
            currency_symbol = "€"
            "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        let user = settings.user_id.clone();
        settings.apply(file);

        assert_eq!(settings.data_file, PathBuf::from("/srv/flat.json"));
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.user_id, user);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_settings_file("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_env_layer_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [(DATA_FILE_ENV, "trip.json"), (USER_ENV, "  ")].into();

        let mut settings = Settings::default();
        let user = settings.user_id.clone();
        settings.merge_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.data_file, PathBuf::from("trip.json"));
        assert_eq!(settings.user_id, user);
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::default().with_overrides(Some("x.json".into()), Some("ben".into()));
        assert_eq!(settings.data_file, PathBuf::from("x.json"));
        assert_eq!(settings.user_id, "ben");

        let kept = settings.clone().with_overrides(None, None);
        assert_eq!(kept, settings);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "user_id = \"cy\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        // EVENLY_USER may be set in the environment running the tests.
        if env::var(USER_ENV).is_err() {
            assert_eq!(settings.user_id, "cy");
        }

        let missing = Settings::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert_eq!(missing.error_code(), "CONFIG_ERROR");
    }
}
