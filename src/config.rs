//! User configuration, read from `config.toml` in the platform config
//! directory. Every key is optional; a missing file means defaults.
//!
//! ```toml
//! locale = "zh-TW"
//! default_pace = 3
//! default_track = "主要進度"
//!
//! [link]
//! base_url = "https://www.bible.com/zh-TW"
//! translation_id = 46
//! translation = "CUNP"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canon::{Canon, Locale};
use crate::errors::*;
use crate::files;
use crate::link::LinkConfig;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The language book names are written in.
    pub locale: Locale,
    /// Chapters per day for tracks that do not give a pace.
    pub default_pace: u32,
    /// Track name used when a plan is generated without named tracks.
    pub default_track: String,
    pub link: LinkConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            locale: Locale::default(),
            default_pace: 1,
            default_track: "Main".into(),
            link: LinkConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| ErrorKind::Config(e.to_string()).into())
    }

    /// Loads configuration from a file, using defaults if it is missing.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path).chain_err(|| ErrorKind::Io(format!("could not read config file '{}'", path.display())))?;
        Config::from_toml(&text).chain_err(|| format!("in config file '{}'", path.display()))
    }

    /// Loads configuration from the default location.
    pub fn load_default() -> Result<Config> {
        Config::load(&files::config_path()?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ErrorKind::Config(e.to_string()).into())
    }

    /// The canon in the configured locale.
    pub fn canon(&self) -> Canon {
        Canon::new(self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_toml("locale = \"zh-TW\"\n[link]\ntranslation_id = 46\n").unwrap();
        assert_eq!(config.locale, Locale::TraditionalChinese);
        assert_eq!(config.default_pace, 1);
        assert_eq!(config.link.translation_id, 46);
        assert_eq!(config.link.translation, "KJV");
    }

    #[test]
    fn rejects_bad_values() {
        match Config::from_toml("default_pace = \"fast\"") {
            Err(Error(ErrorKind::Config(_), _)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn renders_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.default_pace = 4;
        fs::write(&path, config.to_toml().unwrap()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
