mod config_validator;
pub mod raw_config;

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

pub use raw_config::RawConfig;
use serde::{Deserialize, Deserializer, Serialize};

const APP_DIR: &str = "layout-switcher";
const CONFIG_FILE: &str = "config.toml";
const USER_DICTIONARY_FILE: &str = "user_dictionary.json";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AutoSwitchConfig {
    pub enabled: bool,
    /// Minimum language score gain of the converted word over the typed word.
    pub ngram_margin: f64,
    /// Words this long that score zero in both layouts are treated as gibberish.
    pub min_gibberish_len: usize,
}

impl Default for AutoSwitchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ngram_margin: 0.25,
            min_gibberish_len: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LearningConfig {
    pub min_weight: i64,
    pub threshold: i64,
    pub correction_timeout_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_weight: 2,
            threshold: 3,
            correction_timeout_secs: 60.0,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Config {
    pub double_click_timeout_ms: u64,
    pub retype_delay_ms: u64,
    pub selection_poll_ms: u64,
    /// Device names to read from. Empty means every keyboard and pointer.
    #[serde(default)]
    pub devices: Vec<String>,
    pub auto_switch: AutoSwitchConfig,
    pub learning: LearningConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            double_click_timeout_ms: 400,
            retype_delay_ms: 30,
            selection_poll_ms: 500,
            auto_switch: AutoSwitchConfig::default(),
            learning: LearningConfig::default(),
            devices: Vec::new(),
        }
    }
}

impl Config {
    pub fn double_click_timeout(&self) -> Duration {
        Duration::from_millis(self.double_click_timeout_ms)
    }

    pub fn retype_delay(&self) -> Duration {
        Duration::from_millis(self.retype_delay_ms)
    }

    pub fn selection_poll_interval(&self) -> Duration {
        Duration::from_millis(self.selection_poll_ms)
    }

    /// How long after an automatic conversion a double-tap still undoes it.
    pub fn undo_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.learning.correction_timeout_secs).unwrap_or_default()
    }

    /// Where the learned word weights live.
    pub fn user_dictionary_path(&self) -> io::Result<PathBuf> {
        if let Some(path) = &self.learning.path {
            return Ok(path.clone());
        }
        Ok(app_dir()?.join(USER_DICTIONARY_FILE))
    }

    pub fn accepts_device(&self, name: &str) -> bool {
        self.devices.is_empty() || self.devices.iter().any(|d| d == name)
    }
}

fn app_dir() -> io::Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "config directory is unknown"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> io::Result<PathBuf> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)
}

fn confy_err(e: confy::ConfyError) -> io::Error {
    io::Error::other(e)
}

pub fn load() -> io::Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> io::Result<Config> {
    ensure_parent_dir(path)?;
    confy::load_path(path).map_err(confy_err)
}

pub fn save(cfg: &Config) -> io::Result<()> {
    save_to(&config_path()?, cfg)
}

pub fn save_to(path: &Path, cfg: &Config) -> io::Result<()> {
    cfg.validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    ensure_parent_dir(path)?;
    confy::store_path(path, cfg).map_err(confy_err)
}

impl TryFrom<RawConfig> for Config {
    type Error = String;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let cfg = Self {
            double_click_timeout_ms: raw.double_click_timeout_ms,
            retype_delay_ms: raw.retype_delay_ms,
            selection_poll_ms: raw.selection_poll_ms,
            auto_switch: AutoSwitchConfig {
                enabled: raw.auto_switch.enabled,
                ngram_margin: raw.auto_switch.ngram_margin,
                min_gibberish_len: raw.auto_switch.min_gibberish_len,
            },
            learning: LearningConfig {
                min_weight: raw.learning.min_weight,
                threshold: raw.learning.threshold,
                correction_timeout_secs: raw.learning.correction_timeout_secs,
                path: raw.learning.path,
            },
            devices: raw.devices,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
