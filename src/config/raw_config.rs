//! Unvalidated on-disk shape of [`Config`](super::Config).
//!
//! Every field has a serde default so older or partial files still load.

use std::path::PathBuf;

use serde::Deserialize;

use super::{AutoSwitchConfig, Config, LearningConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub double_click_timeout_ms: u64,
    pub retype_delay_ms: u64,
    pub selection_poll_ms: u64,
    pub auto_switch: RawAutoSwitch,
    pub learning: RawLearning,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawAutoSwitch {
    pub enabled: bool,
    pub ngram_margin: f64,
    pub min_gibberish_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawLearning {
    pub min_weight: i64,
    pub threshold: i64,
    pub correction_timeout_secs: f64,
    pub path: Option<PathBuf>,
}

impl Default for RawConfig {
    fn default() -> Self {
        let d = Config::default();
        Self {
            double_click_timeout_ms: d.double_click_timeout_ms,
            retype_delay_ms: d.retype_delay_ms,
            selection_poll_ms: d.selection_poll_ms,
            auto_switch: RawAutoSwitch::default(),
            learning: RawLearning::default(),
            devices: d.devices,
        }
    }
}

impl Default for RawAutoSwitch {
    fn default() -> Self {
        let d = AutoSwitchConfig::default();
        Self {
            enabled: d.enabled,
            ngram_margin: d.ngram_margin,
            min_gibberish_len: d.min_gibberish_len,
        }
    }
}

impl Default for RawLearning {
    fn default() -> Self {
        let d = LearningConfig::default();
        Self {
            min_weight: d.min_weight,
            threshold: d.threshold,
            correction_timeout_secs: d.correction_timeout_secs,
            path: d.path,
        }
    }
}
