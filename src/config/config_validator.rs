use std::fmt::Write as _;

use crate::config::Config;

const DOUBLE_CLICK_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=2000;
const MAX_RETYPE_DELAY_MS: u64 = 1000;
const SELECTION_POLL_RANGE_MS: std::ops::RangeInclusive<u64> = 50..=10_000;

pub fn find_config_problems(config: &Config) -> Vec<String> {
    let mut problems = Vec::new();

    if !DOUBLE_CLICK_RANGE_MS.contains(&config.double_click_timeout_ms) {
        problems.push(format!(
            "double_click_timeout_ms must be within {}..={}, got {}",
            DOUBLE_CLICK_RANGE_MS.start(),
            DOUBLE_CLICK_RANGE_MS.end(),
            config.double_click_timeout_ms
        ));
    }
    if config.retype_delay_ms > MAX_RETYPE_DELAY_MS {
        problems.push(format!(
            "retype_delay_ms must be at most {MAX_RETYPE_DELAY_MS}, got {}",
            config.retype_delay_ms
        ));
    }
    if !SELECTION_POLL_RANGE_MS.contains(&config.selection_poll_ms) {
        problems.push(format!(
            "selection_poll_ms must be within {}..={}, got {}",
            SELECTION_POLL_RANGE_MS.start(),
            SELECTION_POLL_RANGE_MS.end(),
            config.selection_poll_ms
        ));
    }

    let auto = &config.auto_switch;
    if !(0.0..=1.0).contains(&auto.ngram_margin) {
        problems.push(format!(
            "auto_switch.ngram_margin must be within 0.0..=1.0, got {}",
            auto.ngram_margin
        ));
    }
    if auto.min_gibberish_len < 2 {
        problems.push(format!(
            "auto_switch.min_gibberish_len must be at least 2, got {}",
            auto.min_gibberish_len
        ));
    }

    let learning = &config.learning;
    if learning.min_weight < 1 {
        problems.push(format!(
            "learning.min_weight must be positive, got {}",
            learning.min_weight
        ));
    }
    if learning.threshold < learning.min_weight {
        problems.push(format!(
            "learning.threshold must not be below learning.min_weight, got {} < {}",
            learning.threshold, learning.min_weight
        ));
    }
    if !learning.correction_timeout_secs.is_finite() || learning.correction_timeout_secs < 0.0 {
        problems.push(format!(
            "learning.correction_timeout_secs must be a non-negative number, got {}",
            learning.correction_timeout_secs
        ));
    }

    problems
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        let problems = find_config_problems(self);
        if problems.is_empty() {
            return Ok(());
        }

        let mut error = String::from("Invalid configuration:\n\n");
        for problem in &problems {
            // `String` implements `fmt::Write` infallibly; ignore the `fmt::Result` for clarity.
            let _ = writeln!(error, "• {problem}");
        }
        Err(error)
    }
}
