use std::{fs, io, path::PathBuf};

use crate::config::{self, Config};

fn temp_config() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    (dir, path)
}

#[test]
fn config_save_and_load_roundtrip() {
    let (_dir, path) = temp_config();

    let mut cfg = Config {
        double_click_timeout_ms: 300,
        devices: vec!["AT Translated Set 2 keyboard".into()],
        ..Default::default()
    };
    cfg.auto_switch.enabled = false;
    cfg.learning.threshold = 5;

    config::save_to(&path, &cfg).unwrap();
    let loaded = config::load_from(&path).unwrap();

    assert_eq!(loaded, cfg);
}

#[test]
fn missing_file_loads_defaults() {
    let (_dir, path) = temp_config();
    let loaded = config::load_from(&path).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let (_dir, path) = temp_config();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "double_click_timeout_ms = 250\n\n[auto_switch]\nenabled = false\n",
    )
    .unwrap();

    let loaded = config::load_from(&path).unwrap();

    assert_eq!(loaded.double_click_timeout_ms, 250);
    assert!(!loaded.auto_switch.enabled);
    assert_eq!(
        loaded.auto_switch.ngram_margin,
        Config::default().auto_switch.ngram_margin
    );
    assert_eq!(loaded.learning, Config::default().learning);
}

#[test]
fn out_of_range_file_is_rejected_on_load() {
    let (_dir, path) = temp_config();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "double_click_timeout_ms = 5\n").unwrap();

    assert!(config::load_from(&path).is_err());
}

#[test]
fn config_save_rejects_invalid_values() {
    let (_dir, path) = temp_config();
    let cfg = Config {
        selection_poll_ms: 0,
        ..Default::default()
    };

    let err = config::save_to(&path, &cfg).unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains("selection_poll_ms"));
    assert!(!path.exists());
}

#[test]
fn explicit_user_dictionary_path_wins() {
    let mut cfg = Config::default();
    cfg.learning.path = Some(PathBuf::from("/tmp/words.json"));
    assert_eq!(
        cfg.user_dictionary_path().unwrap(),
        PathBuf::from("/tmp/words.json")
    );
}

#[test]
fn empty_device_list_accepts_everything() {
    let mut cfg = Config::default();
    assert!(cfg.accepts_device("any keyboard"));

    cfg.devices = vec!["Logitech K120".into()];
    assert!(cfg.accepts_device("Logitech K120"));
    assert!(!cfg.accepts_device("any keyboard"));
}

#[test]
fn undo_window_follows_the_correction_timeout() {
    let mut cfg = Config::default();
    assert_eq!(cfg.undo_window(), std::time::Duration::from_secs(60));

    cfg.learning.correction_timeout_secs = 1.5;
    assert_eq!(cfg.undo_window(), std::time::Duration::from_millis(1500));

    cfg.learning.correction_timeout_secs = f64::NAN;
    assert_eq!(cfg.undo_window(), std::time::Duration::ZERO);
}
