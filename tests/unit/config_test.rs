//! Configuration file tests

use std::fs;

use castplay::Config;
use tempfile::TempDir;

#[test]
fn missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.player.auto_play);
    assert_eq!(config.logging.filter, "info");
}

#[test]
fn save_then_load_preserves_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.player.speed = 1.5;
    config.player.loop_playback = true;
    config.logging.filter = "castplay=debug".to_string();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[player]\nloop = true\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.player.loop_playback);
    assert_eq!(config.player.speed, 1.0);
    assert_eq!(config.player.idle_quiet, 3.0);
}

#[test]
fn invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[player]\nspeed = 0.0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}

#[test]
fn malformed_toml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[player\nspeed = ").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn to_options_carries_player_defaults() {
    let mut config = Config::default();
    config.player.theme = "monokai".to_string();
    let options = config.player.to_options();
    assert_eq!(options.theme, "monokai");
    assert!(options.auto_play);
}
