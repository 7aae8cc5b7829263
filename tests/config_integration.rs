//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use rotlab::config::AppConfig;
use rotlab_core::AxisOrder;
use serial_test::serial;

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("ROTLAB_ENGINE__DEFAULT_ORDER");
    std::env::remove_var("ROTLAB_DISPLAY__PRECISION");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    println!("Euler order from file: {}", config.engine.default_order);
    assert!(config.engine.determinant_tolerance > 0.0);
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("ROTLAB_ENGINE__DEFAULT_ORDER", "ZYX");
    std::env::set_var("ROTLAB_DISPLAY__PRECISION", "6");
    let config = AppConfig::load();
    std::env::remove_var("ROTLAB_ENGINE__DEFAULT_ORDER");
    std::env::remove_var("ROTLAB_DISPLAY__PRECISION");

    let config = config.unwrap();
    assert_eq!(config.engine.default_order, AxisOrder::ZYX);
    assert_eq!(config.display.precision, 6);
}

#[test]
#[serial]
fn test_invalid_env_value_is_an_error() {
    std::env::set_var("ROTLAB_ENGINE__DEFAULT_ORDER", "XYY");
    let result = AppConfig::load();
    std::env::remove_var("ROTLAB_ENGINE__DEFAULT_ORDER");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("no/such/config/dir").unwrap();
    assert_eq!(config.engine.default_order, AxisOrder::XYZ);
    assert_eq!(config.display.precision, 3);
    assert_eq!(config.debug.log_level, "info");
}
