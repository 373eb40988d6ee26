/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use log::LevelFilter;
use subreflow::app_config::{Config, LogLevel, OutputFormat};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.resegment.min_chars, 80);
    assert_eq!(config.resegment.max_chars, 120);
    assert_eq!(config.resegment.gap_ms, 100);
    assert_eq!(config.output_format, OutputFormat::Srt);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.resegment.min_chars = 0;
    assert!(config.validate().is_err());

    config.resegment.min_chars = 120;
    assert!(config.validate().is_err());

    config.resegment.min_chars = 40;
    config.resegment.max_chars = 42;
    assert!(config.validate().is_ok());
}

/// Missing fields fall back to their defaults
#[test]
fn test_from_json_str_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config = Config::from_json_str(
        r#"{"resegment": {"gap_ms": 250}, "output_format": "json"}"#,
    )?;

    assert_eq!(config.resegment.min_chars, 80);
    assert_eq!(config.resegment.max_chars, 120);
    assert_eq!(config.resegment.gap_ms, 250);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(config.log_level, LogLevel::Info);

    assert_eq!(Config::from_json_str("{}")?, Config::default());
    Ok(())
}

#[test]
fn test_from_json_str_withUnknownFormat_shouldFail() {
    assert!(Config::from_json_str(r#"{"output_format": "vtt"}"#).is_err());
    assert!(Config::from_json_str("not json").is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

#[test]
fn test_save_then_load_shouldKeepCustomValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.resegment.max_chars = 84;
    config.output_format = OutputFormat::Txt;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, config);

    let raw = std::fs::read_to_string(&path)?;
    assert!(raw.contains("\"output_format\": \"txt\""));
    assert!(raw.contains("\"log_level\": \"debug\""));
    Ok(())
}

#[test]
fn test_output_format_parsing_shouldAcceptAliases() {
    assert_eq!("SRT".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
    assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Txt);
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert!("ass".parse::<OutputFormat>().is_err());

    assert_eq!(OutputFormat::Json.extension(), "json");
    assert_eq!(OutputFormat::Txt.to_string(), "txt");
}

#[test]
fn test_log_level_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
