/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use plotclip::app_config::{Config, LogLevel, RescoringConfig, ScoreProviderKind};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldCarryDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.scan.window_size, 25);
    assert_eq!(config.scan.stride, 15);
    assert_eq!(config.selection.min_gap, 40);
    assert_eq!(config.selection.max_clips, 5);
    assert!((config.refine.expansion_ceiling - 1.2).abs() < 1e-9);
    assert_eq!(config.refine.min_end_offset, 15);
    assert!((config.scoring.weights.exclamation - 3.0).abs() < 1e-9);
    assert!((config.scoring.weights.edge_boost - 1.3).abs() < 1e-9);
    assert_eq!(config.categories.len(), 5);
    assert_eq!(config.categories[0].name, "key_conflict");
    assert_eq!(config.genres.len(), 8);
    assert!(!config.scoring.rescoring.enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a sparse JSON file fills in every default
#[test]
fn test_config_deserialize_withSparseJson_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{ "scan": { "window_size": 30 } }"#,
    )
    .unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    let config: Config = serde_json::from_str(&content).unwrap();

    assert_eq!(config.scan.window_size, 30);
    assert_eq!(config.scan.stride, 15);
    assert_eq!(config.categories.len(), 5);
    assert!(config.validate().is_ok());
}

/// Test JSON round trip of a modified configuration
#[test]
fn test_config_roundTrip_withModifiedValues_shouldPreserve() {
    let mut config = Config::default();
    config.selection.max_clips = 3;
    config.scoring.rescoring.provider = ScoreProviderKind::OpenAI;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.selection.max_clips, 3);
    assert_eq!(parsed.scoring.rescoring.provider, ScoreProviderKind::OpenAI);
}

/// Test validation rejections
#[test]
fn test_validate_withBrokenConfigs_shouldError() {
    let mut config = Config::default();
    config.categories.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.categories[0].keywords.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.refine.expansion_ceiling = 0.8;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.scoring.rescoring.rule_weight = 1.5;
    assert!(config.validate().is_err());

    // OpenAI without an API key only fails when rescoring is enabled
    let mut config = Config::default();
    config.scoring.rescoring.provider = ScoreProviderKind::OpenAI;
    assert!(config.validate().is_ok());
    config.scoring.rescoring.enabled = true;
    assert!(config.validate().is_err());
}

/// Test provider kind parsing and display
#[test]
fn test_provider_kind_parseAndDisplay_shouldBeConsistent() {
    assert_eq!(ScoreProviderKind::from_str("ollama").unwrap(), ScoreProviderKind::Ollama);
    assert_eq!(ScoreProviderKind::from_str("OpenAI").unwrap(), ScoreProviderKind::OpenAI);
    assert!(ScoreProviderKind::from_str("anthropic").is_err());

    assert_eq!(ScoreProviderKind::Ollama.to_string(), "ollama");
    assert_eq!(ScoreProviderKind::OpenAI.display_name(), "OpenAI");
}

/// Test model and endpoint fallbacks per provider
#[test]
fn test_rescoring_config_withEmptyFields_shouldFallBackPerProvider() {
    let mut rescoring = RescoringConfig::default();
    assert_eq!(rescoring.get_model(), "llama2");
    assert_eq!(rescoring.get_endpoint(), "http://localhost:11434");

    rescoring.provider = ScoreProviderKind::OpenAI;
    assert_eq!(rescoring.get_model(), "gpt-3.5-turbo");
    assert_eq!(rescoring.get_endpoint(), "https://api.openai.com/v1");

    rescoring.model = "qwen2".to_string();
    rescoring.endpoint = "http://10.0.0.2:11434".to_string();
    assert_eq!(rescoring.get_model(), "qwen2");
    assert_eq!(rescoring.get_endpoint(), "http://10.0.0.2:11434");
}
