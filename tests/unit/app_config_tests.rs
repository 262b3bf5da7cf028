/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use epubtrans::app_config::{
    Config, CorrectionRule, ProviderConfig, TranslationProvider,
};

#[test]
fn test_default_config_shouldCarryTheExpectedDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ru");
    assert_eq!(config.translation.provider, TranslationProvider::Chat);
    assert_eq!(config.translation.common.delimiter, " [[[...]]] ");
    assert_eq!(config.translation.get_batch_char_budget(), 8000);
    assert_eq!(config.translation.get_model(), "llama3");
    assert_eq!(config.translation.get_endpoint(), "http://127.0.0.1:11434");
    assert_eq!(config.job.deadline_secs, 172_800);
    assert_eq!(config.job.concurrent_resources, 2);
    assert!(config.corrections.is_empty());
}

#[test]
fn test_delimiter_token_shouldStripBoundaryPadding() {
    let config = Config::default();
    assert_eq!(config.translation.delimiter_token(), "[[[...]]]");
}

#[test]
fn test_provider_roundtrip_withFromStrAndDisplay_shouldMatch() {
    assert_eq!(
        TranslationProvider::from_str("chat").unwrap(),
        TranslationProvider::Chat
    );
    assert_eq!(
        TranslationProvider::from_str("translate-api").unwrap(),
        TranslationProvider::TranslateApi
    );
    assert!(TranslationProvider::from_str("carrier-pigeon").is_err());

    assert_eq!(TranslationProvider::Chat.to_string(), "chat");
    assert_eq!(TranslationProvider::TranslateApi.to_string(), "translate-api");
}

#[test]
fn test_provider_config_new_shouldFillFlavorDefaults() {
    let chat = ProviderConfig::new(TranslationProvider::Chat);
    assert_eq!(chat.provider_type, "chat");
    assert_eq!(chat.batch_timeout_secs, 900);
    assert_eq!(chat.single_timeout_secs, 60);

    let api = ProviderConfig::new(TranslationProvider::TranslateApi);
    assert_eq!(api.provider_type, "translate-api");
    assert_eq!(api.endpoint, "https://translate.googleapis.com");
}

#[test]
fn test_validate_withEmptyLanguages_shouldFail() {
    let mut config = Config::default();
    config.source_language = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.target_language = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBlankDelimiter_shouldFail() {
    let mut config = Config::default();
    config.translation.common.delimiter = "   ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withTinyBudget_shouldFail() {
    let mut config = Config::default();
    for provider in &mut config.translation.available_providers {
        provider.batch_char_budget = 3;
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.job.concurrent_resources = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_serde_roundtrip_shouldPreserveConfig() {
    let mut config = Config::default();
    config.corrections.push(CorrectionRule::new("Smith", "Сміт"));
    config.translation.provider = TranslationProvider::TranslateApi;

    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.corrections, config.corrections);
    assert_eq!(parsed.translation.provider, TranslationProvider::TranslateApi);
    assert_eq!(parsed.translation.common.delimiter, " [[[...]]] ");
}

#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{"source_language": "en", "target_language": "uk"}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_language, "uk");
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.get_batch_char_budget(), 8000);
    assert!(config.validate().is_ok());
}
