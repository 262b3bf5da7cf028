use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Ordered terminology correction rules applied to translated text
    #[serde(default)]
    pub corrections: Vec<CorrectionRule>,

    /// Job-level scheduling config
    #[serde(default)]
    pub job: JobConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    // @level: errors only
    Error,
    // @level: errors and warnings
    Warn,
    // @level: default
    #[default]
    Info,
    // @level: verbose
    Debug,
    // @level: everything
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// One literal terminology rewrite, applied in list order over translated text.
///
/// A rule's replacement may itself be matched by a later rule; ordering is part
/// of the contract.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CorrectionRule {
    /// Literal substring to find
    pub find: String,

    /// Literal replacement
    pub replace: String,
}

impl CorrectionRule {
    // @returns: Rule from a (find, replace) pair
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Conversational chat endpoint (Ollama-compatible)
    #[default]
    Chat,
    // @provider: Single-string translate endpoint
    #[serde(rename = "translate-api")]
    TranslateApi,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Chat => "Chat",
            Self::TranslateApi => "Translate API",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Chat => "chat".to_string(),
            Self::TranslateApi => "translate-api".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "translate-api" | "translateapi" => Ok(Self::TranslateApi),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Settings shared by all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    // @field: Instruction template; {source_language}, {target_language} and
    // {delimiter} placeholders are substituted at service construction
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    // @field: Max retry attempts per request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff in ms, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    // @field: Sampling temperature for chat providers
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Join delimiter inserted between fragments in a batch request
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            delimiter: default_delimiter(),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max characters per batch request
    #[serde(default = "default_batch_char_budget")]
    pub batch_char_budget: usize,

    // @field: Timeout for multi-fragment batch requests
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    // @field: Timeout for single-fragment requests
    #[serde(default = "default_single_timeout_secs")]
    pub single_timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Chat => Self {
                provider_type: "chat".to_string(),
                model: default_chat_model(),
                api_key: String::new(),
                endpoint: default_chat_endpoint(),
                batch_char_budget: default_batch_char_budget(),
                batch_timeout_secs: default_batch_timeout_secs(),
                single_timeout_secs: default_single_timeout_secs(),
            },
            TranslationProvider::TranslateApi => Self {
                provider_type: "translate-api".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_translate_api_endpoint(),
                batch_char_budget: default_batch_char_budget(),
                batch_timeout_secs: default_translate_api_batch_timeout_secs(),
                single_timeout_secs: default_translate_api_single_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Active provider
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Settings shared by all providers
    #[serde(default)]
    pub common: TranslationCommonConfig,

    /// Per-provider settings
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            common: TranslationCommonConfig::default(),
            available_providers: default_available_providers(),
        }
    }
}

impl TranslationConfig {
    /// Config block of the active provider, if present
    fn active_provider_config(&self) -> Option<&ProviderConfig> {
        let wanted = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == wanted)
    }

    /// Model name of the active provider
    pub fn get_model(&self) -> String {
        self.active_provider_config()
            .map(|p| p.model.clone())
            .unwrap_or_default()
    }

    /// Endpoint URL of the active provider
    pub fn get_endpoint(&self) -> String {
        self.active_provider_config()
            .map(|p| p.endpoint.clone())
            .unwrap_or_default()
    }

    /// API key of the active provider
    pub fn get_api_key(&self) -> String {
        self.active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Character budget for one batch request
    pub fn get_batch_char_budget(&self) -> usize {
        self.active_provider_config()
            .map(|p| p.batch_char_budget)
            .unwrap_or_else(default_batch_char_budget)
    }

    /// Timeout budget for batch requests
    pub fn get_batch_timeout_secs(&self) -> u64 {
        self.active_provider_config()
            .map(|p| p.batch_timeout_secs)
            .unwrap_or_else(default_batch_timeout_secs)
    }

    /// Timeout budget for single-fragment requests
    pub fn get_single_timeout_secs(&self) -> u64 {
        self.active_provider_config()
            .map(|p| p.single_timeout_secs)
            .unwrap_or_else(default_single_timeout_secs)
    }

    /// Delimiter token as it must survive the backend round trip
    pub fn delimiter_token(&self) -> &str {
        self.common.delimiter.trim()
    }
}

/// Job scheduling configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobConfig {
    // @field: Hard deadline for the whole job in seconds
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    // @field: How many resources are translated at once
    #[serde(default = "default_concurrent_resources")]
    pub concurrent_resources: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline_secs(),
            concurrent_resources: default_concurrent_resources(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "ru".to_string(),
            translation: TranslationConfig::default(),
            corrections: Vec::new(),
            job: JobConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language cannot be empty"));
        }

        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }

        if self.translation.common.delimiter.trim().is_empty() {
            return Err(anyhow!("Batch delimiter cannot be blank"));
        }

        // A budget below one fragment plus the delimiter cannot pack anything
        let floor = self.translation.common.delimiter.chars().count() + 1;
        let budget = self.translation.get_batch_char_budget();
        if budget < floor {
            return Err(anyhow!(
                "Batch character budget {} is below the minimum of {}",
                budget,
                floor
            ));
        }

        if self.job.concurrent_resources == 0 {
            return Err(anyhow!("Concurrent resource count must be at least 1"));
        }

        Ok(())
    }
}

fn default_system_prompt() -> String {
    "You are an expert literary translator. Translate the provided text from {source_language} into {target_language}.\n\
     CRITICAL RULES:\n\
     1. Preserve the separator '{delimiter}' exactly. It MUST appear in the output.\n\
     2. NO explanations, NO introductory text like 'Here is the translation'.\n\
     3. Use professional, novel-style {target_language}.\n\
     4. Maintain paragraph breaks."
        .to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_delimiter() -> String {
    " [[[...]]] ".to_string()
}

fn default_chat_model() -> String {
    "llama3".to_string()
}

fn default_chat_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_translate_api_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_batch_char_budget() -> usize {
    8000
}

fn default_batch_timeout_secs() -> u64 {
    900
}

fn default_single_timeout_secs() -> u64 {
    60
}

fn default_translate_api_batch_timeout_secs() -> u64 {
    120
}

fn default_translate_api_single_timeout_secs() -> u64 {
    30
}

fn default_deadline_secs() -> u64 {
    // Two days, matching the upper bound a very large archive can take on a
    // slow local model
    172_800
}

fn default_concurrent_resources() -> usize {
    2
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::Chat),
        ProviderConfig::new(TranslationProvider::TranslateApi),
    ]
}
