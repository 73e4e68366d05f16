//! Configuration loading, validation, and management for ctxbudget.
//!
//! Loads configuration from `~/.ctxbudget/config.toml` with environment
//! variable overrides. Validates all settings at startup. Every field has a
//! serde default, so a partial file (or no file at all) is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Encoding names the tokenizer factory understands.
pub const KNOWN_ENCODINGS: &[&str] = &["cl100k_base", "char-estimate"];

/// The root configuration structure.
///
/// Maps directly to `~/.ctxbudget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Operator instructions placed at the top of every assembled context
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Per-section token budgets
    #[serde(default)]
    pub budgets: BudgetTable,

    /// Tokenizer selection
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Caller-side conversation windowing
    #[serde(default)]
    pub session: SessionConfig,

    /// Model backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Retriever settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Token budget per context section, in tokenizer units.
///
/// The sections are independent ceilings; nothing trims globally, so
/// [`BudgetTable::total`] is the only effective overall limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTable {
    #[serde(default = "default_instructions_budget")]
    pub instructions: usize,

    #[serde(default = "default_goal_budget")]
    pub goal: usize,

    #[serde(default = "default_memory_budget")]
    pub memory: usize,

    #[serde(default = "default_retrieval_budget")]
    pub retrieval: usize,

    #[serde(default = "default_tool_outputs_budget")]
    pub tool_outputs: usize,
}

fn default_instructions_budget() -> usize {
    255
}
fn default_goal_budget() -> usize {
    1500
}
fn default_memory_budget() -> usize {
    55
}
fn default_retrieval_budget() -> usize {
    550
}
fn default_tool_outputs_budget() -> usize {
    855
}

impl BudgetTable {
    /// Sum of all five section budgets.
    pub fn total(&self) -> usize {
        self.instructions + self.goal + self.memory + self.retrieval + self.tool_outputs
    }
}

impl Default for BudgetTable {
    fn default() -> Self {
        Self {
            instructions: default_instructions_budget(),
            goal: default_goal_budget(),
            memory: default_memory_budget(),
            retrieval: default_retrieval_budget(),
            tool_outputs: default_tool_outputs_budget(),
        }
    }
}

fn default_instructions() -> String {
    concat!(
        "\n",
        "    You are a helpful Travel & Expense Policy Assistant for Aurelius Consulting Group.\n",
        "\n",
        "    Your role:\n",
        "    - Answer questions about Travel and Expense policies clearly and accurately\n",
        "    - Cite specific policy sections when relevant\n",
        "    - If a policy doesn't cover something, say so clearly\n",
        "    - Be concise but complete in your responses\n",
        "    - Use a friendly, professional tone\n",
        "\n",
        "    Always base your answers on the provided policy documents. Do not make up policies.\n",
        "    ",
    )
    .into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// `cl100k_base` (exact BPE) or `char-estimate` (4 chars per token)
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "cl100k_base".into()
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// History entries kept between turns (user and assistant each count)
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Characters of each assistant answer stored in history
    #[serde(default = "default_answer_chars")]
    pub answer_chars: usize,
}

fn default_max_history_turns() -> usize {
    6
}
fn default_answer_chars() -> usize {
    200
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            answer_chars: default_answer_chars(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible base URL (Ollama serves one under `/v1`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_model() -> String {
    "llama3.2:1b".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunks requested from the retriever per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    6
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ctxbudget/config.toml).
    ///
    /// Environment variables override the file:
    /// - `CTXBUDGET_MODEL`
    /// - `CTXBUDGET_BASE_URL`
    /// - `CTXBUDGET_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Load from `path` if given, otherwise from the default location, then
    /// apply environment overrides.
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("CTXBUDGET_MODEL") {
            self.provider.model = model;
        }
        if let Some(url) = lookup("CTXBUDGET_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(key) = lookup("CTXBUDGET_API_KEY") {
            self.provider.api_key = Some(key);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ctxbudget")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !KNOWN_ENCODINGS.contains(&self.tokenizer.encoding.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "tokenizer.encoding must be one of {:?}, got '{}'",
                KNOWN_ENCODINGS, self.tokenizer.encoding
            )));
        }

        if self.session.max_history_turns == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_history_turns must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instructions: default_instructions(),
            budgets: BudgetTable::default(),
            tokenizer: TokenizerConfig::default(),
            session: SessionConfig::default(),
            provider: ProviderConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
