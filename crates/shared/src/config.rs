//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Reasoning (text generation) service configuration.
    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
///
/// Tokens are issued by the external identity provider; this service only
/// validates them with the shared HS256 secret.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key used to verify token signatures.
    pub secret: String,
    /// Expected `aud` claim, if the identity provider sets one.
    #[serde(default)]
    pub audience: Option<String>,
}

/// Reasoning service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReasoningConfig {
    /// Base URL of the generative language API.
    #[serde(default = "default_reasoning_url")]
    pub api_url: String,
    /// API key sent with each request. When empty, every upstream call fails
    /// and split advice falls back to the default.
    #[serde(default)]
    pub api_key: String,
    /// Model name appended to the base URL.
    #[serde(default = "default_reasoning_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_reasoning_timeout")]
    pub timeout_secs: u64,
}

fn default_reasoning_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_reasoning_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_reasoning_timeout() -> u64 {
    20
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_url: default_reasoning_url(),
            api_key: String::new(),
            model: default_reasoning_model(),
            timeout_secs: default_reasoning_timeout(),
        }
    }
}

impl ReasoningConfig {
    /// Returns the full `generateContent` endpoint for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NESTEGG").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
