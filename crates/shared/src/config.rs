//! Application configuration management.

use eventi_core::gate::DEFAULT_PUBLIC_PREFIXES;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Route gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
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

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Public base URL, used to build provider callback URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where unauthenticated users are sent.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,
    /// How often an active session's expiry is pushed forward, in seconds.
    #[serde(default = "default_session_update_age")]
    pub session_update_age_secs: u64,
    /// Whether cookies carry the `Secure` attribute.
    #[serde(default)]
    pub secure_cookies: bool,
    /// GitHub OAuth app credentials.
    #[serde(default)]
    pub github: Option<GitHubConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sign_in_path: default_sign_in_path(),
            session_max_age_secs: default_session_max_age(),
            session_update_age_secs: default_session_update_age(),
            secure_cookies: false,
            github: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_sign_in_path() -> String {
    "/login".to_string()
}

fn default_session_max_age() -> u64 {
    2_592_000 // 30 days
}

fn default_session_update_age() -> u64 {
    86_400 // 24 hours
}

/// GitHub OAuth app credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// OAuth client ID (`AUTH_GITHUB_ID`).
    pub client_id: String,
    /// OAuth client secret (`AUTH_GITHUB_SECRET`).
    pub client_secret: String,
}

/// Route gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Path prefixes (without the leading `/`) that bypass authentication.
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_prefixes: default_public_prefixes(),
        }
    }
}

fn default_public_prefixes() -> Vec<String> {
    DEFAULT_PUBLIC_PREFIXES
        .iter()
        .copied()
        .map(String::from)
        .collect()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// `EVENTI__*` environment variables, then the conventional variables
    /// `DATABASE_URL`, `AUTH_URL`, `AUTH_GITHUB_ID` and `AUTH_GITHUB_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("EVENTI")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("gate.public_prefixes")
                    .try_parsing(true),
            )
            .set_override_option("database.url", non_empty_env("DATABASE_URL"))?
            .set_override_option("auth.base_url", non_empty_env("AUTH_URL"))?
            .set_override_option("auth.github.client_id", non_empty_env("AUTH_GITHUB_ID"))?
            .set_override_option(
                "auth.github.client_secret",
                non_empty_env("AUTH_GITHUB_SECRET"),
            )?
            .build()?;

        config.try_deserialize()
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
