use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(var) else {
        return default;
    };
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(var, value = %raw, error = %e, "Invalid environment value, using default");
        default
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: Option<LlmConfig>,
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// LLM configuration for the intent-extraction model. Absent entirely when
/// `LLM_MODEL` is unset; the server then runs with extraction disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Custody service configuration: wallet import, transfers, trades,
/// and the bounded settlement wait.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub settlement_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            llm: LlmConfig::from_env(),
            wallet: WalletConfig::from_env(),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env::var("MURMUR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or("MURMUR_PORT", 3000),
            api_keys: env::var("MURMUR_API_KEYS")
                .map(|keys| keys.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        }
    }
}

impl DatabaseConfig {
    fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:murmur.db".to_string()),
            auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
            local_path: env::var("DATABASE_LOCAL_PATH").ok(),
        }
    }
}

impl LlmConfig {
    fn from_env() -> Option<Self> {
        let model = env::var("LLM_MODEL").ok()?;
        Some(Self {
            model,
            api_key: env::var("LLM_API_KEY").ok(),
            base_url: env::var("LLM_BASE_URL").ok(),
            timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
            max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
        })
    }
}

impl WalletConfig {
    fn from_env() -> Self {
        Self {
            base_url: env::var("WALLET_BASE_URL")
                .unwrap_or_else(|_| "https://api.cdp.example.com".to_string()),
            api_key: env::var("WALLET_API_KEY").ok(),
            timeout_secs: parse_env_or("WALLET_TIMEOUT", 30),
            settlement_timeout_secs: parse_env_or("WALLET_SETTLEMENT_TIMEOUT_SECS", 120),
            poll_interval_ms: parse_env_or("WALLET_POLL_INTERVAL_MS", 1000),
        }
    }
}

/// Providers whose model names may appear as a `provider/model` prefix.
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Split a model name into its `(provider, model)` parts. Names without a
/// recognized provider prefix are treated as local models.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((prefix, rest))
            if KNOWN_LLM_PROVIDERS
                .iter()
                .any(|p| prefix.eq_ignore_ascii_case(p)) =>
        {
            (prefix, rest)
        }
        _ => ("local", model),
    }
}
