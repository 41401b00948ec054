use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Wayfarer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: i32,
}

impl OpenAiConfig {
    /// Provider routes are short-circuited when no key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        // Load environment variables from .env files
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("WAYFARER_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        // Load config from file if it exists
        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(name) = env::var("WAYFARER_SERVER_NAME") {
            self.server.name = name;
        }
        if let Ok(bind) = env::var("WAYFARER_HTTP_BIND") {
            self.server.bind = bind;
        }

        // OpenAI overrides
        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            self.openai.api_key = api_key;
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            self.openai.model = model;
        }

        // Retry overrides
        if let Ok(attempts) = env::var("WAYFARER_RETRY_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.retry.max_attempts = n;
            }
        }
        if let Ok(delay) = env::var("WAYFARER_RETRY_INITIAL_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.retry.initial_delay_ms = ms;
            }
        }
        if let Ok(delay) = env::var("WAYFARER_RETRY_MAX_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.retry.max_delay_ms = ms;
            }
        }

        // Cache overrides
        if let Ok(ttl) = env::var("WAYFARER_CACHE_TTL_SECONDS") {
            if let Ok(secs) = ttl.parse() {
                self.cache.ttl_seconds = secs;
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!("Invalid bind address: {}", self.server.bind).into());
        }

        if self.retry.max_attempts == 0 {
            return Err("Retry max_attempts cannot be 0".into());
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err("Retry max_delay_ms cannot be less than initial_delay_ms".into());
        }

        if self.cache.ttl_seconds == 0 {
            return Err("Cache ttl_seconds cannot be 0".into());
        }

        // The server still starts without a key; provider routes fail per
        // request with a clear "not configured" error.
        if !self.openai.is_configured() {
            return Err("OPENAI_API_KEY environment variable is not set".into());
        }

        Ok(())
    }

    /// Get retry warm-up/backoff base delay as Duration
    pub fn get_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry.initial_delay_ms)
    }

    /// Get retry delay cap as Duration
    pub fn get_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry.max_delay_ms)
    }

    /// Get cache TTL as Duration
    pub fn get_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "wayfarer".to_string(),
                version: "1.0.0".to_string(),
                bind: "127.0.0.1:5050".to_string(),
            },
            openai: OpenAiConfig {
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                model: "gpt-4o".to_string(),
                temperature: 0.7,
                max_tokens: 1500,
            },
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 3000,
                max_delay_ms: 15000,
            },
            cache: CacheConfig {
                // 30 minutes
                ttl_seconds: 1800,
            },
        }
    }
}
