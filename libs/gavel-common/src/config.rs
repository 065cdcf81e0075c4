use crate::types::Language;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, collected once at startup from the environment.
/// Components receive this by reference; nothing re-reads env vars later.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub bind_addr: String,
    /// Shared scratch root; per-request children are uniquely named, so the
    /// directory itself is never removed between requests.
    pub scratch_dir: PathBuf,
    pub compiled_time_limit: Duration,
    pub interpreted_time_limit: Duration,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_millis_or(key: &str, default_ms: u64) -> Duration {
    let ms = env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            redis_url: env_or("REDIS_URL", "redis://127.0.0.1:6379"),
            bind_addr: env_or("GAVEL_BIND_ADDR", "0.0.0.0:3000"),
            scratch_dir: PathBuf::from(env_or("GAVEL_SCRATCH_DIR", "scratch")),
            compiled_time_limit: env_millis_or("GAVEL_COMPILED_TIME_LIMIT_MS", 2000),
            interpreted_time_limit: env_millis_or("GAVEL_INTERPRETED_TIME_LIMIT_MS", 7000),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
        }
    }

    /// Wall-clock budget for one compile or run phase of the given language.
    pub fn time_limit(&self, language: Language) -> Duration {
        if language.is_compiled() {
            self.compiled_time_limit
        } else {
            self.interpreted_time_limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            scratch_dir: PathBuf::from("scratch"),
            compiled_time_limit: Duration::from_millis(2000),
            interpreted_time_limit: Duration::from_millis(7000),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
        }
    }

    #[test]
    fn test_time_limit_per_language() {
        let config = sample_config();
        assert_eq!(config.time_limit(Language::C), Duration::from_millis(2000));
        assert_eq!(
            config.time_limit(Language::Cpp),
            Duration::from_millis(2000)
        );
        assert_eq!(config.time_limit(Language::Py), Duration::from_millis(7000));
    }
}
