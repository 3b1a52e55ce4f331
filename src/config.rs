use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::{deserialize_duration, serialize_duration};

/// Default CoinGecko simple price endpoint.
pub const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Default upstream timeout (5 seconds).
fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_user_agent() -> String {
    format!("cotacao/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Upstream price API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full URL of the simple price endpoint (query string is appended).
    pub base_url: String,

    /// Upper bound for the single outbound request.
    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,

    /// User-Agent header sent upstream.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PRICE_URL.to_string(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Synthetic volume configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Fixed RNG seed. When unset, volumes come from the thread-local RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub volume: VolumeConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Render the config back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./cotacao.toml` if it exists in current directory
/// 2. `~/.local/share/cotacao/cotacao.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("cotacao.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("cotacao").join("cotacao.toml");
    }

    local_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.upstream.base_url, DEFAULT_PRICE_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(5));
        assert!(config.upstream.user_agent.starts_with("cotacao/"));
        assert!(config.volume.seed.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
[server]
bind_addr = "0.0.0.0:9000"

[upstream]
base_url = "http://localhost:1234/simple/price"
timeout = "750ms"
user_agent = "test-agent"

[volume]
seed = 42
"#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.upstream.base_url, "http://localhost:1234/simple/price");
        assert_eq!(config.upstream.timeout, Duration::from_millis(750));
        assert_eq!(config.upstream.user_agent, "test-agent");
        assert_eq!(config.volume.seed, Some(42));
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = Config::parse(
            r#"
[upstream]
timeout = "2s"
"#,
        )
        .unwrap();

        assert_eq!(config.upstream.timeout, Duration::from_secs(2));
        assert_eq!(config.upstream.base_url, DEFAULT_PRICE_URL);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_timeout() {
        let err = Config::parse(
            r#"
[upstream]
timeout = "soon"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duration"), "{err}");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let path = Path::new("/definitely/not/here/cotacao.toml");
        let config = Config::load_or_default(path).unwrap();
        assert_eq!(config.upstream.base_url, DEFAULT_PRICE_URL);
    }

    #[test]
    fn test_to_toml_roundtrips() {
        let mut config = Config::default();
        config.volume.seed = Some(7);
        let text = config.to_toml().unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed.upstream.timeout, config.upstream.timeout);
        assert_eq!(parsed.volume.seed, Some(7));
        assert!(text.contains("timeout = \"5s\""), "{text}");
    }
}
