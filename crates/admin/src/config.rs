//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DASHDESK_BASE_URL` - Public URL for the admin panel
//!
//! ## Required when `DASHDESK_DATA_SOURCE=remote` (the default)
//! - `MARKETPLACE_API_URL` - Base URL of the marketplace REST API
//! - `MARKETPLACE_API_KEY` - Value sent in the `X-API-Key` header
//!
//! ## Optional
//! - `DASHDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHDESK_PORT` - Listen port (default: 3002)
//! - `DASHDESK_DATA_SOURCE` - `remote` or `mock` (default: remote)
//! - `DASHDESK_MOCK_LATENCY_MS` - Simulated delay for mock mutations (default: 300)
//! - `DASHDESK_PAGE_SIZE` - Rows per table page, 1-100 (default: 20)
//! - `DASHDESK_LOG_JSON` - Emit JSON logs when set
//! - `MARKETPLACE_API_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `DASHDESK_TLS_CERT` - PEM-encoded certificate chain
//! - `DASHDESK_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where entity data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// The marketplace REST API.
    #[default]
    Remote,
    /// The bundled mock dataset, mutated in memory.
    Mock,
}

impl DataSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for DataSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "api" => Ok(Self::Remote),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::InvalidEnvVar(
                "DASHDESK_DATA_SOURCE".to_string(),
                format!("expected 'remote' or 'mock', got '{other}'"),
            )),
        }
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Data source for entity pages
    pub data_source: DataSource,
    /// Marketplace API configuration (present when `data_source` is remote)
    pub api: Option<MarketplaceApiConfig>,
    /// Simulated delay applied to mock operations
    pub mock_latency: Duration,
    /// Rows per table page
    pub page_size: u32,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Marketplace REST API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MarketplaceApiConfig {
    /// API base URL (e.g. `https://api.marketplace.test/v1`)
    pub base_url: Url,
    /// Fixed key sent as `X-API-Key`
    pub api_key: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for MarketplaceApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MarketplaceApiConfig {
    /// Read `MARKETPLACE_API_URL`, `MARKETPLACE_API_KEY` and
    /// `MARKETPLACE_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL or key is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("MARKETPLACE_API_URL")?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MARKETPLACE_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETPLACE_API_URL".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }

        let timeout_secs = get_env_or_default("MARKETPLACE_API_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MARKETPLACE_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            api_key: get_validated_secret("MARKETPLACE_API_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("DASHDESK_TLS_CERT");
        let key_pem = get_optional_env("DASHDESK_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "DASHDESK_TLS_*".to_string(),
                "Both DASHDESK_TLS_CERT and DASHDESK_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHDESK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHDESK_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHDESK_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("DASHDESK_BASE_URL")?;

        let data_source = get_env_or_default("DASHDESK_DATA_SOURCE", "remote").parse()?;
        let api = match data_source {
            DataSource::Remote => Some(MarketplaceApiConfig::from_env()?),
            DataSource::Mock => None,
        };

        let mock_latency_ms = get_env_or_default("DASHDESK_MOCK_LATENCY_MS", "300")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DASHDESK_MOCK_LATENCY_MS".to_string(), e.to_string())
            })?;
        let page_size = parse_page_size(&get_env_or_default(
            "DASHDESK_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;

        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.2);

        Ok(Self {
            host,
            port,
            base_url,
            data_source,
            api,
            mock_latency: Duration::from_millis(mock_latency_ms),
            page_size,
            log_json: get_optional_env("DASHDESK_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls: TlsConfig::from_env()?,
        })
    }

    /// Configuration for running against the bundled mock dataset.
    ///
    /// Used by tests and local demos; no environment is read.
    #[must_use]
    pub fn mock(base_url: &str) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3002,
            base_url: base_url.to_string(),
            data_source: DataSource::Mock,
            api: None,
            mock_latency: Duration::ZERO,
            page_size: DEFAULT_PAGE_SIZE,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let size = raw
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar("DASHDESK_PAGE_SIZE".to_string(), e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidEnvVar(
            "DASHDESK_PAGE_SIZE".to_string(),
            format!("must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }
    Ok(size)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the marketplace."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
