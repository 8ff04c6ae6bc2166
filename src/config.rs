//! Configuration types for branch-export

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Custom export job submission endpoint
pub const CUSTOM_EXPORT_ENDPOINT: &str = "https://api2.branch.io/v2/logs";

/// Daily export endpoint
pub const DAILY_EXPORT_ENDPOINT: &str = "https://api2.branch.io/v3/export";

/// Transport timeouts shared by both clients
///
/// Used as a nested sub-config within [`CustomExportConfig`] and [`DailyExportConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for sending a request and receiving the response headers (default: 16 seconds)
    ///
    /// Streaming a response body is not bounded by it.
    #[serde(
        rename = "timeout_ms",
        default = "default_timeout",
        with = "duration_millis_serde"
    )]
    pub timeout: Duration,

    /// Timeout for establishing a connection (default: 4 seconds)
    #[serde(
        rename = "connect_timeout_ms",
        default = "default_connect_timeout",
        with = "duration_millis_serde"
    )]
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl HttpConfig {
    /// Check that both timeouts are at least one millisecond
    pub fn validate(&self) -> Result<()> {
        validate_timeout("timeout", self.timeout)?;
        validate_timeout("connect_timeout", self.connect_timeout)
    }
}

/// Configuration for [`CustomExportClient`](crate::CustomExportClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct CustomExportConfig {
    /// Branch app id, sent as the `app_id` query parameter
    pub app_id: String,

    /// Access token, sent as the `access-token` header
    pub access_token: String,

    /// Job submission endpoint (default: [`CUSTOM_EXPORT_ENDPOINT`])
    #[serde(default = "default_custom_endpoint")]
    pub endpoint: String,

    /// Transport timeouts
    #[serde(default)]
    pub http: HttpConfig,
}

impl CustomExportConfig {
    /// Create a configuration with default endpoint and timeouts
    pub fn new(app_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            access_token: access_token.into(),
            endpoint: default_custom_endpoint(),
            http: HttpConfig::default(),
        }
    }

    /// Check credentials, endpoint and timeouts
    pub fn validate(&self) -> Result<()> {
        validate_not_blank("app_id", &self.app_id)?;
        validate_not_blank("access_token", &self.access_token)?;
        validate_endpoint(&self.endpoint)?;
        self.http.validate()
    }
}

// The token must never end up in logs
impl fmt::Debug for CustomExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomExportConfig")
            .field("app_id", &self.app_id)
            .field("access_token", &"***REDACTED***")
            .field("endpoint", &self.endpoint)
            .field("http", &self.http)
            .finish()
    }
}

/// Configuration for [`DailyExportClient`](crate::DailyExportClient)
///
/// Daily export credentials travel in the request body, so only the endpoint and timeouts are
/// configured here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyExportConfig {
    /// Export endpoint (default: [`DAILY_EXPORT_ENDPOINT`])
    #[serde(default = "default_daily_endpoint")]
    pub endpoint: String,

    /// Transport timeouts (connect timeout default: 8 seconds)
    #[serde(default = "default_daily_http")]
    pub http: HttpConfig,
}

impl Default for DailyExportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_daily_endpoint(),
            http: default_daily_http(),
        }
    }
}

impl DailyExportConfig {
    /// Check endpoint and timeouts
    pub fn validate(&self) -> Result<()> {
        validate_endpoint(&self.endpoint)?;
        self.http.validate()
    }
}

pub(crate) fn validate_timeout(key: &str, value: Duration) -> Result<()> {
    if value < Duration::from_millis(1) {
        return Err(Error::config(key, format!("{key} must be at least 1ms")));
    }
    Ok(())
}

fn validate_not_blank(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::config(key, format!("{key} must not be blank")));
    }
    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| Error::config("endpoint", format!("invalid endpoint '{endpoint}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config(
            "endpoint",
            format!("unsupported endpoint scheme '{other}'"),
        )),
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(16)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(4)
}

fn default_custom_endpoint() -> String {
    CUSTOM_EXPORT_ENDPOINT.to_string()
}

fn default_daily_endpoint() -> String {
    DAILY_EXPORT_ENDPOINT.to_string()
}

fn default_daily_http() -> HttpConfig {
    HttpConfig {
        timeout: default_timeout(),
        connect_timeout: Duration::from_secs(8),
    }
}

// Durations as integer milliseconds
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer, ser::Error};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis())
            .map_err(|_| S::Error::custom("duration too large"))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(16));
        assert_eq!(config.connect_timeout, Duration::from_secs(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn daily_config_uses_longer_connect_timeout() {
        let config = DailyExportConfig::default();
        assert_eq!(config.endpoint, DAILY_EXPORT_ENDPOINT);
        assert_eq!(config.http.connect_timeout, Duration::from_secs(8));
        assert_eq!(config.http.timeout, Duration::from_secs(16));
    }

    #[test]
    fn zero_timeout_is_rejected_with_key() {
        let config = HttpConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };

        match config.validate().unwrap_err() {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("timeout")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_connect_timeout_is_rejected_with_key() {
        let config = HttpConfig {
            connect_timeout: Duration::ZERO,
            ..Default::default()
        };

        match config.validate().unwrap_err() {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("connect_timeout")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn custom_config_requires_credentials() {
        assert!(CustomExportConfig::new("app", "token").validate().is_ok());

        let err = CustomExportConfig::new("  ", "token").validate().unwrap_err();
        assert!(err.to_string().contains("app_id"));

        let err = CustomExportConfig::new("app", "").validate().unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn custom_config_rejects_non_http_endpoint() {
        let mut config = CustomExportConfig::new("app", "token");
        config.endpoint = "ftp://example.com/logs".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn custom_config_debug_redacts_token() {
        let config = CustomExportConfig::new("app-1", "secret-token");
        let debug = format!("{config:?}");
        assert!(debug.contains("app-1"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn custom_config_deserializes_with_defaults() {
        let config: CustomExportConfig =
            serde_json::from_str(r#"{"app_id":"a","access_token":"t"}"#).unwrap();

        assert_eq!(config.endpoint, CUSTOM_EXPORT_ENDPOINT);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn durations_use_integer_milliseconds() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"timeout_ms":2000,"connect_timeout_ms":1000}"#).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout_ms"], 2000);
        assert_eq!(json["connect_timeout_ms"], 1000);
    }

    #[test]
    fn sub_second_timeout_survives_round_trip() {
        let config = HttpConfig {
            timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_millis(1500),
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: HttpConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, config);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn sub_millisecond_timeout_is_rejected() {
        let config = HttpConfig {
            timeout: Duration::from_micros(500),
            ..Default::default()
        };

        match config.validate().unwrap_err() {
            Error::Config { key, message } => {
                assert_eq!(key.as_deref(), Some("timeout"));
                assert!(message.contains("1ms"), "{message}");
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn duration_rejects_string_instead_of_integer() {
        let result = serde_json::from_str::<HttpConfig>(r#"{"timeout_ms":"16s"}"#);
        assert!(result.is_err());
    }
}
