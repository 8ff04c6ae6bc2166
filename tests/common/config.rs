//! Test configuration helpers for loading .env credentials and creating test clients

use branch_export::{
    CustomExportClient, CustomExportConfig, DailyExportClient, DailyExportConfig,
};
use wiremock::MockServer;

/// App id used against mock servers
pub const MOCK_APP_ID: &str = "app-mock";
/// Access token used against mock servers
pub const MOCK_ACCESS_TOKEN: &str = "token-mock";

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Load custom export credentials from environment variables
///
/// Required environment variables:
/// - `BRANCH_APP_ID` - Branch app id
/// - `BRANCH_ACCESS_TOKEN` - API access token with export permission
///
/// Optional environment variables:
/// - `BRANCH_EXPORT_ENDPOINT` - Job submission endpoint (default: production)
pub fn load_custom_config() -> Result<CustomExportConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let app_id = std::env::var("BRANCH_APP_ID")
        .map_err(|_| ConfigError("BRANCH_APP_ID not set in environment".to_string()))?;

    let access_token = std::env::var("BRANCH_ACCESS_TOKEN")
        .map_err(|_| ConfigError("BRANCH_ACCESS_TOKEN not set in environment".to_string()))?;

    let mut config = CustomExportConfig::new(app_id, access_token);
    if let Ok(endpoint) = std::env::var("BRANCH_EXPORT_ENDPOINT") {
        config.endpoint = endpoint;
    }
    Ok(config)
}

/// Load daily export credentials (`BRANCH_KEY`, `BRANCH_SECRET`) from environment variables
pub fn load_daily_credentials() -> Result<(String, String), ConfigError> {
    dotenvy::dotenv().ok();

    let key = std::env::var("BRANCH_KEY")
        .map_err(|_| ConfigError("BRANCH_KEY not set in environment".to_string()))?;
    let secret = std::env::var("BRANCH_SECRET")
        .map_err(|_| ConfigError("BRANCH_SECRET not set in environment".to_string()))?;

    Ok((key, secret))
}

/// Create a custom export client configured for live API testing
pub fn create_live_client() -> Result<CustomExportClient, ConfigError> {
    let config = load_custom_config()?;
    CustomExportClient::new(config)
        .map_err(|e| ConfigError(format!("Failed to create client: {}", e)))
}

/// Create a custom export client with a bad access token for auth failure tests
pub fn create_client_bad_token() -> Result<CustomExportClient, ConfigError> {
    let mut config = load_custom_config()?;
    config.access_token = "invalid_token_12345".to_string();
    CustomExportClient::new(config)
        .map_err(|e| ConfigError(format!("Failed to create client: {}", e)))
}

/// Create a custom export client whose endpoint points at a mock server
pub fn create_mock_client(server: &MockServer) -> CustomExportClient {
    let mut config = CustomExportConfig::new(MOCK_APP_ID, MOCK_ACCESS_TOKEN);
    config.endpoint = format!("{}/v2/logs", server.uri());
    CustomExportClient::new(config).unwrap()
}

/// Create a daily export client whose endpoint points at a mock server
pub fn create_mock_daily_client(server: &MockServer) -> DailyExportClient {
    DailyExportClient::new(DailyExportConfig {
        endpoint: format!("{}/v3/export", server.uri()),
        ..Default::default()
    })
    .unwrap()
}

/// Check if live custom export credentials are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("BRANCH_APP_ID").is_ok() && std::env::var("BRANCH_ACCESS_TOKEN").is_ok()
}

/// Check if live daily export credentials are available
pub fn has_daily_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("BRANCH_KEY").is_ok() && std::env::var("BRANCH_SECRET").is_ok()
}

/// Skip test if credentials are not available
#[macro_export]
macro_rules! skip_if_no_credentials {
    () => {
        if !$crate::common::has_live_credentials() {
            eprintln!("Skipping test: Branch credentials not found in .env");
            return;
        }
    };
}
