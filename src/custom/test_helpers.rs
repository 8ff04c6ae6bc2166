//! Shared test helpers for creating CustomExportClient instances against a mock server.

use crate::config::CustomExportConfig;
use crate::custom::{CustomExportClient, ExportRequest, ExportRequestParams, ExportStatus};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use wiremock::MockServer;

pub(crate) const APP_ID: &str = "app-1";
pub(crate) const ACCESS_TOKEN: &str = "token-1";
pub(crate) const LOGS_PATH: &str = "/v2/logs";

/// Client whose submission endpoint points at `server`
pub(crate) fn test_client(server: &MockServer) -> CustomExportClient {
    let mut config = CustomExportConfig::new(APP_ID, ACCESS_TOKEN);
    config.endpoint = format!("{}{}", server.uri(), LOGS_PATH);
    CustomExportClient::new(config).unwrap()
}

/// A one-day `eo_open` request in UTC
pub(crate) fn sample_request() -> ExportRequest {
    let mut params = ExportRequestParams::new(
        "eo_open",
        local("2024-01-01T00:00"),
        local("2024-01-02T00:00"),
        ["timestamp", "name"],
    );
    params.timezone = Some(Tz::UTC);
    params.limit = 4;
    ExportRequest::new(params).unwrap()
}

pub(crate) fn local(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

/// Completed status whose file is served by `server` at `path`
pub(crate) fn completed_status(server: &MockServer, path: &str) -> ExportStatus {
    ExportStatus::completed(2, format!("{}{}", server.uri(), path))
}
