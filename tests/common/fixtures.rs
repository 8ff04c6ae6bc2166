//! Mock Branch endpoints and export file contents

use branch_export::{ExportRequest, ExportRequestParams};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Export job handle served by [`mount_export_job`]
pub const JOB_HANDLE: &str = "abc";

/// Path of the exported file served by [`mount_export_job`]
pub const EXPORT_FILE_PATH: &str = "/exports/abc.json";

/// JSON-lines export with three events
pub const EXPORT_JSON_LINES: &str = concat!(
    "{\"timestamp\":1704067200000,\"name\":\"OPEN\"}\n",
    "{\"timestamp\":1704067260000,\"name\":\"OPEN\"}\n",
    "{\"timestamp\":1704067320000,\"name\":\"INSTALL\"}\n",
);

/// A one-day `eo_open` request in UTC
pub fn eo_open_request() -> ExportRequest {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut params = ExportRequestParams::new(
        "eo_open",
        day.and_hms_opt(0, 0, 0).unwrap(),
        day.and_hms_opt(23, 59, 59).unwrap(),
        ["timestamp", "name"],
    );
    params.timezone = Some(Tz::UTC);
    ExportRequest::new(params).unwrap()
}

/// Mount a full export job: submission, `pending_polls` running statuses, then completion
pub async fn mount_export_job(server: &MockServer, pending_polls: u64) {
    let status_path = format!("/v2/logs/{JOB_HANDLE}");

    Mock::given(method("POST"))
        .and(path("/v2/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "handle": JOB_HANDLE,
            "export_job_status_url": format!("{}{status_path}", server.uri()),
        })))
        .mount(server)
        .await;

    if pending_polls > 0 {
        Mock::given(method("GET"))
            .and(path(status_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "status": "running",
                "lines_exported": 1,
            })))
            .up_to_n_times(pending_polls)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "complete",
            "lines_exported": 3,
            "response_url": format!("{}{EXPORT_FILE_PATH}", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(EXPORT_FILE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_JSON_LINES))
        .mount(server)
        .await;
}

/// Mount a job whose status never leaves `running`
pub async fn mount_stuck_export_job(server: &MockServer) {
    let status_path = format!("/v2/logs/{JOB_HANDLE}");

    Mock::given(method("POST"))
        .and(path("/v2/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "handle": JOB_HANDLE,
            "export_job_status_url": format!("{}{status_path}", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
        .mount(server)
        .await;
}
