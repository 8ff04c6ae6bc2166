//! Custom export job protocol, split into focused submodules.
//!
//! A custom export is a three-step job:
//! 1. [`CustomExportClient::submit_export`] posts an [`ExportRequest`] and yields an
//!    [`ExportResponse`] carrying a handle and a status URL
//! 2. [`CustomExportClient::check_status`] polls that URL for an [`ExportStatus`] until it
//!    reports `complete`
//! 3. [`CustomExportClient::read_exported`] streams the finished file, or one of the helpers in
//!    [`download`] materializes it locally
//!
//! Message types live in [`request`], [`response`] and [`status`].

pub mod download;
pub mod request;
pub mod response;
pub mod status;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use download::ExportLines;
pub use request::{ExportRequest, ExportRequestParams, MAX_LIMIT, ResponseFormat};
pub use response::ExportResponse;
pub use status::ExportStatus;

use crate::codec;
use crate::config::CustomExportConfig;
use crate::error::{Error, Result, Violations};
use crate::message::{Message, is_blank};
use crate::transport::{
    BodyReader, HEADER_ACCEPT, HEADER_ACCESS_TOKEN, HEADER_CONTENT_TYPE,
    MEDIA_TYPE_APPLICATION_JSON, Transport,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Client for Branch custom export jobs
///
/// Cloning is cheap; clones share the underlying HTTP session.
#[derive(Clone)]
pub struct CustomExportClient {
    app_id: String,
    access_token: String,
    endpoint: Url,
    transport: Transport,
}

impl fmt::Debug for CustomExportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomExportClient")
            .field("app_id", &self.app_id)
            .field("access_token", &"***REDACTED***")
            .field("endpoint", &self.endpoint.as_str())
            .field("transport", &self.transport)
            .finish()
    }
}

impl CustomExportClient {
    /// Create a client from a validated configuration
    pub fn new(config: CustomExportConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            Error::config("endpoint", format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        let transport = Transport::new(&config.http)?;
        Ok(Self {
            app_id: config.app_id,
            access_token: config.access_token,
            endpoint,
            transport,
        })
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    /// Connect timeout
    pub fn connect_timeout(&self) -> Duration {
        self.transport.connect_timeout()
    }

    /// Change the request timeout for subsequent requests
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.transport.set_timeout(timeout)
    }

    /// Change the connect timeout for subsequent requests
    pub fn set_connect_timeout(&mut self, connect_timeout: Duration) -> Result<()> {
        self.transport.set_connect_timeout(connect_timeout)
    }

    /// Submit an export job
    ///
    /// The request is re-validated before anything is sent. A 200 reply may still carry
    /// server-side errors; check [`ExportResponse::has_errors`] before polling.
    pub async fn submit_export(&self, request: &ExportRequest) -> Result<ExportResponse> {
        Violations::into_result(request.validate())?;
        let body = codec::to_json(request)?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("app_id", &self.app_id);

        debug!(report_type = request.report_type(), "submitting export job");
        let http_request = self
            .transport
            .post(url)
            .header(HEADER_CONTENT_TYPE, MEDIA_TYPE_APPLICATION_JSON)
            .header(HEADER_ACCEPT, MEDIA_TYPE_APPLICATION_JSON)
            .header(HEADER_ACCESS_TOKEN, &self.access_token)
            .body(body);
        let response: ExportResponse = self.transport.send_json(http_request).await?;

        if response.has_errors() {
            warn!(report_type = request.report_type(), "export job submission reported errors");
        } else {
            debug!(handle = ?response.handle(), "export job submitted");
        }
        Ok(response)
    }

    /// Fetch the current status of a submitted job
    ///
    /// Fails with [`Error::Precondition`] when the response carries errors or has no usable
    /// status URL; no request is sent in that case.
    pub async fn check_status(&self, response: &ExportResponse) -> Result<ExportStatus> {
        if let Some(errors) = response.errors() {
            return Err(Error::Precondition(format!(
                "export response has errors: {errors}"
            )));
        }
        let url = parse_url("export_job_status_url", response.export_job_status_url())?;

        let request = self
            .transport
            .get(url)
            .header(HEADER_ACCEPT, MEDIA_TYPE_APPLICATION_JSON)
            .header(HEADER_ACCESS_TOKEN, &self.access_token);
        let status: ExportStatus = self.transport.send_json(request).await?;

        debug!(
            handle = ?response.handle(),
            status = ?status.status(),
            lines_exported = status.lines_exported(),
            "export job status"
        );
        Ok(status)
    }

    /// Open the exported file of a completed job as a byte stream
    ///
    /// The file is served from a pre-signed URL, so no credentials are attached. The caller owns
    /// the returned reader; dropping it releases the connection.
    pub async fn read_exported(&self, status: &ExportStatus) -> Result<BodyReader> {
        let url = completed_url(status)?;
        self.transport.send_reader(self.transport.get(url)).await
    }
}

/// Download URL of a completed job, or a precondition failure
pub(crate) fn completed_url(status: &ExportStatus) -> Result<Url> {
    if !status.is_completed() {
        return Err(Error::Precondition(format!(
            "export is not complete (status: {})",
            status.status().unwrap_or("<none>")
        )));
    }
    parse_url("response_url", status.response_url())
}

fn parse_url(name: &str, value: Option<&str>) -> Result<Url> {
    let value = match value {
        Some(v) if !is_blank(Some(v)) => v.trim(),
        _ => return Err(Error::Precondition(format!("{name} is missing"))),
    };
    Url::parse(value).map_err(|e| Error::Precondition(format!("{name} '{value}' is invalid: {e}")))
}
