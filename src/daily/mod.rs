//! Daily export client
//!
//! One request per day: the response lists the download locations of that day's files for
//! every report type. There is no job to poll.

pub mod message;

pub use message::{DailyExportRequest, DailyExportResponse};

use crate::codec;
use crate::config::DailyExportConfig;
use crate::error::{Error, Result, Violations};
use crate::message::Message;
use crate::transport::{HEADER_ACCEPT, HEADER_CONTENT_TYPE, MEDIA_TYPE_APPLICATION_JSON, Transport};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the Branch daily export endpoint
#[derive(Clone, Debug)]
pub struct DailyExportClient {
    endpoint: Url,
    transport: Transport,
}

impl DailyExportClient {
    /// Create a client from a validated configuration
    pub fn new(config: DailyExportConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            Error::config("endpoint", format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        Ok(Self {
            endpoint,
            transport: Transport::new(&config.http)?,
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

    /// Fetch the export locations for the requested day
    pub async fn request_export(
        &self,
        request: &DailyExportRequest,
    ) -> Result<DailyExportResponse> {
        Violations::into_result(request.validate())?;
        let body = codec::to_json(request)?;

        debug!(export_date = %request.export_date(), "requesting daily export");
        let http_request = self
            .transport
            .post(self.endpoint.clone())
            .header(HEADER_CONTENT_TYPE, MEDIA_TYPE_APPLICATION_JSON)
            .header(HEADER_ACCEPT, MEDIA_TYPE_APPLICATION_JSON)
            .body(body);
        let response: DailyExportResponse = self.transport.send_json(http_request).await?;

        debug!(
            report_types = response.paths_for_all_report_types().len(),
            "daily export received"
        );
        Ok(response)
    }
}
