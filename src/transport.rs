//! HTTP transport adapter
//!
//! Wraps a [`reqwest::Client`] configured with the connect timeout. The request timeout bounds
//! each exchange up to the response headers; a streamed body may take as long as it needs.
//! Every client operation is an instance of the same pipeline:
//! send the request, require status 200, then either decode the body as JSON
//! ([`Transport::send_json`]) or hand it out as a byte stream ([`Transport::send_reader`]).
//! Nothing here retries.

use crate::codec;
use crate::config::{HttpConfig, validate_timeout};
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::{debug, error};
use url::Url;

/// `content-type` header name
pub const HEADER_CONTENT_TYPE: &str = "content-type";
/// `accept` header name
pub const HEADER_ACCEPT: &str = "accept";
/// `access-token` header name
pub const HEADER_ACCESS_TOKEN: &str = "access-token";
/// JSON media type
pub const MEDIA_TYPE_APPLICATION_JSON: &str = "application/json";

/// Raw response body exposed as an [`AsyncRead`](tokio::io::AsyncRead) byte stream
pub type BodyReader = StreamReader<BoxStream<'static, std::io::Result<Bytes>>, Bytes>;

/// Shared HTTP session with the configured timeouts
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Transport {
    /// Build a transport from validated timeouts
    pub fn new(config: &HttpConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
        })
    }

    /// Timeout for sending a request and receiving the response headers
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout applied when establishing a connection
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Change the request timeout; takes effect for the next request
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        validate_timeout("timeout", timeout)?;
        self.timeout = timeout;
        Ok(())
    }

    /// Change the connect timeout; rebuilds the underlying session
    pub fn set_connect_timeout(&mut self, connect_timeout: Duration) -> Result<()> {
        *self = Self::new(&HttpConfig {
            timeout: self.timeout,
            connect_timeout,
        })?;
        Ok(())
    }

    /// Start a GET request on the shared session
    pub fn get(&self, url: Url) -> RequestBuilder {
        self.client.get(url)
    }

    /// Start a POST request on the shared session
    pub fn post(&self, url: Url) -> RequestBuilder {
        self.client.post(url)
    }

    /// Perform exactly one exchange and require status 200
    ///
    /// Fails with [`Error::Timeout`] when the response headers do not arrive within the request
    /// timeout.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let url = without_query(request.url());
        debug!(method = %request.method(), %url, "sending request");

        let response = tokio::time::timeout(self.timeout, self.client.execute(request))
            .await
            .map_err(|_| {
                error!(timeout = ?self.timeout, %url, "no response within request timeout");
                Error::Timeout {
                    timeout: self.timeout,
                    url: url.to_string(),
                }
            })??;
        check_status_ok(response)
    }

    /// Send, require status 200, then decode the body leniently as `T`
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "decoding response body");
        codec::from_json(&body)
    }

    /// Send, require status 200, then expose the body as a byte stream
    pub async fn send_reader(&self, request: RequestBuilder) -> Result<BodyReader> {
        let response = self.send(request).await?;
        Ok(into_reader(response))
    }
}

/// Fail with [`Error::UnsuccessfulStatus`] unless the status is exactly 200
///
/// The body of a failed response is dropped unread.
pub fn check_status_ok(response: Response) -> Result<Response> {
    let code = response.status().as_u16();
    if code != 200 {
        let url = without_query(response.url());
        error!(status = code, %url, "unsuccessful status code");
        return Err(Error::UnsuccessfulStatus {
            code,
            url: url.to_string(),
        });
    }
    Ok(response)
}

fn into_reader(response: Response) -> BodyReader {
    let stream = response
        .bytes_stream()
        .map_err(std::io::Error::other)
        .boxed();
    StreamReader::new(stream)
}

fn without_query(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}
