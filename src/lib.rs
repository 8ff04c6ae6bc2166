//! # branch-export
//!
//! Async client library for the Branch analytics export APIs.
//!
//! ## Design Philosophy
//!
//! branch-export is designed to be:
//! - **Typed at the edges** - requests are validated before they leave the process
//! - **Lenient on input** - undeclared response members are kept, never rejected
//! - **Library-first** - no CLI, no logging subscriber, no background tasks
//! - **Explicit** - exactly one HTTP exchange per call; polling and retries belong to the caller
//!
//! ## Quick Start
//!
//! ```no_run
//! use branch_export::{
//!     CustomExportClient, CustomExportConfig, ExportRequest, ExportRequestParams,
//! };
//! use chrono::NaiveDate;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CustomExportClient::new(CustomExportConfig::new("app-id", "access-token"))?;
//!
//!     let day = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
//!     let request = ExportRequest::new(ExportRequestParams::new(
//!         "eo_open",
//!         day.and_hms_opt(0, 0, 0).ok_or("bad time")?,
//!         day.and_hms_opt(23, 59, 59).ok_or("bad time")?,
//!         ["timestamp", "name"],
//!     ))?;
//!
//!     let response = client.submit_export(&request).await?;
//!     if response.has_errors() {
//!         return Err(format!("rejected: {:?}", response.errors()).into());
//!     }
//!
//!     // Poll with a cap; the server needs a while to prepare the file
//!     let mut status = client.check_status(&response).await?;
//!     for _ in 0..128 {
//!         if status.is_completed() {
//!             break;
//!         }
//!         tokio::time::sleep(Duration::from_secs(16)).await;
//!         status = client.check_status(&response).await?;
//!     }
//!
//!     let rows = client
//!         .download_and_read_lines(&status, |mut lines| async move {
//!             let mut rows = 0usize;
//!             while lines.next_line().await?.is_some() {
//!                 rows += 1;
//!             }
//!             Ok::<_, branch_export::Error>(rows)
//!         })
//!         .await?;
//!     println!("exported {rows} rows");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// JSON encoding and decoding of messages
pub mod codec;
/// Configuration types
pub mod config;
/// Custom export job client and messages
pub mod custom;
/// Daily export client and messages
pub mod daily;
/// Error types
pub mod error;
/// Unknown-fields bag and the shared message contract
pub mod message;
/// HTTP transport adapter
pub mod transport;

// Re-export commonly used types
pub use config::{CustomExportConfig, DailyExportConfig, HttpConfig};
pub use custom::{
    CustomExportClient, ExportLines, ExportRequest, ExportRequestParams, ExportResponse,
    ExportStatus, MAX_LIMIT, ResponseFormat,
};
pub use daily::{DailyExportClient, DailyExportRequest, DailyExportResponse};
pub use error::{Error, Result, Violation, Violations};
pub use message::{Message, UnknownFields};
pub use transport::BodyReader;

/// Named time zone of an export window
pub use chrono_tz::Tz;
