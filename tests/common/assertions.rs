//! Poll helpers and custom assertions for integration tests

use branch_export::{CustomExportClient, Error, ExportResponse, ExportStatus};
use std::time::Duration;

/// Result of polling an export job
#[derive(Debug)]
pub enum WaitResult {
    /// The job completed
    Completed(ExportStatus),
    /// A status check failed
    Failed(Error),
    /// The attempt cap was reached before completion
    Timeout {
        /// Number of status checks performed
        attempts: usize,
    },
}

/// Poll a submitted job until it completes, sleeping `interval` between checks
///
/// # Arguments
/// * `client` - The client that submitted the job
/// * `response` - The submission response
/// * `max_attempts` - Maximum number of status checks
/// * `interval` - Pause between two checks
pub async fn wait_for_completion(
    client: &CustomExportClient,
    response: &ExportResponse,
    max_attempts: usize,
    interval: Duration,
) -> WaitResult {
    for attempt in 1..=max_attempts {
        match client.check_status(response).await {
            Ok(status) if status.is_completed() => return WaitResult::Completed(status),
            Ok(status) => {
                println!(
                    "attempt {attempt}: status={:?} lines_exported={}",
                    status.status(),
                    status.lines_exported()
                );
            }
            Err(e) => return WaitResult::Failed(e),
        }
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    WaitResult::Timeout {
        attempts: max_attempts,
    }
}

/// Assert that an error is an unsuccessful status with the expected code
pub fn assert_unsuccessful_status(err: &Error, expected: u16) {
    assert_eq!(
        err.status_code(),
        Some(expected),
        "expected unsuccessful status {expected}, got {err:?}"
    );
}

/// Assert that an error is a precondition failure
pub fn assert_precondition(err: &Error) {
    assert!(
        matches!(err, Error::Precondition(_)),
        "expected precondition failure, got {err:?}"
    );
}
