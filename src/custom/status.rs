//! Custom export job status

use crate::error::Violation;
use crate::message::{Message, UnknownFields, is_blank};
use serde::{Deserialize, Serialize};

/// Status value of a finished job
pub const STATUS_COMPLETE: &str = "complete";

/// Snapshot of a job's progress, as returned by the status URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lines_exported: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_url: Option<String>,
    #[serde(flatten)]
    unknown: UnknownFields,
}

impl ExportStatus {
    /// Status of a finished job whose file is available at `response_url`
    pub fn completed(lines_exported: u64, response_url: impl Into<String>) -> Self {
        Self {
            code: Some(200),
            status: Some(STATUS_COMPLETE.to_string()),
            lines_exported: Some(lines_exported),
            response_url: Some(response_url.into()),
            unknown: UnknownFields::new(),
        }
    }

    /// Status of a job that is still running
    pub fn pending(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// Server-side code of the job
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// Job state, e.g. `pending`, `running` or `complete`
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Rows exported so far; absent counts as zero
    pub fn lines_exported(&self) -> u64 {
        self.lines_exported.unwrap_or(0)
    }

    /// Where the finished export can be downloaded
    pub fn response_url(&self) -> Option<&str> {
        self.response_url.as_deref()
    }

    /// Whether the job finished; this is an exact, case-sensitive match on `complete`
    pub fn is_completed(&self) -> bool {
        self.status() == Some(STATUS_COMPLETE)
    }
}

impl Message for ExportStatus {
    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if is_blank(self.status()) {
            violations.push(Violation::new("status", "must not be blank"));
        }
        if self.is_completed() && is_blank(self.response_url()) {
            violations.push(Violation::new(
                "response_url",
                "must not be blank once the export is complete",
            ));
        }
        violations
    }
}
