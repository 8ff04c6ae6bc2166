//! Custom export job submission response

use crate::error::Violation;
use crate::message::{Message, UnknownFields, is_blank};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the member Branch uses to report request-level errors
pub const ERRORS_FIELD: &str = "errors";

/// Reply to a job submission
///
/// Branch reports a rejected submission with status 200 and an `errors` member instead of the
/// job attributes, so both attributes are optional and [`has_errors`](Self::has_errors) must be
/// checked before polling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export_job_status_url: Option<String>,
    #[serde(flatten)]
    unknown: UnknownFields,
}

impl ExportResponse {
    /// Response for an accepted job
    pub fn new(handle: impl Into<String>, export_job_status_url: impl Into<String>) -> Self {
        Self {
            handle: Some(handle.into()),
            export_job_status_url: Some(export_job_status_url.into()),
            unknown: UnknownFields::new(),
        }
    }

    /// Job handle
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// URL to poll for the job status
    pub fn export_job_status_url(&self) -> Option<&str> {
        self.export_job_status_url.as_deref()
    }

    /// The `errors` member, verbatim
    pub fn errors(&self) -> Option<&Value> {
        self.unknown.get(ERRORS_FIELD)
    }

    /// Whether the server reported errors for the submission
    pub fn has_errors(&self) -> bool {
        self.errors().is_some()
    }

    /// Like [`has_errors`](Self::has_errors), handing the errors to `on_errors` when present
    pub fn has_errors_with<F>(&self, on_errors: F) -> bool
    where
        F: FnOnce(&Value),
    {
        match self.errors() {
            Some(errors) => {
                on_errors(errors);
                true
            }
            None => false,
        }
    }
}

impl Message for ExportResponse {
    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    fn validate(&self) -> Vec<Violation> {
        if self.has_errors() {
            return Vec::new();
        }
        let mut violations = Vec::new();
        if is_blank(self.handle()) {
            violations.push(Violation::new("handle", "must not be blank"));
        }
        if is_blank(self.export_job_status_url()) {
            violations.push(Violation::new("export_job_status_url", "must not be blank"));
        }
        violations
    }
}
