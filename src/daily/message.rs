//! Daily export request and response messages

use crate::error::{Error, Result, Violation, Violations};
use crate::message::{Message, UnknownFields, is_blank};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix shared by every event-ontology report type key
pub const REPORT_TYPE_PREFIX: &str = "eo_";

/// Body members written by [`DailyExportRequest`] itself
const DECLARED_FIELDS: [&str; 3] = ["branch_key", "branch_secret", "export_date"];

/// Request for the export files of one day
///
/// Credentials travel in the body; `Debug` output redacts both of them.
#[derive(Clone, PartialEq, Serialize)]
pub struct DailyExportRequest {
    branch_key: String,
    branch_secret: String,
    export_date: NaiveDate,
    #[serde(flatten)]
    unknown: UnknownFields,
}

impl DailyExportRequest {
    /// Validate the credentials and build the request
    pub fn new(
        branch_key: impl Into<String>,
        branch_secret: impl Into<String>,
        export_date: NaiveDate,
    ) -> Result<Self> {
        let request = Self {
            branch_key: branch_key.into(),
            branch_secret: branch_secret.into(),
            export_date,
            unknown: UnknownFields::new(),
        };
        Violations::into_result(request.validate())?;
        Ok(request)
    }

    /// Add a member that is sent along with the declared attributes
    ///
    /// A name that collides with a declared attribute makes the request invalid.
    pub fn with_unknown_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.unknown.insert(name, value);
        self
    }

    /// Branch key
    pub fn branch_key(&self) -> &str {
        &self.branch_key
    }

    /// Day whose exports are requested
    pub fn export_date(&self) -> NaiveDate {
        self.export_date
    }
}

impl fmt::Debug for DailyExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyExportRequest")
            .field("branch_key", &"***REDACTED***")
            .field("branch_secret", &"***REDACTED***")
            .field("export_date", &self.export_date)
            .field("unknown", &self.unknown)
            .finish()
    }
}

impl Message for DailyExportRequest {
    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if is_blank(Some(&self.branch_key)) {
            violations.push(Violation::new("branch_key", "must not be blank"));
        }
        if is_blank(Some(&self.branch_secret)) {
            violations.push(Violation::new("branch_secret", "must not be blank"));
        }
        violations.extend(self.unknown.shadowing(&DECLARED_FIELDS));
        violations
    }
}

/// Download locations of one day's exports, keyed by report type
///
/// The response has no declared attributes; every member lives in the unknown-fields bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyExportResponse {
    #[serde(flatten)]
    unknown: UnknownFields,
}

impl DailyExportResponse {
    /// Download paths for one report type
    ///
    /// Empty when the report type is absent or its value is not an array.
    pub fn paths(&self, report_type: &str) -> Vec<String> {
        match self.unknown.get(report_type) {
            Some(Value::Array(items)) => items.iter().map(path_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Download paths of every `eo_` report type whose value is an array
    pub fn paths_for_all_report_types(&self) -> BTreeMap<String, Vec<String>> {
        self.unknown
            .iter()
            .filter(|(name, value)| name.starts_with(REPORT_TYPE_PREFIX) && value.is_array())
            .map(|(name, _)| (name.clone(), self.paths(name)))
            .collect()
    }
}

impl Message for DailyExportResponse {
    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    fn validate(&self) -> Vec<Violation> {
        Vec::new()
    }
}

impl TryFrom<Value> for DailyExportResponse {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::Deserialization)
    }
}

fn path_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
