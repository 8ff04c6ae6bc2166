//! Custom export job request

use crate::error::{Error, Result, Violation, Violations};
use crate::message::{Message, UnknownFields, is_blank};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Default (and vendor-documented maximum) value for `limit`
///
/// Branch may raise the ceiling, so larger values are not rejected.
pub const MAX_LIMIT: u32 = 2_000_000;

/// Body members written by [`ExportRequest`] itself
const DECLARED_FIELDS: [&str; 8] = [
    "organization_id",
    "report_type",
    "start_date",
    "end_date",
    "fields",
    "limit",
    "response_format",
    "filter",
];

/// Format of the exported file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// One JSON object per line
    Json,
    /// Comma separated values with a header row
    Csv,
}

impl ResponseFormat {
    /// Wire name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(Error::Validation(Violations(vec![Violation::new(
                "response_format",
                format!("must be one of json, csv (got '{other}')"),
            )]))),
        }
    }
}

/// Inputs for [`ExportRequest::new`]
///
/// [`ExportRequestParams::new`] fills the optional attributes with their defaults; adjust the
/// public fields afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequestParams {
    /// Report type, e.g. `eo_open` (required, not blank)
    pub report_type: String,

    /// Start of the export window in local time (required, before `end_date_local`)
    pub start_date_local: NaiveDateTime,

    /// End of the export window in local time (required)
    pub end_date_local: NaiveDateTime,

    /// Zone of the local timestamps, e.g. `America/New_York` (default: `None`, the system
    /// local zone)
    ///
    /// Each timestamp resolves with the offset in effect at that instant.
    pub timezone: Option<Tz>,

    /// Field names to export (required, non-empty, no blank names)
    pub fields: BTreeSet<String>,

    /// Maximum number of exported rows (default: [`MAX_LIMIT`], positive)
    pub limit: u32,

    /// Format of the exported file (default: `None`, server default)
    pub response_format: Option<ResponseFormat>,

    /// Opaque filter terms (default: `None`)
    pub filter: Option<Vec<Value>>,

    /// Organization id (default: `None`)
    pub organization_id: Option<String>,

    /// Extra members merged into the request body (default: empty)
    pub unknown: UnknownFields,
}

impl ExportRequestParams {
    /// Parameters with the required attributes set and everything else defaulted
    pub fn new<I, S>(
        report_type: impl Into<String>,
        start_date_local: NaiveDateTime,
        end_date_local: NaiveDateTime,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            report_type: report_type.into(),
            start_date_local,
            end_date_local,
            timezone: None,
            fields: fields.into_iter().map(Into::into).collect(),
            limit: MAX_LIMIT,
            response_format: None,
            filter: None,
            organization_id: None,
            unknown: UnknownFields::new(),
        }
    }

    /// Whether the local start timestamp precedes the local end timestamp
    pub fn is_start_date_before_end_date(&self) -> bool {
        self.start_date_local < self.end_date_local
    }

    /// Every invariant these parameters violate
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if is_blank(Some(&self.report_type)) {
            violations.push(Violation::new("report_type", "must not be blank"));
        }
        if self.fields.is_empty() {
            violations.push(Violation::new("fields", "must not be empty"));
        } else if self.fields.iter().any(|f| is_blank(Some(f))) {
            violations.push(Violation::new("fields", "must not contain blank names"));
        }
        if self.limit == 0 {
            violations.push(Violation::new("limit", "must be positive"));
        }
        if !self.is_start_date_before_end_date() {
            violations.push(Violation::new(
                "start_date_local",
                "must be before end_date_local",
            ));
        }
        if to_utc(self.start_date_local, self.timezone).is_none() {
            violations.push(Violation::new(
                "start_date_local",
                format!("{} does not exist in the timezone", self.start_date_local),
            ));
        }
        if to_utc(self.end_date_local, self.timezone).is_none() {
            violations.push(Violation::new(
                "end_date_local",
                format!("{} does not exist in the timezone", self.end_date_local),
            ));
        }
        violations.extend(self.unknown.shadowing(&DECLARED_FIELDS));
        violations
    }
}

/// A validated request to start a custom export job
///
/// Only the derived UTC instants are serialized; the local timestamps and timezone stay on the
/// client side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_id: Option<String>,
    report_type: String,
    #[serde(serialize_with = "serialize_utc_millis")]
    start_date: DateTime<Utc>,
    #[serde(serialize_with = "serialize_utc_millis")]
    end_date: DateTime<Utc>,
    fields: BTreeSet<String>,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Vec<Value>>,
    #[serde(skip)]
    start_date_local: NaiveDateTime,
    #[serde(skip)]
    end_date_local: NaiveDateTime,
    #[serde(skip)]
    timezone: Option<Tz>,
    #[serde(flatten)]
    unknown: UnknownFields,
}

impl ExportRequest {
    /// Validate the parameters and derive the UTC window
    ///
    /// Fails with [`Error::Validation`] listing every violated invariant.
    pub fn new(params: ExportRequestParams) -> Result<Self> {
        Violations::into_result(params.validate())?;

        let start = to_utc(params.start_date_local, params.timezone);
        let end = to_utc(params.end_date_local, params.timezone);
        let (Some(start_date), Some(end_date)) = (start, end) else {
            // validate() already reports unresolvable timestamps
            return Err(Error::Validation(Violations(vec![Violation::new(
                "start_date_local",
                "could not be resolved in the timezone",
            )])));
        };
        if start_date >= end_date {
            // Local order can invert across a DST fold
            return Err(Error::Validation(Violations(vec![Violation::new(
                "start_date",
                format!("{start_date} is not before {end_date} in UTC"),
            )])));
        }

        Ok(Self {
            organization_id: params.organization_id,
            report_type: params.report_type,
            start_date,
            end_date,
            fields: params.fields,
            limit: params.limit,
            response_format: params.response_format,
            filter: params.filter,
            start_date_local: params.start_date_local,
            end_date_local: params.end_date_local,
            timezone: params.timezone,
            unknown: params.unknown,
        })
    }

    /// Report type
    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    /// Start of the window as transmitted (UTC, millisecond precision)
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// End of the window as transmitted (UTC, millisecond precision)
    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Whether the transmitted start instant precedes the end instant
    pub fn is_start_date_before_end_date(&self) -> bool {
        self.start_date < self.end_date
    }

    /// Start of the window as given by the caller
    pub fn start_date_local(&self) -> NaiveDateTime {
        self.start_date_local
    }

    /// End of the window as given by the caller
    pub fn end_date_local(&self) -> NaiveDateTime {
        self.end_date_local
    }

    /// Zone the local timestamps were resolved in; `None` means the system local zone
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Exported field names
    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    /// Maximum number of exported rows
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Requested file format
    pub fn response_format(&self) -> Option<ResponseFormat> {
        self.response_format
    }

    /// Filter terms
    pub fn filter(&self) -> Option<&[Value]> {
        self.filter.as_deref()
    }

    /// Organization id
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

impl Message for ExportRequest {
    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if is_blank(Some(&self.report_type)) {
            violations.push(Violation::new("report_type", "must not be blank"));
        }
        if self.fields.is_empty() || self.fields.iter().any(|f| is_blank(Some(f))) {
            violations.push(Violation::new("fields", "must be non-empty without blank names"));
        }
        if self.limit == 0 {
            violations.push(Violation::new("limit", "must be positive"));
        }
        if !self.is_start_date_before_end_date() {
            violations.push(Violation::new("start_date", "must be before end_date"));
        }
        violations.extend(self.unknown.shadowing(&DECLARED_FIELDS));
        violations
    }
}

/// Resolve a local timestamp to a UTC instant truncated to milliseconds
///
/// Ambiguous timestamps (DST overlap) take the earlier instant; nonexistent ones (DST gap)
/// yield `None`.
fn to_utc(local: NaiveDateTime, timezone: Option<Tz>) -> Option<DateTime<Utc>> {
    let resolved = match timezone {
        Some(zone) => zone
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    };
    resolved.map(|dt| dt.trunc_subsecs(3))
}

fn serialize_utc_millis<S>(
    value: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
