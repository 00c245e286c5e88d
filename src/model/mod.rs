pub mod mock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A certificate validity bound as it came off the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CertDate {
    Missing,
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl CertDate {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        match parse_date(raw) {
            Some(at) => Self::Parsed(at),
            None => Self::Unparsed(raw.to_string()),
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Parsed(at) => Some(*at),
            _ => None,
        }
    }

    /// Milliseconds since the epoch; anything unresolvable sorts as the epoch.
    pub fn sort_key(&self) -> i64 {
        self.instant().map(|at| at.timestamp_millis()).unwrap_or(0)
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Canonical certificate shape used everywhere past ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub common_name: Option<String>,
    pub serial_number: Option<String>,
    pub valid_from: CertDate,
    pub valid_until: CertDate,
}

impl Certificate {
    pub fn display_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn matches(&self, needle_lower: &str) -> bool {
        let name = self.display_name().unwrap_or_default().to_lowercase();
        let serial = self.serial().unwrap_or_default().to_lowercase();
        name.contains(needle_lower) || serial.contains(needle_lower)
    }
}

/// Wire shape accepted from the admin API. Both the step-ca style and the
/// x509 style field names are read; the first non-empty one wins.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawCertificate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub common_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub valid_from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub not_before: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub valid_until: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub not_after: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl From<RawCertificate> for Certificate {
    fn from(raw: RawCertificate) -> Self {
        let valid_from = raw.valid_from.or(raw.not_before);
        let valid_until = raw.valid_until.or(raw.not_after);
        Self {
            common_name: raw.common_name.or(raw.subject),
            serial_number: raw.serial_number.or(raw.serial),
            valid_from: CertDate::parse(valid_from.as_deref()),
            valid_until: CertDate::parse(valid_until.as_deref()),
        }
    }
}

/// Why an admin API body could not be turned into a certificate list.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("body is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a certificate list, got {0}")]
    Shape(&'static str),

    #[error("certificate entry {0} is null")]
    NullEntry(usize),
}

/// Decodes a `/api/admin/certificates` body. Accepts `{"certificates": [...]}`
/// or a bare array. Anything else is a shape error, as is a `null` entry.
pub fn parse_certificates_payload(body: &str) -> Result<Vec<Certificate>, PayloadError> {
    let entries = match serde_json::from_str::<Value>(body)? {
        Value::Array(entries) => entries,
        Value::Object(mut envelope) => match envelope.remove("certificates") {
            Some(Value::Array(entries)) => entries,
            Some(other) => return Err(PayloadError::Shape(json_kind(&other))),
            None => return Err(PayloadError::Shape("object without certificates")),
        },
        other => return Err(PayloadError::Shape(json_kind(&other))),
    };

    let mut out = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        if entry.is_null() {
            return Err(PayloadError::NullEntry(idx));
        }
        if !entry.is_object() {
            tracing::warn!(index = idx, kind = json_kind(&entry), "skipping non-object certificate entry");
            continue;
        }
        match serde_json::from_value::<RawCertificate>(entry) {
            Ok(raw) => out.push(Certificate::from(raw)),
            Err(e) => tracing::warn!(index = idx, error = %e, "skipping malformed certificate entry"),
        }
    }
    Ok(out)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
