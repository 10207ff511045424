//! Date range values and their encoded form.
//!
//! A date property stores its value as compact JSON:
//!
//! ```text
//! {"from":1700000000000,"to":1700086400000}
//! {"from":1700000000000,"includeTime":true,"to":1700003600000}
//! ```
//!
//! Both `from` and `to` are Unix milliseconds. A value missing either bound is
//! *incomplete*; a value that isn't such an object is *malformed*. Callers on
//! the display path treat both the same way (the record is not shown), but the
//! distinction is kept for diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Why an encoded date range could not be decoded into a complete range.
#[derive(Debug, thiserror::Error)]
pub enum DateRangeError {
    #[error("date value is empty")]
    Empty,
    #[error("date value is not a JSON object")]
    NotAnObject,
    #[error("malformed date value: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("date range is missing `{0}`")]
    Incomplete(&'static str),
    #[error("`{field}` is not an instant: {value}")]
    NotAnInstant { field: &'static str, value: Number },
}

/// A complete `{from, to}` range in Unix milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: i64,
    pub to: i64,
    /// Whether the range carries a time of day, not just a date.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_time: bool,
}

/// Wire shape before completeness is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    #[serde(default)]
    from: Option<Number>,
    #[serde(default)]
    to: Option<Number>,
    #[serde(default)]
    include_time: Option<bool>,
}

impl DateRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            include_time: false,
        }
    }

    /// Builder: mark the range as carrying a time of day.
    pub fn with_include_time(mut self, include_time: bool) -> Self {
        self.include_time = include_time;
        self
    }

    /// Decode the stored property value.
    ///
    /// Integral floats (`1.7e12`) are accepted since the store may have
    /// written them from a float-typed runtime.
    pub fn decode(value: &str) -> Result<Self, DateRangeError> {
        if value.trim().is_empty() {
            return Err(DateRangeError::Empty);
        }
        if !value.trim_start().starts_with('{') {
            return Err(DateRangeError::NotAnObject);
        }
        let raw: RawDateRange = serde_json::from_str(value)?;
        let from = raw.from.ok_or(DateRangeError::Incomplete("from"))?;
        let to = raw.to.ok_or(DateRangeError::Incomplete("to"))?;
        Ok(Self {
            from: instant("from", from)?,
            to: instant("to", to)?,
            include_time: raw.include_time.unwrap_or(false),
        })
    }

    /// Encode for storage as a property value.
    pub fn encode(&self) -> String {
        let mut value = serde_json::json!({ "from": self.from, "to": self.to });
        if self.include_time {
            value["includeTime"] = serde_json::Value::Bool(true);
        }
        value.to_string()
    }
}

fn instant(field: &'static str, n: Number) -> Result<i64, DateRangeError> {
    if let Some(ms) = n.as_i64() {
        return Ok(ms);
    }
    match n.as_f64() {
        // i64::MAX as f64 rounds up to 2^63, which is out of range.
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(DateRangeError::NotAnInstant { field, value: n }),
    }
}

// ============================================================================
// Tests
// ============================================================================
