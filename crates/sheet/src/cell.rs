use chrono::{NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};

/// Patterns applied when date and time cells are rendered to JSON strings.
///
/// Both are chrono strftime patterns. The defaults match ISO-8601 with
/// millisecond precision.
#[derive(Debug, Clone)]
pub struct ValueFormats {
    pub datetime: String,
    pub time: String,
}

impl Default for ValueFormats {
    fn default() -> Self {
        ValueFormats {
            datetime: "%Y-%m-%dT%H:%M:%S%.3f".to_string(),
            time: "%H:%M:%S%.3f".to_string(),
        }
    }
}

/// Normalized result of reading one cell.
///
/// Exactly one variant applies per cell. Missing cells and explicit blanks
/// both normalize to `Null` and serialize as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    /// `Error#<code>` marker for error-valued cells and unevaluable formulas.
    Error(String),
}

impl CellValue {
    /// Check if the value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Classify a plain numeric cell.
    ///
    /// Whole numbers in 32-bit range become integers; everything else keeps
    /// the raw floating value at full precision.
    #[must_use]
    pub fn from_number(value: f64) -> CellValue {
        if value.trunc() == value && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
            CellValue::Int(value as i64)
        } else {
            CellValue::Float(value)
        }
    }

    /// Classify a date-formatted numeric cell.
    ///
    /// A serial value of at most one day has no date component and collapses
    /// to a time of day. Without a decoded date-time from the backing
    /// library the cell degrades to plain numeric classification.
    #[must_use]
    pub fn from_serial_date(serial: f64, decoded: Option<NaiveDateTime>) -> CellValue {
        match decoded {
            Some(dt) if serial <= 1.0 => CellValue::Time(dt.time()),
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::from_number(serial),
        }
    }

    /// Convert to a JSON value using the supplied date/time patterns.
    #[must_use]
    pub fn to_json(&self, formats: &ValueFormats) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Int(i) => Value::Number(Number::from(*i)),
            CellValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::DateTime(dt) => Value::String(dt.format(&formats.datetime).to_string()),
            CellValue::Time(t) => Value::String(t.format(&formats.time).to_string()),
            CellValue::Error(marker) => Value::String(marker.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}
