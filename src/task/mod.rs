//! Task records and the coercion rules applied to raw form input.
//!
//! Form input never fails at this layer: anything that does not parse is
//! replaced by the field's default. Each default lives in its own named
//! coercion function so it can be tested on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Effort assumed when `estimated_hours` is missing or unusable.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

/// Importance assumed when `importance` is missing or unusable.
pub const DEFAULT_IMPORTANCE: i64 = 5;

/// Prefix marking ids generated on this side of the wire.
pub const LOCAL_ID_PREFIX: &str = "local_";

/// A unit of work submitted for prioritization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Batch-unique identifier. Bulk records may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable label.
    pub title: String,
    /// Deadline, if any. Serialized as `YYYY-MM-DD` or `null`.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Positive effort estimate in hours.
    pub estimated_hours: f64,
    /// Importance, nominally 1 through 10.
    pub importance: i64,
    /// Ids of the tasks this one depends on, in the order given.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// One entry of a submission batch.
///
/// Bulk entries are forwarded exactly as parsed; local entries are fully
/// coerced [`Task`]s. Both serialize to their bare JSON form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskRecord {
    /// An element of the bulk JSON array.
    Bulk(Value),
    /// A task from the local store.
    Local(Task),
}

impl TaskRecord {
    /// Title of the record, if it has a string one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Bulk(value) => value.get("title").and_then(Value::as_str),
            Self::Local(task) => Some(&task.title),
        }
    }
}

/// Raw field values as typed into the task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Title text.
    pub title: String,
    /// Due date text, expected as `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Estimated hours text.
    pub estimated_hours: Option<String>,
    /// Importance text.
    pub importance: Option<String>,
    /// Comma-separated dependency ids.
    pub dependencies: Option<String>,
}

impl TaskForm {
    /// Parses a one-line form description.
    ///
    /// The format is `title;due=YYYY-MM-DD;hours=N;importance=N;deps=a,b`.
    /// Every key is optional and the title may also be given as `title=...`.
    /// Unknown keys are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if no title is present.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let mut form = Self::default();
        for (index, segment) in line.split(';').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((key, value)) = segment.split_once('=') else {
                if index == 0 {
                    form.title = segment.to_string();
                } else {
                    tracing::warn!(segment, "ignoring task field without a key");
                }
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "title" => form.title = value,
                "due" | "due_date" => form.due_date = Some(value),
                "hours" | "estimated_hours" => form.estimated_hours = Some(value),
                "importance" => form.importance = Some(value),
                "deps" | "dependencies" => form.dependencies = Some(value),
                other => tracing::warn!(key = other, "ignoring unknown task field"),
            }
        }
        if form.title.trim().is_empty() {
            return Err(format!("task title is required: {line:?}"));
        }
        Ok(form)
    }
}

impl Task {
    /// Builds a task from form input, applying every default.
    #[must_use]
    pub fn from_form(form: &TaskForm, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: form.title.clone(),
            due_date: coerce_due_date(form.due_date.as_deref()),
            estimated_hours: coerce_hours(form.estimated_hours.as_deref()),
            importance: coerce_importance(form.importance.as_deref()),
            dependencies: form.dependencies.as_deref().map(split_dependencies).unwrap_or_default(),
        }
    }

    /// Builds a task view of an arbitrary JSON value, applying every default.
    ///
    /// Bulk records are submitted untouched; this is only for showing them.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(json_text);
        let dependencies = match value.get("dependencies") {
            Some(Value::Array(items)) => items.iter().filter_map(json_text).collect(),
            Some(Value::String(raw)) => split_dependencies(raw),
            _ => Vec::new(),
        };
        Self {
            id: text("id"),
            title: text("title").unwrap_or_default(),
            due_date: coerce_due_date(text("due_date").as_deref()),
            estimated_hours: coerce_hours(text("estimated_hours").as_deref()),
            importance: coerce_importance(text("importance").as_deref()),
            dependencies,
        }
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces estimated hours, falling back to [`DEFAULT_ESTIMATED_HOURS`].
///
/// Reads the leading decimal number and ignores whatever follows it, so
/// `"3 hours"` is 3. Missing, unparsable, non-finite, zero and negative
/// values all fall back.
#[must_use]
pub fn coerce_hours(raw: Option<&str>) -> f64 {
    raw.and_then(|s| numeric_prefix(s.trim(), true).parse::<f64>().ok())
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(DEFAULT_ESTIMATED_HOURS)
}

/// Coerces importance, falling back to [`DEFAULT_IMPORTANCE`].
///
/// Reads the leading integer only: `"7.9"` is 7, `"8/10"` is 8 and `"1e3"`
/// is 1. Missing, unparsable and zero values fall back. Out-of-range values
/// are kept; range is the service's concern.
#[must_use]
pub fn coerce_importance(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| numeric_prefix(s.trim(), false).parse::<i64>().ok()) {
        Some(0) | None => DEFAULT_IMPORTANCE,
        Some(importance) => importance,
    }
}

/// The longest prefix of `s` that reads as a number: an optional sign and
/// digits, plus a fraction and exponent when `decimal` is set. Empty when
/// `s` does not start with a number.
fn numeric_prefix(s: &str, decimal: bool) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start + bytes[start.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = digits_from(sign);
    let mut has_digits = end > sign;

    if decimal {
        if bytes.get(end) == Some(&b'.') {
            let fraction_end = digits_from(end + 1);
            if has_digits || fraction_end > end + 1 {
                has_digits = true;
                end = fraction_end;
            }
        }
        if has_digits && matches!(bytes.get(end), Some(b'e' | b'E')) {
            let signed = matches!(bytes.get(end + 1), Some(b'+' | b'-'));
            let exponent_start = end + 1 + usize::from(signed);
            let exponent_end = digits_from(exponent_start);
            if exponent_end > exponent_start {
                end = exponent_end;
            }
        }
    }

    if has_digits {
        &s[..end]
    } else {
        ""
    }
}

/// Coerces a due date. Empty input means no deadline.
///
/// Text that is not a `YYYY-MM-DD` date is dropped with a warning.
#[must_use]
pub fn coerce_due_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(input = raw, %err, "dropping unparsable due date");
            None
        }
    }
}

/// Splits comma-separated dependency ids, trimming each piece.
///
/// Empty or whitespace-only input yields no dependencies.
#[must_use]
pub fn split_dependencies(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|piece| piece.trim().to_string()).collect()
}
