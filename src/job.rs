// 🧾 Job Record - one validated job entry
//
// A Job is a value: validated once at construction, never mutated.
// Two Jobs with the same five fields are interchangeable.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{JobError, Result};

/// Maximum hours a single job may record.
pub const MAX_HOURS_PER_JOB: u32 = 6;

// ============================================================================
// JOB
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    name: String,
    category: String,
    rate: f64,
    date: String,
    hours: u32,
}

// rate is always finite and positive, so equality is reflexive
impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.category.hash(state);
        self.rate.to_bits().hash(state);
        self.date.hash(state);
        self.hours.hash(state);
    }
}

impl Job {
    /// Create a validated Job.
    ///
    /// Fields are checked in the order name, category, date, rate, hours;
    /// the first failure is returned. Text fields are stored trimmed.
    pub fn new(
        name: impl AsRef<str>,
        category: impl AsRef<str>,
        rate: f64,
        date: impl AsRef<str>,
        hours: i64,
    ) -> Result<Self> {
        let name = validate_text(name.as_ref(), "name")?;
        let category = validate_text(category.as_ref(), "category")?;
        let date = validate_text(date.as_ref(), "date")?;
        let rate = validate_rate(rate)?;
        let hours = validate_hours(hours)?;

        Ok(Job {
            name,
            category,
            rate,
            date,
            hours,
        })
    }

    /// Create a Job from an untyped JSON object with the keys
    /// `name`, `category`, `rate`, `date` and `hours`.
    ///
    /// Type mismatches (a number where text is expected, `2.5` hours, ...)
    /// are reported as [`JobError::WrongType`], distinct from empty or
    /// out-of-range values. A value that is not an object at all is
    /// [`JobError::NotA`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or(JobError::NotA {
            what: "job",
            expected: "an object",
        })?;

        let name = validate_text(text_of(obj, "name")?, "name")?;
        let category = validate_text(text_of(obj, "category")?, "category")?;
        let date = validate_text(text_of(obj, "date")?, "date")?;

        let rate = obj
            .get("rate")
            .and_then(Value::as_f64)
            .ok_or(JobError::WrongType {
                field: "rate",
                expected: "a number",
            })?;
        let rate = validate_rate(rate)?;

        let hours = obj
            .get("hours")
            .and_then(Value::as_i64)
            .ok_or(JobError::WrongType {
                field: "hours",
                expected: "an integer",
            })?;
        let hours = validate_hours(hours)?;

        Ok(Job {
            name,
            category,
            rate,
            date,
            hours,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Cost of this job: rate × hours.
    pub fn cost(&self) -> f64 {
        self.rate * f64::from(self.hours)
    }

    /// Hex SHA-256 of the canonical text form.
    ///
    /// Unlike `Hash`, this is stable across processes and builds, so it can
    /// be shown to users or stored alongside exported data.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Job {
    /// `Job("A", "Cat", 10.0, "21/10/2025", 2)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job(\"{}\", \"{}\", {}, \"{}\", {})",
            self.name,
            self.category,
            format_rate(self.rate),
            self.date,
            self.hours
        )
    }
}

/// Shortest round-trip decimal form of a rate, never in exponent
/// notation; integral values keep their `.0` (`10.0`, `13.45`, `0.0000001`).
pub fn format_rate(rate: f64) -> String {
    let text = rate.to_string();
    if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

// ============================================================================
// FIELD VALIDATION
// ============================================================================

fn validate_text(value: &str, field: &'static str) -> Result<String> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return Err(JobError::EmptyField(field));
    }
    Ok(cleaned.to_string())
}

fn validate_rate(rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(JobError::NonPositive("rate"));
    }
    Ok(rate)
}

fn validate_hours(hours: i64) -> Result<u32> {
    if hours <= 0 {
        return Err(JobError::NonPositive("hours"));
    }
    if hours > i64::from(MAX_HOURS_PER_JOB) {
        return Err(JobError::HoursExceeded {
            hours,
            max: MAX_HOURS_PER_JOB,
        });
    }
    // bounded by MAX_HOURS_PER_JOB above
    Ok(hours as u32)
}

fn text_of<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or(JobError::WrongType {
            field,
            expected: "a string",
        })
}

// ============================================================================
// TESTS
// ============================================================================
