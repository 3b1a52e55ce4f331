//! Declarative payload schemas.
//!
//! A [`Schema`] is a named list of required fields, each with a coercion
//! rule. Validation runs over a raw JSON value before any field is read and
//! either yields every coerced field or a [`ValidationError`] naming every
//! field that failed.

mod records;

use std::fmt;

use serde_json::Value;

pub use records::{SyntheticVolumeRecord, UpstreamPriceRecord, PRICE_SCHEMA, VOLUME_SCHEMA};

/// Field name reported when the payload itself is not an object.
pub const ROOT_FIELD: &str = "(root)";

/// Coercion rule for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON number, or a string holding a finite float.
    Float,
    /// JSON integer, a float without fractional part, or a string holding an `i64`.
    Integer,
    /// String drawn from a fixed set.
    Label(&'static [&'static str]),
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Float => "a number",
            FieldKind::Integer => "an integer",
            FieldKind::Label(_) => "a string",
        }
    }

    fn coerce(self, value: &Value) -> Result<FieldValue, FailureReason> {
        let wrong_type = || FailureReason::WrongType {
            expected: self.expected(),
            found: json_type(value),
        };

        match self {
            FieldKind::Float => match value {
                Value::Number(n) => n.as_f64().map(FieldValue::Float).ok_or_else(wrong_type),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(FieldValue::Float)
                    .ok_or_else(wrong_type),
                _ => Err(wrong_type()),
            },
            FieldKind::Integer => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().and_then(integral_f64))
                    .map(FieldValue::Integer)
                    .ok_or_else(wrong_type),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .map_err(|_| wrong_type()),
                _ => Err(wrong_type()),
            },
            FieldKind::Label(allowed) => match value {
                Value::String(s) => allowed
                    .iter()
                    .find(|label| **label == s.as_str())
                    .copied()
                    .map(FieldValue::Label)
                    .ok_or(FailureReason::NotAllowed { allowed }),
                _ => Err(wrong_type()),
            },
        }
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A required field in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Named set of required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Check `payload` against every field, collecting all failures.
    ///
    /// Extra keys are ignored.
    pub fn validate(&self, payload: &Value) -> Result<ValidatedFields, ValidationError> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationError::new(
                self.name,
                vec![FieldFailure {
                    field: ROOT_FIELD,
                    reason: FailureReason::WrongType {
                        expected: "an object",
                        found: json_type(payload),
                    },
                }],
            ));
        };

        let mut values = Vec::with_capacity(self.fields.len());
        let mut failures = Vec::new();

        for field in self.fields {
            let result = match object.get(field.name) {
                Some(value) => field.kind.coerce(value),
                None => Err(FailureReason::Missing),
            };
            match result {
                Ok(value) => values.push((field.name, value)),
                Err(reason) => failures.push(FieldFailure {
                    field: field.name,
                    reason,
                }),
            }
        }

        if failures.is_empty() {
            Ok(ValidatedFields {
                schema: self.name,
                values,
            })
        } else {
            Err(ValidationError::new(self.name, failures))
        }
    }
}

/// A coerced field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Label(&'static str),
}

/// Output of a successful [`Schema::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    schema: &'static str,
    values: Vec<(&'static str, FieldValue)>,
}

impl ValidatedFields {
    fn get(&self, name: &'static str) -> Option<FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    fn absent(&self, name: &'static str, expected: &'static str) -> ValidationError {
        let reason = match self.get(name) {
            Some(_) => FailureReason::WrongType {
                expected,
                found: "another kind",
            },
            None => FailureReason::Missing,
        };
        ValidationError::new(self.schema, vec![FieldFailure { field: name, reason }])
    }

    pub fn float(&self, name: &'static str) -> Result<f64, ValidationError> {
        match self.get(name) {
            Some(FieldValue::Float(f)) => Ok(f),
            _ => Err(self.absent(name, "a number")),
        }
    }

    pub fn integer(&self, name: &'static str) -> Result<i64, ValidationError> {
        match self.get(name) {
            Some(FieldValue::Integer(i)) => Ok(i),
            _ => Err(self.absent(name, "an integer")),
        }
    }

    pub fn label(&self, name: &'static str) -> Result<&'static str, ValidationError> {
        match self.get(name) {
            Some(FieldValue::Label(label)) => Ok(label),
            _ => Err(self.absent(name, "a string")),
        }
    }
}

/// Why a single field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    NotAllowed {
        allowed: &'static [&'static str],
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Missing => f.write_str("field required"),
            FailureReason::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            FailureReason::NotAllowed { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub reason: FailureReason,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Structural validation failure listing every offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} validation error(s) for {schema}: {}", .failures.len(), join_failures(.failures))]
pub struct ValidationError {
    pub schema: &'static str,
    pub failures: Vec<FieldFailure>,
}

fn join_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(schema: &'static str, failures: Vec<FieldFailure>) -> Self {
        Self { schema, failures }
    }

    /// Names of the fields that failed, in schema order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.failures.iter().map(|failure| failure.field).collect()
    }
}
