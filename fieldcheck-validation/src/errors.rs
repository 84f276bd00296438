// Validation errors and the per-field error map

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single failed rule for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Human-readable message
    pub message: String,

    /// Name of the rule that failed
    pub constraint: &'static str,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom",
        }
    }

    /// Set the constraint name
    pub fn with_constraint(mut self, constraint: &'static str) -> Self {
        self.constraint = constraint;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Faults raised while setting up a validator or looking at an upload.
///
/// These never come out of a rule; a rule that hits one logs it and records
/// a failure in the [`ErrorMap`] instead.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unknown pattern `{0}`")]
    UnknownPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] crate::ConfigError),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

/// How repeated failures for the same field are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Keep only the latest failure per field
    #[default]
    Overwrite,
    /// Keep every failure per field, in the order they happened
    CollectAll,
}

impl ErrorPolicy {
    /// Parse a policy name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "overwrite" | "last" => Some(ErrorPolicy::Overwrite),
            "collect_all" | "all" => Some(ErrorPolicy::CollectAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldEntry {
    field: String,
    errors: Vec<ValidationError>,
}

/// Failures keyed by field name, ordered by each field's first failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorMap {
    policy: ErrorPolicy,
    entries: Vec<FieldEntry>,
}

impl ErrorMap {
    /// Empty map using the overwrite policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty map using the given policy.
    pub fn with_policy(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Change the policy for future failures.
    ///
    /// Moving to [`ErrorPolicy::Overwrite`] keeps only the latest failure of
    /// each field.
    pub fn set_policy(&mut self, policy: ErrorPolicy) {
        if policy == ErrorPolicy::Overwrite {
            for entry in &mut self.entries {
                let keep = entry.errors.len().saturating_sub(1);
                entry.errors.drain(..keep);
            }
        }
        self.policy = policy;
    }

    /// Record a failure under its field.
    ///
    /// A field keeps its original position when it fails again.
    pub fn record(&mut self, error: ValidationError) {
        match self.entries.iter_mut().find(|e| e.field == error.field) {
            Some(entry) => match self.policy {
                ErrorPolicy::Overwrite => entry.errors = vec![error],
                ErrorPolicy::CollectAll => entry.errors.push(error),
            },
            None => self.entries.push(FieldEntry {
                field: error.field.clone(),
                errors: vec![error],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.field == field)
    }

    /// Latest message recorded for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.field_errors(field)
            .last()
            .map(|e| e.message.as_str())
    }

    /// Every failure kept for a field.
    pub fn field_errors(&self, field: &str) -> &[ValidationError] {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.errors.as_slice())
            .unwrap_or(&[])
    }

    /// Field names in order of first failure.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    /// `(field, latest message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|e| {
            e.errors
                .last()
                .map(|err| (e.field.as_str(), err.message.as_str()))
        })
    }

    /// Every kept message, field by field.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.errors.iter().map(|err| err.message.as_str()))
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|e| {
                let value = match self.policy {
                    ErrorPolicy::Overwrite => serde_json::json!(e.errors.last().map(|m| &m.message)),
                    ErrorPolicy::CollectAll => serde_json::json!(
                        e.errors.iter().map(|m| &m.message).collect::<Vec<_>>()
                    ),
                };
                (e.field.clone(), value)
            })
            .collect::<serde_json::Map<_, _>>();

        serde_json::Value::Object(map)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in self.messages() {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}
