use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Rejected,
    Unavailable,
    Internal,
}

/// Field name to ordered error messages.
///
/// Serializes as `{"violations": {"amount": ["..."]}}`, the same shape the resource API
/// uses in its 4xx bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default)]
    pub violations: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.violations.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.values().all(Vec::is_empty)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.keys().map(String::as_str)
    }
}

/// Error body returned by the resource API on 4xx/5xx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiErrorBody {
    pub fn field_errors(&self) -> Option<FieldErrors> {
        let violations = self.violations.clone()?;
        let errors = FieldErrors { violations };
        (!errors.is_empty()).then_some(errors)
    }
}
