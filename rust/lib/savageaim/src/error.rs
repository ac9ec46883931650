use std::collections::BTreeMap;
use std::fmt;

use savageaim_client::ApiError;
use serde::{Deserialize, Serialize};

/// Per-field validation messages, keyed by payload field name.
///
/// Same shape as the backend's 400 response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

/// Failure of a write action (settings, BIS lists).
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid input: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for WriteError {
    /// A 400 carrying a field error body becomes [`WriteError::Invalid`].
    fn from(err: ApiError) -> Self {
        if let ApiError::Server { status: 400, message } = &err {
            if let Ok(fields) = serde_json::from_str::<FieldErrors>(message) {
                if !fields.is_empty() {
                    return WriteError::Invalid(fields);
                }
            }
        }
        WriteError::Api(err)
    }
}
