//! Editable input fields with validation state.
//!
//! A `Field` owns its current value and last error message. Rendering layers
//! read and write the value; they never own the validation state.

use serde::Deserialize;

/// Message recorded when a required field is empty.
pub const REQUIRED_MESSAGE: &str = "This field is required and cannot be empty.";

/// Outcome of a field validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Value accepted as-is.
    Valid,
    /// Value accepted after rewriting it to the canonical form.
    Normalized(String),
    /// Value rejected with a user-facing message.
    Invalid(String),
}

/// A field validator. Receives the current value, returns a verdict.
pub type Validator = fn(&str) -> Verdict;

/// How a field is entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    /// Masked input.
    #[serde(alias = "password")]
    Secret,
    /// One of a fixed set of options.
    #[serde(skip)]
    Choice(Vec<String>),
}

/// A single configurable input item.
#[derive(Debug, Clone)]
pub struct Field {
    pub label: String,
    pub key: String,
    pub kind: FieldKind,
    /// Whether the value is persisted into saved credentials.
    pub storable: bool,
    pub required: bool,
    pub validator: Option<Validator>,
    value: String,
    error: Option<String>,
}

impl Field {
    /// Create a required, storable text field.
    #[must_use]
    pub fn new(label: &str, key: &str) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            kind: FieldKind::Text,
            storable: true,
            required: true,
            validator: None,
            value: String::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.kind = FieldKind::Secret;
        self
    }

    #[must_use]
    pub fn choice(mut self, options: Vec<String>) -> Self {
        self.kind = FieldKind::Choice(options);
        self
    }

    #[must_use]
    pub fn not_storable(mut self) -> Self {
        self.storable = false;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Last validation error, if the previous `validate()` failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the current value, recording the error message on failure.
    ///
    /// Clears any previous error first. An empty required field is invalid
    /// regardless of the validator; a `Normalized` verdict rewrites the value.
    pub fn validate(&mut self) -> bool {
        self.error = None;

        if self.required && self.value.is_empty() {
            self.error = Some(REQUIRED_MESSAGE.to_string());
            return false;
        }
        let Some(validator) = self.validator else {
            return true;
        };
        match validator(&self.value) {
            Verdict::Valid => true,
            Verdict::Normalized(value) => {
                self.value = value;
                true
            }
            Verdict::Invalid(msg) => {
                self.error = Some(msg);
                false
            }
        }
    }
}
