use std::collections::BTreeMap;

use serde::Serialize;

pub const REQUIRED_FIELD: &str = "Обязательное поле.";

/// Key used for errors which do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Field-scoped validation messages attached to a submitted form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the required-field message when value is blank, returns true if it was blank
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        let blank = value.trim().is_empty();
        if blank {
            self.add(field, REQUIRED_FIELD);
        }
        blank
    }

    pub fn limit_length(&mut self, field: &str, value: &str, max: usize) {
        let length = value.chars().count();
        if length > max {
            self.add(
                field,
                format!(
                    "Убедитесь, что это значение содержит не более {} символов (сейчас {}).",
                    max, length
                ),
            );
        }
    }
}

/// Result of validating submitted form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    Accepted(T),
    Rejected(FormErrors),
}

impl<T> Submission<T> {
    /// Accepted when no errors were collected
    pub fn from_errors(errors: FormErrors, accepted: impl FnOnce() -> T) -> Self {
        if errors.is_empty() {
            Submission::Accepted(accepted())
        } else {
            Submission::Rejected(errors)
        }
    }
}

/// A form as it is rendered on a page: the submitted (or initial) values and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundForm<T: Serialize> {
    pub fields: T,
    pub errors: FormErrors,
}

impl<T: Serialize> BoundForm<T> {
    pub fn new(fields: T) -> Self {
        Self {
            fields,
            errors: FormErrors::new(),
        }
    }

    pub fn with_errors(fields: T, errors: FormErrors) -> Self {
        Self { fields, errors }
    }
}
