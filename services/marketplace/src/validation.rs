//! Input validation utilities

use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Shortest username accepted by `user.updateProfile`
pub const USERNAME_MIN_CHARS: usize = 3;
/// Longest username accepted by `user.updateProfile`
pub const USERNAME_MAX_CHARS: usize = 30;

/// Per-field validation messages, keyed by the camelCase input field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the outcome of a single-field check.
    pub fn check(&mut self, field: &str, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Validate username length, counted in characters
pub fn validate_username(username: &str) -> Result<(), String> {
    let length = username.chars().count();

    if length < USERNAME_MIN_CHARS {
        return Err(format!(
            "Username must be at least {} characters long",
            USERNAME_MIN_CHARS
        ));
    }

    if length > USERNAME_MAX_CHARS {
        return Err(format!(
            "Username must be at most {} characters long",
            USERNAME_MAX_CHARS
        ));
    }

    Ok(())
}

/// Validate that a required text field is not empty
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} is required", label));
    }

    Ok(())
}

/// Validate that `value` is an absolute URL
pub fn validate_url(value: &str) -> Result<(), String> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| format!("Invalid url: {}", e))
}

/// Normalise an optional link: an empty string means "no link".
pub fn normalize_link(link: Option<String>) -> Option<String> {
    link.filter(|l| !l.is_empty())
}
