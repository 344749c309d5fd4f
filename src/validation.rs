use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::ApiError;

/// Field name to the messages collected for it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Moves every entry of `other` under `prefix`, e.g. `employees[0].name`.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors
                .entry(format!("{}{}", prefix, field))
                .or_default()
                .extend(messages);
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// Required text with an upper bound on its trimmed length (in characters).
pub fn check_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    required_message: &str,
    max_len: usize,
    max_message: &str,
) {
    match value {
        Some(text) if !text.trim().is_empty() => {
            check_max_length(errors, field, Some(text), max_len, max_message)
        }
        _ => errors.add(field, required_message),
    }
}

/// Optional text; only its trimmed length is checked.
pub fn check_max_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max_len: usize,
    max_message: &str,
) {
    if value.map_or(false, |text| text.trim().chars().count() > max_len) {
        errors.add(field, max_message);
    }
}

pub fn check_required(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    required_message: &str,
) {
    if value.map_or(true, |text| text.trim().is_empty()) {
        errors.add(field, required_message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_text_are_required() {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "name", None, "required", 5, "too long");
        check_text(&mut errors, "address", Some("   "), "required", 5, "too long");
        assert_eq!(errors.get("name"), Some(&["required".to_string()][..]));
        assert_eq!(errors.get("address"), Some(&["required".to_string()][..]));
    }

    #[test]
    fn length_is_counted_in_characters() {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "name", Some("ääääá"), "required", 5, "too long");
        assert!(errors.is_empty());
        check_text(&mut errors, "name", Some("ääääáá"), "required", 5, "too long");
        assert_eq!(errors.get("name"), Some(&["too long".to_string()][..]));
    }

    #[test]
    fn surrounding_whitespace_does_not_count_towards_the_limit() {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "name", Some("  abcde  "), "required", 5, "too long");
        check_max_length(&mut errors, "country", Some(" abcde "), 5, "too long");
        assert!(errors.is_empty());
        check_max_length(&mut errors, "country", Some("abcdef"), 5, "too long");
        check_max_length(&mut errors, "country", None, 5, "too long");
        assert_eq!(errors.get("country"), Some(&["too long".to_string()][..]));
    }

    #[test]
    fn merge_prefixed_nests_field_names() {
        let mut inner = ValidationErrors::new();
        inner.add("age", "bad age");
        let mut outer = ValidationErrors::new();
        outer.merge_prefixed("employees[1].", inner);
        assert_eq!(outer.get("employees[1].age"), Some(&["bad age".to_string()][..]));
    }

    #[test]
    fn into_result_fails_only_with_errors() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let mut errors = ValidationErrors::new();
        errors.add("x", "y");
        assert!(matches!(errors.into_result(), Err(ApiError::Validation(_))));
    }
}
