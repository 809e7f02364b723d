//! Glue between `validator` derive output and [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Flatten field errors into one message, sorted by field name.
///
/// Uses each error's message when present, otherwise its code:
/// `"location: Location is required; title: length"`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {detail}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Run `validator` checks, mapping failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(validation_message(&e)))
}
