use std::collections::HashSet;

use qz_study::Subject;
use validator::Validate;

use crate::{error::ApiError, question::model::OptionInput};

/// Run the `validator` rules of a request body.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))
}

/// Parse a subject name, case-insensitively.
///
/// # Examples
/// ```
/// use qz_api::validation::parse_subject;
///
/// assert!(parse_subject("Marketing").is_ok());
/// assert!(parse_subject("astrologia").is_err());
/// ```
pub fn parse_subject(value: &str) -> Result<Subject, ApiError> {
    value.parse().map_err(|_| {
        let known: Vec<_> = Subject::ALL.iter().map(|s| s.as_str()).collect();
        ApiError::Validation(format!(
            "Invalid subject: '{value}'. Must be one of: {}",
            known.join(", ")
        ))
    })
}

/// Options must have unique ids and, when present, at least one correct choice.
pub fn validate_options(options: &[OptionInput]) -> Result<(), ApiError> {
    if options.is_empty() {
        return Ok(());
    }

    let mut seen = HashSet::new();
    if let Some(dup) = options.iter().find(|o| !seen.insert(o.id.as_str())) {
        return Err(ApiError::Validation(format!(
            "Duplicate option id: '{}'",
            dup.id
        )));
    }

    if !options.iter().any(|o| o.is_correct) {
        return Err(ApiError::Validation(
            "At least one option must be marked correct".to_string(),
        ));
    }

    Ok(())
}
