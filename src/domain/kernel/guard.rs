use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;

// ============================================================================
// Construction Guards - Field validation shared by every aggregate
// ============================================================================
//
// Factories run every guard and hand the results to `join`, so a caller
// sees all failing fields at once instead of only the first one.
//
// ============================================================================

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GuardError {
    #[error("value is required: {field}")]
    Required { field: String },

    #[error("value is invalid: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{entity} was not constructed through its factory")]
    NotConstructed { entity: String },
}

impl GuardError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required { field: field.into() }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_constructed(entity: impl Into<String>) -> Self {
        Self::NotConstructed { entity: entity.into() }
    }
}

/// Every guard failure collected by a factory, in check order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<GuardError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[GuardError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append the failures of a nested factory (e.g. a default compartment)
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn contains(&self, error: &GuardError) -> bool {
        self.errors.contains(error)
    }
}

impl From<GuardError> for ValidationErrors {
    fn from(error: GuardError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collect every failed check; `Ok(())` when all of them passed
pub fn join<I>(checks: I) -> Result<(), ValidationErrors>
where
    I: IntoIterator<Item = Result<(), GuardError>>,
{
    let errors: Vec<GuardError> = checks.into_iter().filter_map(Result::err).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Fold a nested factory result into a set of collected checks
pub fn join_nested<I>(checks: I, nested: Result<(), ValidationErrors>) -> Result<(), ValidationErrors>
where
    I: IntoIterator<Item = Result<(), GuardError>>,
{
    match (join(checks), nested) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(errors), Ok(())) | (Ok(()), Err(errors)) => Err(errors),
        (Err(mut errors), Err(nested)) => {
            errors.extend(nested);
            Err(errors)
        }
    }
}

// ============================================================================
// Individual Guards
// ============================================================================

pub fn require_id(field: &str, id: Uuid) -> Result<(), GuardError> {
    if id.is_nil() {
        return Err(GuardError::required(field));
    }
    Ok(())
}

pub fn require_text(field: &str, value: &str) -> Result<(), GuardError> {
    if value.trim().is_empty() {
        return Err(GuardError::required(field));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: i32) -> Result<(), GuardError> {
    if value <= 0 {
        return Err(GuardError::invalid(field, format!("must be greater than 0, got {}", value)));
    }
    Ok(())
}

pub fn require_in_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), GuardError> {
    if value < min || value > max {
        return Err(GuardError::invalid(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_returns_ok_when_all_checks_pass() {
        let result = join([require_text("name", "bag"), require_positive("volume", 3)]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_join_collects_every_failure_in_order() {
        let errors = join([
            require_id("id", Uuid::nil()),
            require_text("name", "  "),
            require_positive("volume", 0),
        ])
        .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.errors()[0], GuardError::required("id"));
        assert_eq!(errors.errors()[1], GuardError::required("name"));
        assert!(matches!(errors.errors()[2], GuardError::Invalid { ref field, .. } if field == "volume"));
    }

    #[test]
    fn test_display_joins_all_messages() {
        let errors = join([require_id("id", Uuid::nil()), require_positive("speed", -1)]).unwrap_err();
        let text = errors.to_string();

        assert!(text.contains("value is required: id"));
        assert!(text.contains("value is invalid: speed"));
        assert!(text.contains("; "));
    }

    #[test]
    fn test_join_nested_merges_both_sides() {
        let nested = join([require_text("storage place name", "")]);
        let errors = join_nested([require_positive("speed", 0)], nested).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&GuardError::required("storage place name")));
    }

    #[test]
    fn test_require_in_range_bounds_are_inclusive() {
        assert!(require_in_range("x", 0, 0, 10).is_ok());
        assert!(require_in_range("x", 10, 0, 10).is_ok());
        assert!(require_in_range("x", 11, 0, 10).is_err());
        assert!(require_in_range("x", -1, 0, 10).is_err());
    }
}
