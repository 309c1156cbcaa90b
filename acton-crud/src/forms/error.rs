//! Validation errors collected while assigning and validating an entity

use std::fmt;

use crate::model::captionize;

/// A single validation error for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The error message, without the field name (e.g. `can't be blank`)
    pub message: String,
    /// Optional error code for programmatic handling
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error with just a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create a field error with a message and code
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validation errors keyed by field name, in the order they were added
///
/// # Examples
///
/// ```rust
/// use acton_crud::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("name", "can't be blank");
/// errors.add("rating", "is not a number");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.full_messages(), vec!["Name can't be blank", "Rating is not a number"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, Vec<FieldError>)>,
}

impl ValidationErrors {
    /// Create a new empty error collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: String, error: FieldError) {
        match self.errors.iter_mut().find(|(name, _)| *name == field) {
            Some((_, list)) => list.push(error),
            None => self.errors.push((field, vec![error])),
        }
    }

    /// Add an error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(field.into(), FieldError::new(message));
    }

    /// Add an error with a code for a field
    pub fn add_with_code(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.push(field.into(), FieldError::with_code(message, code));
    }

    /// Check if there are any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if a specific field has errors
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.iter().any(|(name, _)| name == field)
    }

    /// Get all errors for a specific field
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[FieldError] {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map_or(&[], |(_, list)| list.as_slice())
    }

    /// Get all field names that have errors
    #[must_use]
    pub fn fields_with_errors(&self) -> Vec<&str> {
        self.errors.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get the total number of errors
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.iter().map(|(_, list)| list.len()).sum()
    }

    /// Merge errors from another collection
    pub fn merge(&mut self, other: &Self) {
        for (field, list) in &other.errors {
            for error in list {
                self.push(field.clone(), error.clone());
            }
        }
    }

    /// Iterate over all errors
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.errors
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    /// Messages prefixed with the captionized field name
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, list)| {
                let caption = captionize(field);
                list.iter().map(move |e| format!("{caption} {}", e.message))
            })
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, list) in self.iter() {
            for error in list {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field} {error}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Convert from validator crate's `ValidationErrors`
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                result.add_with_code(field.to_string(), message, error.code.to_string());
            }
        }
        result
    }
}
