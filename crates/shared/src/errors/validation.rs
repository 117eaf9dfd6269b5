use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

/// A single rejected constraint on an input field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.constraint)
    }
}

/// Flattens validator output into a list ordered by field name, so the
/// same input always produces the same message.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match e.code.as_ref() {
                        "length" => "Invalid length".to_string(),
                        "range" => "Value out of range".to_string(),
                        _ => format!("Invalid {field}"),
                    });
                FieldViolation::new(field.to_string(), e.code.to_string(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.constraint.cmp(&b.constraint)));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn violations_are_sorted_and_keep_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "price",
            ValidationError::new("positive").with_message("price must be positive".into()),
        );
        errors.add("name", ValidationError::new("length"));

        let violations = collect_violations(&errors);

        assert_eq!(
            violations,
            vec![
                FieldViolation::new("name", "length", "Invalid length"),
                FieldViolation::new("price", "positive", "price must be positive"),
            ]
        );
        assert_eq!(
            violations[1].to_string(),
            "price: price must be positive (positive)"
        );
    }
}
