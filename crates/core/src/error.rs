use crate::types::RecordId;
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record failed the required-field contract. Carries every violation,
    /// not just the first.
    #[error("{entity} validation failed: {}", summarize(.violations))]
    InvalidRecord {
        entity: &'static str,
        violations: Vec<FieldViolation>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_record_message_lists_every_violation() {
        let err = CoreError::InvalidRecord {
            entity: "Product",
            violations: vec![
                FieldViolation::new("likes", "required", "likes is required"),
                FieldViolation::new("urls.thumb", "required", "urls.thumb is required"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Product validation failed: likes: likes is required; urls.thumb: urls.thumb is required"
        );
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Product",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "Entity not found: Product with id abc");
    }
}
