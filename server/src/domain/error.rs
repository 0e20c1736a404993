//! Domain error taxonomy

use thiserror::Error;

use crate::data::DataError;

#[derive(Error, Debug)]
pub enum RatingsError {
    #[error("You must be logged in to do that")]
    NotAuthenticated,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database unavailable: {0}")]
    Connection(#[source] DataError),

    #[error("{file}:{line}: {reason}")]
    MalformedInput {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Data(DataError),
}

impl From<DataError> for RatingsError {
    fn from(e: DataError) -> Self {
        if e.is_connection() {
            Self::Connection(e)
        } else {
            Self::Data(e)
        }
    }
}

impl From<validator::ValidationErrors> for RatingsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(format_validation_errors(&errors))
    }
}

/// Flatten field errors into one message, sorted by field name
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_classified() {
        let err: RatingsError = DataError::Sqlite(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, RatingsError::Connection(_)));

        let err: RatingsError = DataError::Sqlite(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, RatingsError::Data(_)));
    }

    #[test]
    fn test_malformed_input_display_names_file_and_line() {
        let err = RatingsError::MalformedInput {
            file: "u.item".to_string(),
            line: 12,
            reason: "expected at least 5 fields, found 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "u.item:12: expected at least 5 fields, found 2"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = RatingsError::NotFound {
            entity: "Movie",
            id: 7,
        };
        assert_eq!(err.to_string(), "Movie 7 not found");
    }
}
