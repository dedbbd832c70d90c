use thiserror::Error;

/// Result type alias for fabdb operations
pub type Result<T> = std::result::Result<T, FabDbError>;

/// Errors that can occur when talking to fabdb
#[derive(Error, Debug)]
pub enum FabDbError {
    /// A query used a filter name the API does not understand
    #[error("invalid filter: {name}")]
    InvalidFilter {
        /// The caller-facing filter name that was rejected
        name: String,
    },

    /// A known filter was given a value it cannot carry
    #[error("invalid value for filter {name}: {value}")]
    InvalidFilterValue {
        /// Filter name
        name: String,
        /// Offending value
        value: String,
    },

    /// A client-side filter used an unknown comparison operator
    #[error("invalid comparison: {0}")]
    InvalidComparison(String),

    /// The transport failed, or the server answered with a non-success status
    #[error("transport error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Error message from the transport or the API
        message: String,
    },

    /// The payload did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A record lacked a required field
    #[error("record is missing required field `{field}`")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A record field was present but could not be interpreted
    #[error("invalid value for field `{field}`: {value}")]
    InvalidValue {
        /// Name of the field
        field: String,
        /// The raw value, rendered as JSON
        value: String,
    },

    /// The requested card or deck does not exist
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FabDbError {
    /// Shorthand for a [`FabDbError::MissingField`]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for a [`FabDbError::InvalidValue`]
    pub fn invalid(field: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Returns true if the remote source reported no such entity
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the error was caused by caller misuse, before any request was made
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilter { .. }
                | Self::InvalidFilterValue { .. }
                | Self::InvalidComparison(_)
                | Self::Config(_)
        )
    }

    /// Returns the HTTP status code if one is associated with this error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let with_status = FabDbError::Transport {
            status: Some(500),
            message: "boom".into(),
        };
        assert_eq!(with_status.to_string(), "transport error (500): boom");

        let without = FabDbError::Transport {
            status: None,
            message: "connection reset".into(),
        };
        assert_eq!(without.to_string(), "transport error: connection reset");
    }

    #[test]
    fn test_classification() {
        assert!(FabDbError::InvalidFilter { name: "colour".into() }.is_caller_error());
        assert!(!FabDbError::missing("name").is_caller_error());
        assert!(FabDbError::NotFound { resource: "cards/x".into() }.is_not_found());
        assert_eq!(
            FabDbError::NotFound { resource: "x".into() }.status_code(),
            Some(404)
        );
    }
}
