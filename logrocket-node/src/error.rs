use logrocket_common::error::ApiError;
use thiserror::Error;

/// Enumeration of errors raised while running one operation for one input item.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Operation \"{operation}\" not found for resource \"{resource}\"")]
    UnsupportedOperation { resource: String, operation: String },
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl NodeError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        NodeError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = NodeError::UnsupportedOperation {
            resource: "session".to_owned(),
            operation: "nope".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "Operation \"nope\" not found for resource \"session\""
        );

        assert_eq!(
            NodeError::MissingParameter("sessionId".to_owned()).to_string(),
            "Missing required parameter: sessionId"
        );

        let api = NodeError::from(ApiError::RequestFailed {
            status: Some(500),
            message: "boom".to_owned(),
        });
        assert_eq!(api.to_string(), "LogRocket API request failed: boom");
    }
}
