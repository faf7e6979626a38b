use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RelayError {
    #[error("RelayError: Handler name must be a non-empty string")]
    EmptyHandlerName,

    #[error("RelayError: Input mapping failed for handler '{0}': {1}")]
    InputMapping(String, String),

    #[error("RelayError: Input rejected by schema for handler '{0}': {1}")]
    Validation(String, String),

    #[error("RelayError: Handler '{0}' failed: {1}")]
    Handler(String, String),

    #[error("RelayError: Cant serialize output of handler '{0}' error '{1}'")]
    Serialization(String, String),

    #[error("RelayError: Output mapping failed for handler '{0}': {1}")]
    OutputMapping(String, String),

    #[error("RelayError: Endpoint handler registered already: '{0}'")]
    HandlerRegistered(String),

    #[error("RelayError: No endpoint handler found by name '{0}'")]
    HandlerNotFound(String),

    #[cfg(feature = "json-schema")]
    #[error("RelayError: Invalid schema document: '{0}'")]
    InvalidSchema(String),
}

impl RelayError {
    /// Handler name the failure is attached to, when the variant carries one.
    pub fn handler_name(&self) -> Option<&str> {
        match self {
            RelayError::InputMapping(name, _)
            | RelayError::Validation(name, _)
            | RelayError::Handler(name, _)
            | RelayError::Serialization(name, _)
            | RelayError::OutputMapping(name, _)
            | RelayError::HandlerRegistered(name)
            | RelayError::HandlerNotFound(name) => Some(name),
            _ => None,
        }
    }
}
