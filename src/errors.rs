use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    DeviceAccess(String),
    StreamAcquisition(String),
    Connection(String),
    InvalidState(String),
    Validation(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::DeviceAccess(msg) => write!(f, "Device access error: {}", msg),
            SessionError::StreamAcquisition(msg) => write!(f, "Stream acquisition error: {}", msg),
            SessionError::Connection(msg) => write!(f, "Connection error: {}", msg),
            SessionError::InvalidState(msg) => write!(f, "Invalid state error: {}", msg),
            SessionError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}
