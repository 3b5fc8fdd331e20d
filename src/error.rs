use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl RegistryError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        RegistryError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Stable identifier for the error kind, independent of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::InvalidArgument { .. } => "invalid_argument",
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
