use validator::ValidationErrors;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No signed-in identity")]
    NotSignedIn,

    #[error("Profile not loaded")]
    ProfileNotLoaded,

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(e: ValidationErrors) -> Self {
        ClientError::Validation(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
