//! Error types for the dropsearch connector

use thiserror::Error;

/// Errors raised by the storage provider client
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("API error: HTTP {status} - {summary}")]
    Api { status: u16, summary: String },

    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ProviderError {
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

/// Errors raised while decoding an item payload into a reference
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Item has no payload")]
    MissingPayload,

    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Malformed reference payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Repository has not been initialized")]
    NotInitialized,

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    #[error("Indexing error: {message}")]
    Indexing { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConnectorError {
    pub fn repository(message: impl Into<String>, source: ProviderError) -> Self {
        Self::Repository {
            message: message.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    pub fn indexing(message: impl Into<String>) -> Self {
        Self::Indexing {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
