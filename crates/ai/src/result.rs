use thiserror::Error;

/// Failure talking to the text-generation service.
///
/// These never leave the crate's public operations; [`crate::InventoryAssistant`]
/// logs them and degrades.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiError {
    #[error("invalid request input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service returned an empty response")]
    EmptyResponse,
}
