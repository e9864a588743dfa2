// src/infra/errors.rs — Error types for persuade

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersuadeError {
    // Caller errors: the request was rejected and no state was mutated
    #[error("Invalid session config: {0}")]
    Validation(String),

    #[error("Session '{id}' not found")]
    NotFound { id: String },

    #[error("Cannot {action} session '{id}' while it is {status}")]
    InvalidStateTransition {
        id: String,
        status: String,
        action: &'static str,
    },

    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("Provider '{provider}' has no model '{model}'")]
    UnknownModel { provider: String, model: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PersuadeError {
    /// True for errors that reject a caller's request outright. These carry
    /// the guarantee that nothing in the engine changed.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PersuadeError::Validation(_)
                | PersuadeError::NotFound { .. }
                | PersuadeError::InvalidStateTransition { .. }
                | PersuadeError::UnknownProvider(_)
                | PersuadeError::UnknownModel { .. }
        )
    }
}
