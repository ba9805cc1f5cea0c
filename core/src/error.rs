// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::order::LifecycleStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Step not found: {step_name}")]
    StepNotFound { step_name: String },

    #[error("Handler missing for required step: {step_name}")]
    HandlerMissing { step_name: String },

    #[error("Step '{step_name}' failed. Source: {source}")]
    StepFailed {
        step_name: String,
        #[source]
        source: AnyhowError,
    },

    #[error("No flow registered for context type {type_name}")]
    FlowNotRegistered { type_name: String },

    #[error("Type mismatch during context dispatch (expected {expected_type})")]
    TypeMismatch { expected_type: String },

    #[error("Unknown order status: '{0}'")]
    InvalidStatus(String),

    #[error("Unknown order source: '{0}'")]
    InvalidSource(String),

    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: LifecycleStatus,
        to: LifecycleStatus,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AnyhowError> for CoreError {
    fn from(err: AnyhowError) -> Self {
        // Unwrap a CoreError that was boxed into anyhow by a handler instead of nesting it.
        match err.downcast::<CoreError>() {
            Ok(core_err) => core_err,
            Err(err) => CoreError::StepFailed {
                step_name: "<unnamed>".to_string(),
                source: err,
            },
        }
    }
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
