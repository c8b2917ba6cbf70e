//! Error types for cadence-core

use crate::handler::BoxError;
use crate::lifecycle::{Hook, Operation, State};
use thiserror::Error;

/// Result type for cadence-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a component
#[derive(Debug, Error)]
pub enum Error {
    /// A lifecycle operation was requested from a state that does not allow it
    ///
    /// The component state is left unchanged.
    #[error("{component}: cannot {operation} while {state}")]
    InvalidTransition {
        component: String,
        operation: Operation,
        state: State,
    },

    /// A lifecycle hook reported failure; the component state is unchanged
    #[error("{component}: {hook} hook failed")]
    HookFailed { component: String, hook: Hook },

    /// `finish()` was called on a running component
    ///
    /// The component was stopped (if possible) and finished anyway, but the
    /// multi-step transition is never reported as a clean success.
    #[error("{component}: finished while running (stopped first: {stopped})")]
    ForcedFinish { component: String, stopped: bool },

    /// A name was registered twice under [`DuplicatePolicy::Reject`]
    ///
    /// [`DuplicatePolicy::Reject`]: crate::DuplicatePolicy::Reject
    #[error("{registry} '{name}' is already registered")]
    DuplicateName { registry: &'static str, name: String },

    /// A handler failed while being executed by the scheduler
    #[error("{component}::{handler} failed: {source}")]
    HandlerFault {
        component: String,
        handler: String,
        source: BoxError,
    },

    /// A handler connected to an event failed while the event was raised
    #[error("event '{event}' handler failed: {source}")]
    EventFault { event: String, source: BoxError },

    /// A handler was invoked while it was already executing
    #[error("handler '{0}' is already executing")]
    HandlerBusy(String),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error came from user code (a handler or a hook)
    /// rather than from misuse of the component API
    pub fn is_user_fault(&self) -> bool {
        matches!(
            self,
            Error::HookFailed { .. } | Error::HandlerFault { .. } | Error::EventFault { .. }
        )
    }
}

// Compile-time check that Error is Send + Sync so drivers can hand it across threads.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = Error::InvalidTransition {
            component: "camera".to_string(),
            operation: Operation::Start,
            state: State::Unready,
        };
        assert_eq!(err.to_string(), "camera: cannot start while unready");
        assert!(!err.is_user_fault());
    }

    #[test]
    fn test_handler_fault_keeps_source() {
        let err = Error::HandlerFault {
            component: "filter".to_string(),
            handler: "on_frame".to_string(),
            source: "bad frame".into(),
        };
        assert_eq!(err.to_string(), "filter::on_frame failed: bad frame");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_user_fault());
    }
}
