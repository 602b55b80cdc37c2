//! Runtime machine lifecycle errors.

use thiserror::Error;

/// Errors raised by the runtime machine's lifecycle operations.
#[derive(Debug, Error, PartialEq)]
pub enum MachineError {
    #[error("the machine is already started")]
    AlreadyStarted,

    #[error("no initial state is set")]
    NoInitialState,
}
