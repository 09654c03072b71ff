use std::io;

use thiserror::Error;

/// Result returned by every handler. `Err` aborts processing.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure reported by a handler.
///
/// Any variant aborts the running scan, the caller should not rely on the
/// concrete variant to decide whether processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler needs a value but none was given.
    #[error("missing value")]
    MissingValue,

    /// The value has content that is not part of a number.
    #[error("'{0}' is not a valid number")]
    NotNumeric(String),

    /// The value is at or below the smallest supported number.
    #[error("'{0}' is too small")]
    Underflow(String),

    /// The value is at or above the largest supported number.
    #[error("'{0}' is too large")]
    Overflow(String),

    /// A message for the user, see [`crate::callbacks::error`].
    #[error("{0}")]
    Message(String),

    /// Application defined abort code.
    #[error("aborted with code {0}")]
    Code(i32),
}

impl HandlerError {
    /// The non-zero indicator for this failure.
    pub fn code(&self) -> i32 {
        match self {
            HandlerError::MissingValue => 1,
            HandlerError::NotNumeric(_) => 2,
            HandlerError::Underflow(_) => 3,
            HandlerError::Overflow(_) => 4,
            HandlerError::Message(_) => -1,
            HandlerError::Code(code) if *code != 0 => *code,
            HandlerError::Code(_) => -1,
        }
    }
}

/// Processing error returned by the matcher and the environment processor.
#[derive(Debug, Error)]
pub enum ProcessErr {
    /// No definition matches the token and no bad argument handler is registered.
    #[error("invalid command line argument '{token}'")]
    BadArgument { index: usize, token: String },

    /// A handler rejected the token at `index`.
    #[error("processing aborted at argument '{token}': {source}")]
    Aborted {
        index: usize,
        token: String,
        #[source]
        source: HandlerError,
    },

    /// A handler rejected an environment variable.
    #[error("processing aborted at environment variable '{variable}': {source}")]
    EnvAborted {
        variable: String,
        #[source]
        source: HandlerError,
    },
}

impl ProcessErr {
    /// Index of the argument that stopped processing.
    ///
    /// [`None`] when the failure came from the environment.
    pub fn index(&self) -> Option<usize> {
        match self {
            ProcessErr::BadArgument { index, .. } | ProcessErr::Aborted { index, .. } => Some(*index),
            ProcessErr::EnvAborted { .. } => None,
        }
    }

    /// The handler failure behind this error, if any.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            ProcessErr::BadArgument { .. } => None,
            ProcessErr::Aborted { source, .. } | ProcessErr::EnvAborted { source, .. } => Some(source),
        }
    }
}

/// Invalid [`crate::Definition`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionErr {
    #[error("a handler is required")]
    MissingHandler,

    #[error("illegal short name '{0}'")]
    IllegalShortName(char),

    #[error("illegal blank long name")]
    BlankLongName,

    #[error("the long name '{name}' contains an illegal character: '{ch}'")]
    IllegalLongName { name: String, ch: char },
}

/// Failure reading a config file.
#[derive(Debug, Error)]
pub enum ConfigErr {
    #[error("unable to read config: {0}")]
    Io(#[from] io::Error),
}
