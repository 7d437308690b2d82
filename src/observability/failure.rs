//! Message and stack extraction from handler failures.
//!
//! A failure is either a well-formed error (something implementing
//! [`std::error::Error`]) or an opaque value such as a string panic payload.
//! Extraction never fails: opaque values degrade to a fixed message and no
//! stack.

use std::any::Any;
use std::error::Error as StdError;

/// Message reported for failures that are not well-formed errors.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// A failure value observed while running a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A well-formed error with its message and rendered cause chain.
    Error {
        message: String,
        stack: Option<String>,
    },
    /// Anything else.
    Opaque,
}

impl Failure {
    /// Capture an error and its `source()` chain.
    ///
    /// The stack holds the error itself on the first line followed by one
    /// `caused by:` line per source.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let message = error.to_string();
        let mut stack = message.clone();
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        Failure::Error {
            message,
            stack: Some(stack),
        }
    }

    /// Classify a panic payload.
    ///
    /// Payloads raised with `std::panic::panic_any` carrying a boxed error are
    /// well-formed; `panic!("...")` payloads are not.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        if let Some(error) = payload.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
            return Self::from_error(&**error);
        }
        Failure::Opaque
    }

    /// A well-formed error with an explicit, preformatted stack.
    pub fn with_stack(message: impl Into<String>, stack: Option<String>) -> Self {
        Failure::Error {
            message: message.into(),
            stack,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Failure::Error { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Failure::Error { message, .. } => message.clone(),
            Failure::Opaque => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// Stack split into one entry per line.
    pub fn stack(&self) -> Option<Vec<String>> {
        match self {
            Failure::Error {
                stack: Some(stack), ..
            } => Some(stack.split('\n').map(String::from).collect()),
            _ => None,
        }
    }
}
