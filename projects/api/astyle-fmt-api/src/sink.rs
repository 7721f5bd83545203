//! Error sinks.
//!
//! A sink receives the `(code, message)` pair describing why a transform call produced no
//! output. It is passed explicitly to every call; a call reports at most one event.

use crate::error::{ErrorCode, TransformError};
use alloc::string::String;
use alloc::vec::Vec;

/// Receives error events from transform calls.
///
/// Implemented for closures taking `(i32, &str)` and for `Vec<ErrorEvent>`, which collects
/// the events.
pub trait ErrorSink {
    /// Called once for a failed transform call.
    fn report(&mut self, code: i32, message: &str);
}

impl<F> ErrorSink for F
where
    F: FnMut(i32, &str),
{
    fn report(&mut self, code: i32, message: &str) {
        self(code, message)
    }
}

impl ErrorSink for Vec<ErrorEvent> {
    fn report(&mut self, code: i32, message: &str) {
        self.push(ErrorEvent {
            code,
            message: String::from(message),
        });
    }
}

/// A reported error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorEvent {
    /// Numeric error code, see [`ErrorCode`].
    pub code: i32,
    /// Human readable description.
    pub message: String,
}

impl ErrorEvent {
    /// The [`ErrorCode`] matching [`ErrorEvent::code`], if it is one of the known codes.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_value(self.code)
    }
}

impl From<&TransformError> for ErrorEvent {
    fn from(error: &TransformError) -> Self {
        Self {
            code: error.code().value(),
            message: alloc::format!("{error}"),
        }
    }
}

/// The sink used by [`wrap`](crate::wrap).
///
/// Emits a `tracing` error event and, with the `std` feature, writes
/// `error: MESSAGE (CODE)` to standard error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&mut self, code: i32, message: &str) {
        tracing::error!(code, "{message}");
        #[cfg(feature = "std")]
        std::eprintln!("error: {message} ({code})");
    }
}

/// Delivers `error` to `sink`.
pub(crate) fn report<S: ErrorSink + ?Sized>(sink: &mut S, error: &TransformError) {
    let event = ErrorEvent::from(error);
    sink.report(event.code, &event.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_collects_events() {
        let mut events = Vec::new();
        report(&mut events, &TransformError::InvalidSource { offset: 3 });
        assert_eq!(
            events,
            [ErrorEvent {
                code: 140,
                message: String::from("Source input is not valid UTF-8 (byte offset 3)."),
            }]
        );
        assert_eq!(events[0].error_code(), Some(ErrorCode::InputError));
    }

    #[test]
    fn closure_receives_code_and_message() {
        let mut seen = None;
        let mut sink = |code: i32, message: &str| seen = Some((code, String::from(message)));
        report(&mut sink, &TransformError::NullOptions);
        assert_eq!(
            seen,
            Some((102, String::from("No pointer to AStyle options.")))
        );
    }
}
