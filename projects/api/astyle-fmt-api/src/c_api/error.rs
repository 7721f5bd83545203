//! C API error handling.

use crate::error::ErrorCode;
use crate::sink::{ErrorSink, LogSink};
use alloc::ffi::CString;
use core::ffi::{c_char, c_int, CStr};

/// Error callback accepted by [`astyle_main`](super::astyle_main).
///
/// Receives the numeric code and a NUL-terminated message that is only valid for the
/// duration of the call.
pub type AstyleErrorHandler = unsafe extern "C" fn(c_int, *const c_char);

/// Adapts a C error callback to [`ErrorSink`].
///
/// Remembers whether it has been called, so that a panic caught after an error was already
/// delivered does not produce a second event.
pub(crate) struct CErrorSink {
    handler: AstyleErrorHandler,
    pub(crate) reported: bool,
}

impl CErrorSink {
    pub(crate) fn new(handler: AstyleErrorHandler) -> Self {
        Self {
            handler,
            reported: false,
        }
    }
}

impl ErrorSink for CErrorSink {
    fn report(&mut self, code: i32, message: &str) {
        self.reported = true;
        let message = CString::new(message).unwrap_or_default();
        unsafe { (self.handler)(code, message.as_ptr()) }
    }
}

/// Get a null-terminated description of an error code.
///
/// The returned string is a static string literal that does not need to be freed.
/// Codes that are not known return `"Unknown error code."`.
///
/// # Safety
/// This function is safe to call with any error code value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_error_message(error_code: c_int) -> *const c_char {
    let message = match ErrorCode::from_value(error_code) {
        Some(ErrorCode::NullSource) => c"No pointer to source input.",
        Some(ErrorCode::NullOptions) => c"No pointer to AStyle options.",
        Some(ErrorCode::NullAllocator) => c"No pointer to memory allocation function.",
        Some(ErrorCode::AllocationFailure) => c"Allocation failure on output.",
        Some(ErrorCode::OptionError) => c"Invalid Artistic Style options.",
        Some(ErrorCode::InputError) => c"Source input is not valid UTF-8.",
        Some(ErrorCode::Internal) => c"Internal error while formatting.",
        None => c"Unknown error code.",
    };
    message.as_ptr()
}

/// The error handler used by [`astyle_wrapper`](super::astyle_wrapper).
///
/// Logs the error and writes `error: MESSAGE (CODE)` to standard error.
///
/// # Safety
/// - `message` must be null or point to a NUL-terminated string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_default_error_handler(error_code: c_int, message: *const c_char) {
    if message.is_null() {
        LogSink.report(error_code, "");
        return;
    }

    let message = unsafe { CStr::from_ptr(message) };
    LogSink.report(error_code, &message.to_string_lossy());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_matching_message() {
        for &code in ErrorCode::all_values() {
            let message = unsafe { CStr::from_ptr(astyle_error_message(code.value())) };
            assert_eq!(message.to_str().unwrap(), code.description());
        }
    }

    #[test]
    fn unknown_code_has_a_message() {
        let message = unsafe { CStr::from_ptr(astyle_error_message(0)) };
        assert_eq!(message.to_str().unwrap(), "Unknown error code.");
    }

    #[test]
    fn default_handler_accepts_null_message() {
        unsafe {
            astyle_default_error_handler(101, core::ptr::null());
            astyle_default_error_handler(130, c"Invalid Artistic Style options:\n\tx".as_ptr());
        }
    }
}
