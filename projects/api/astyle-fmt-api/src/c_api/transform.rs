//! C entry points for formatting.

use super::allocate::{astyle_default_alloc, AstyleAllocator};
use super::error::{astyle_default_error_handler, AstyleErrorHandler, CErrorSink};
use crate::error::TransformError;
use crate::sink::report;
use crate::transform::format_text;
use core::ffi::{c_char, c_ulong, CStr};
use core::ptr;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Formats `source` according to `options`.
///
/// The output is written to a single block obtained from `allocate`, followed by a NUL byte,
/// and must be released with the deallocator matching `allocate`. On failure `on_error` is
/// called exactly once and null is returned.
///
/// # Error codes
/// - `101` if `source` is null
/// - `102` if `options` is null
/// - `103` if `allocate` is null
/// - `120` if `allocate` returns null
/// - `130` if `options` contains directives that are not recognised
/// - `140` if `source` is not valid UTF-8
/// - `199` if formatting failed unexpectedly
///
/// If `on_error` is null, errors go to [`astyle_default_error_handler`] instead.
///
/// # Safety
/// - `source` and `options` must be null or point to NUL-terminated strings
/// - `on_error` and `allocate` must be null or valid functions with the given signatures
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_main(
    source: *const c_char,
    options: *const c_char,
    on_error: Option<AstyleErrorHandler>,
    allocate: Option<AstyleAllocator>,
) -> *mut c_char {
    let on_error = on_error.unwrap_or_else(|| {
        tracing::debug!("no error handler given, using the default handler");
        astyle_default_error_handler
    });
    let mut sink = CErrorSink::new(on_error);

    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        main_unguarded(source, options, allocate, &mut sink)
    }));
    match result {
        Ok(output) => output,
        Err(_) => {
            tracing::error!("formatting panicked");
            if !sink.reported {
                report(&mut sink, &TransformError::Internal);
            }
            ptr::null_mut()
        }
    }
}

/// [`astyle_main`] with the error handler fixed to [`astyle_default_error_handler`] and the
/// allocator fixed to [`astyle_default_alloc`].
///
/// The output must be released with [`astyle_free`](super::astyle_free).
///
/// # Safety
/// - `source` and `options` must be null or point to NUL-terminated strings
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_wrapper(
    source: *const c_char,
    options: *const c_char,
) -> *mut c_char {
    unsafe {
        astyle_main(
            source,
            options,
            Some(astyle_default_error_handler),
            Some(astyle_default_alloc),
        )
    }
}

unsafe fn main_unguarded(
    source: *const c_char,
    options: *const c_char,
    allocate: Option<AstyleAllocator>,
    sink: &mut CErrorSink,
) -> *mut c_char {
    let checked = if source.is_null() {
        Err(TransformError::NullSource)
    } else if options.is_null() {
        Err(TransformError::NullOptions)
    } else {
        allocate.ok_or(TransformError::NullAllocator)
    };
    let allocate = match checked {
        Ok(allocate) => allocate,
        Err(error) => {
            report(sink, &error);
            return ptr::null_mut();
        }
    };

    let (source, options) = unsafe { (CStr::from_ptr(source), CStr::from_ptr(options)) };
    let result = format_text(source.to_bytes(), options.to_bytes())
        .and_then(|text| unsafe { copy_out(&text, allocate) });
    match result {
        Ok(output) => output,
        Err(error) => {
            report(sink, &error);
            ptr::null_mut()
        }
    }
}

/// Copies `text` and a NUL terminator into one block from `allocate`.
unsafe fn copy_out(text: &str, allocate: AstyleAllocator) -> Result<*mut c_char, TransformError> {
    let size = c_ulong::try_from(text.len() + 1).map_err(|_| TransformError::Internal)?;
    let output = unsafe { allocate(size) } as *mut u8;
    if output.is_null() {
        return Err(crate::allocate::AllocateError::AllocationFailed.into());
    }

    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr(), output, text.len());
        output.add(text.len()).write(0);
    }
    Ok(output as *mut c_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::astyle_free;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::ffi::{c_int, c_void};
    use std::ffi::CString;
    use rstest::rstest;

    std::thread_local! {
        static EVENTS: RefCell<Vec<(i32, String)>> = const { RefCell::new(Vec::new()) };
    }

    unsafe extern "C" fn record_error(code: c_int, message: *const c_char) {
        let message = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
        EVENTS.with(|events| events.borrow_mut().push((code, message)));
    }

    unsafe extern "C" fn failing_alloc(_size: c_ulong) -> *mut c_void {
        ptr::null_mut()
    }

    fn take_events() -> Vec<(i32, String)> {
        EVENTS.with(|events| core::mem::take(&mut *events.borrow_mut()))
    }

    /// Runs [`astyle_main`] with the recording handler and the default allocator.
    fn run(source: *const c_char, options: *const c_char) -> Option<String> {
        take_events();
        unsafe {
            let output = astyle_main(
                source,
                options,
                Some(record_error),
                Some(astyle_default_alloc),
            );
            if output.is_null() {
                return None;
            }
            let text = CStr::from_ptr(output).to_str().unwrap().into();
            astyle_free(output);
            Some(text)
        }
    }

    #[test]
    fn formats_with_caller_allocator() {
        let output = run(c"int main() { foo(); }\n".as_ptr(), c"--style=otbs".as_ptr());
        assert_eq!(output.as_deref(), Some("int main()\n{\n    foo();\n}\n"));
        assert!(take_events().is_empty());
    }

    #[test]
    fn formats_source_with_multi_line_tokens() {
        let source = "/* a\n * b */\n#define ONE \\\n    1\nchar s[] = \"x\\\ny\";\n";
        let c_source = CString::new(source).unwrap();
        let output = run(c_source.as_ptr(), c"".as_ptr());
        assert_eq!(output.as_deref(), Some(source));
        assert!(take_events().is_empty());
    }

    #[rstest]
    #[case::null_source(ptr::null(), c"".as_ptr(), 101, "No pointer to source input.")]
    #[case::null_options(c"a;".as_ptr(), ptr::null(), 102, "No pointer to AStyle options.")]
    #[case::unknown_flag(
        c"int x=1;".as_ptr(),
        c"--unknown-flag".as_ptr(),
        130,
        "Invalid Artistic Style options:\n\tunknown-flag"
    )]
    #[case::invalid_source(
        c"a\xff;".as_ptr(),
        c"".as_ptr(),
        140,
        "Source input is not valid UTF-8 (byte offset 1)."
    )]
    fn failures_are_reported_once(
        #[case] source: *const c_char,
        #[case] options: *const c_char,
        #[case] code: i32,
        #[case] message: &str,
    ) {
        assert_eq!(run(source, options), None);
        assert_eq!(take_events(), [(code, String::from(message))]);
    }

    #[test]
    fn missing_allocator_is_reported() {
        take_events();
        let output =
            unsafe { astyle_main(c"a;".as_ptr(), c"".as_ptr(), Some(record_error), None) };
        assert!(output.is_null());
        assert_eq!(
            take_events(),
            [(103, String::from("No pointer to memory allocation function."))]
        );
    }

    #[test]
    fn failing_allocator_is_reported() {
        take_events();
        let output = unsafe {
            astyle_main(
                c"a;".as_ptr(),
                c"".as_ptr(),
                Some(record_error),
                Some(failing_alloc),
            )
        };
        assert!(output.is_null());
        assert_eq!(
            take_events(),
            [(120, String::from("Allocation failure on output."))]
        );
    }

    #[test]
    fn missing_error_handler_falls_back_to_default_handler() {
        let failed = unsafe {
            astyle_main(
                ptr::null(),
                c"".as_ptr(),
                None,
                Some(astyle_default_alloc),
            )
        };
        assert!(failed.is_null());

        unsafe {
            let output = astyle_main(
                c"int x=1;".as_ptr(),
                c"--pad-oper".as_ptr(),
                None,
                Some(astyle_default_alloc),
            );
            assert!(!output.is_null());
            assert_eq!(CStr::from_ptr(output).to_str().unwrap(), "int x = 1;");
            astyle_free(output);
        }
    }

    #[test]
    fn wrapper_output_is_released_with_astyle_free() {
        unsafe {
            let output = astyle_wrapper(c"int x=1;".as_ptr(), c"-p".as_ptr());
            assert!(!output.is_null());
            assert_eq!(CStr::from_ptr(output).to_str().unwrap(), "int x = 1;");
            astyle_free(output);
        }
    }

    #[test]
    fn wrapper_returns_null_on_error() {
        let output = unsafe { astyle_wrapper(c"a;".as_ptr(), c"--unknown-flag".as_ptr()) };
        assert!(output.is_null());
    }
}
