//! # C API (FFI) Documentation
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! The exports follow the calling convention of Artistic Style's own library interface, so
//! existing callers of `AStyleMain` style functions can switch over with a rename.
//!
//! ## Example Usage
//!
//! ```c
//! #include <stdio.h>
//! #include <stdlib.h>
//!
//! static void on_error(int code, const char* message) {
//!     fprintf(stderr, "astyle error %d: %s\n", code, message);
//! }
//!
//! static void* allocate(unsigned long size) {
//!     return malloc(size);
//! }
//!
//! char* text = astyle_main("int main() { foo(); }\n", "--style=allman",
//!                          on_error, allocate);
//! if (text != NULL) {
//!     fputs(text, stdout);
//!     free(text); // matches `allocate`
//! }
//!
//! // Library allocated output, released with `astyle_free`.
//! char* wrapped = astyle_wrapper("int x=1;", "--pad-oper");
//! if (wrapped != NULL) {
//!     fputs(wrapped, stdout);
//!     astyle_free(wrapped);
//! }
//! ```
//!
//! ## Functions
//!
//! - **`astyle_main(source, options, on_error, allocate)`** - Format with caller supplied error handler and allocator
//! - **`astyle_wrapper(source, options)`** - Format with the default error handler and the library's allocator
//! - **`astyle_free(text)`** - Release output of `astyle_wrapper`
//! - **`astyle_version()`** - Version of Artistic Style the formatter follows
//! - **`astyle_error_message(code)`** - Static description of an error code
//! - **`astyle_default_error_handler(code, message)`** - The handler used by `astyle_wrapper`
//! - **`astyle_default_alloc(size)`** - The allocator used by `astyle_wrapper`
//!
//! ## Memory
//!
//! Output of `astyle_main` comes from `allocate` and must be released with its matching
//! deallocator. Output of `astyle_wrapper` must be released with `astyle_free`. Mixing the
//! two is undefined behaviour.
//!
//! ## Error Handling
//!
//! Failing calls return null after calling the error handler exactly once. See
//! [`ErrorCode`](crate::ErrorCode) for the codes.

pub mod allocate;
pub mod error;
pub mod transform;

pub use allocate::{astyle_default_alloc, astyle_free, AstyleAllocator};
pub use error::{astyle_default_error_handler, astyle_error_message, AstyleErrorHandler};
pub use transform::{astyle_main, astyle_wrapper};

use core::ffi::{c_char, CStr};

const VERSION: &CStr = c"3.1";

/// Get the version of Artistic Style the formatter follows, as a NUL-terminated string.
///
/// The returned string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn astyle_version() -> *const c_char {
    VERSION.as_ptr()
}
