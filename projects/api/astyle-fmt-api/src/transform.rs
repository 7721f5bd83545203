//! The transform entry point and the wrapper.

use crate::allocate::{GlobalOutputAllocator, OutputAllocator};
use crate::error::TransformError;
use crate::output::FormattedText;
use crate::sink::{report, ErrorSink, LogSink};
use alloc::borrow::Cow;
use alloc::string::String;
use astyle_fmt_core::{format_source, parse_options};

/// Formats `source` according to the directives in `options`.
///
/// On success the formatted text is returned in a single buffer obtained from `allocator`,
/// followed by a NUL byte. On failure `sink` is invoked exactly once and `None` is returned.
/// An empty `options` means no options.
///
/// # Errors reported
///
/// - `130` if `options` contains directives that are not recognised; all of them are listed
///   in the one message.
/// - `140` if `source` is not valid UTF-8.
/// - `120` if `allocator` fails.
///
/// # Examples
///
/// ```
/// use astyle_fmt_api::{transform, ErrorEvent, GlobalOutputAllocator};
///
/// let mut events: Vec<ErrorEvent> = Vec::new();
/// let output = transform(b"int x=1;", b"", &mut events, &GlobalOutputAllocator);
/// assert_eq!(output.unwrap().as_str(), "int x=1;");
/// assert!(events.is_empty());
///
/// let output = transform(b"int x=1;", b"--unknown-flag", &mut events, &GlobalOutputAllocator);
/// assert!(output.is_none());
/// assert_eq!(events[0].code, 130);
/// assert_eq!(events[0].message, "Invalid Artistic Style options:\n\tunknown-flag");
/// ```
pub fn transform<S: ErrorSink, A: OutputAllocator>(
    source: &[u8],
    options: &[u8],
    sink: &mut S,
    allocator: &A,
) -> Option<FormattedText> {
    let result = format_text(source, options).and_then(|text| {
        FormattedText::new_in(&text, allocator).map_err(TransformError::from)
    });
    match result {
        Ok(output) => Some(output),
        Err(error) => {
            tracing::debug!(code = error.code().value(), "transform failed");
            report(sink, &error);
            None
        }
    }
}

/// [`transform`] with the error sink fixed to [`LogSink`] and the allocator fixed to
/// [`GlobalOutputAllocator`].
///
/// ```
/// let output = astyle_fmt_api::wrap("int main() { foo(); }\n", "--style=otbs").unwrap();
/// assert_eq!(output, "int main()\n{\n    foo();\n}\n");
/// ```
pub fn wrap(source: &str, options: &str) -> Option<FormattedText> {
    transform(
        source.as_bytes(),
        options.as_bytes(),
        &mut LogSink,
        &GlobalOutputAllocator,
    )
}

/// Validates the inputs and formats the source into a [`String`].
pub(crate) fn format_text(source: &[u8], options: &[u8]) -> Result<String, TransformError> {
    let source = core::str::from_utf8(source).map_err(|error| TransformError::InvalidSource {
        offset: error.valid_up_to(),
    })?;
    // Undecodable bytes become U+FFFD and are rejected with the directive they are in.
    let options: Cow<'_, str> = String::from_utf8_lossy(options);
    let options = parse_options(&options)?;
    Ok(format_source(source, &options))
}
