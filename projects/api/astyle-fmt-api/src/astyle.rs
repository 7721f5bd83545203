//! A reusable formatter holding an options string.

use crate::error::TransformError;
use alloc::string::String;
use astyle_fmt_core::{format_source, parse_options, FormatOptions, OptionsError, ASTYLE_VERSION};

/// Formats sources with a fixed set of options.
///
/// The options are parsed when they are set, so formatting many files with the same options
/// parses them only once. An invalid options string is kept and reported by every call to
/// [`Astyle::format`] until it is replaced.
///
/// ```
/// use astyle_fmt_api::Astyle;
///
/// let mut astyle = Astyle::new();
/// astyle.set_options("--style=allman --indent=spaces=2");
/// assert_eq!(astyle.format("void f() { g(); }").unwrap(), "void f()\n{\n  g();\n}");
/// ```
#[derive(Debug, Clone)]
pub struct Astyle {
    options: String,
    parsed: Result<FormatOptions, OptionsError>,
}

impl Astyle {
    /// Creates a formatter with no options.
    pub fn new() -> Self {
        Self {
            options: String::new(),
            parsed: Ok(FormatOptions::default()),
        }
    }

    /// Creates a formatter with the given options.
    pub fn with_options(options: impl Into<String>) -> Self {
        let mut astyle = Self::new();
        astyle.set_options(options);
        astyle
    }

    /// Replaces the options used by subsequent calls to [`Astyle::format`].
    pub fn set_options(&mut self, options: impl Into<String>) {
        self.options = options.into();
        self.parsed = parse_options(&self.options);
    }

    /// The options string currently set.
    pub fn options(&self) -> &str {
        &self.options
    }

    /// Formats `source` with the current options.
    pub fn format(&self, source: &str) -> Result<String, TransformError> {
        let options = self.parsed.as_ref().map_err(|error| error.clone())?;
        Ok(format_source(source, options))
    }

    /// Version of Artistic Style whose behaviour this formatter follows.
    pub fn version(&self) -> &'static str {
        ASTYLE_VERSION
    }
}

impl Default for Astyle {
    fn default() -> Self {
        Self::new()
    }
}
