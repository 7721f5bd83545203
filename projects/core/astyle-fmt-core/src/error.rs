//! Error types of the engine.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use thiserror::Error;

/// Options text contained directives that are not recognised, or values out of range.
///
/// The message lists every rejected directive, one per line, each prefixed with a tab:
///
/// ```text
/// Invalid Artistic Style options:
///     unknown-flag
///     indent=spaces=99
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid Artistic Style options:{}", RejectedList(.rejected))]
pub struct OptionsError {
    /// The rejected directives, long options without their leading `--`.
    pub rejected: Vec<String>,
}

struct RejectedList<'a>(&'a [String]);

impl fmt::Display for RejectedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in self.0 {
            write!(f, "\n\t{directive}")?;
        }
        Ok(())
    }
}
