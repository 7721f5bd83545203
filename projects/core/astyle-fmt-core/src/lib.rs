#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod lexer;
pub mod options;

mod formatter;

pub use error::OptionsError;
pub use formatter::format_source;
pub use options::{parse_options, FormatOptions};

/// Version of Artistic Style whose options and output this crate follows.
pub const ASTYLE_VERSION: &str = "3.1";
