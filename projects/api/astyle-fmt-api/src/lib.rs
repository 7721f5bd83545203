#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocate;
pub mod astyle;
pub mod error;
pub mod output;
pub mod sink;
pub mod transform;

#[cfg(feature = "c-exports")]
pub mod c_api;

// Re-export main functionality at crate root
pub use allocate::{AllocateError, GlobalOutputAllocator, OutputAllocator};
pub use astyle::Astyle;
pub use error::{ErrorCode, TransformError};
pub use output::FormattedText;
pub use sink::{ErrorEvent, ErrorSink, LogSink};
pub use transform::{transform, wrap};

// Engine types callers need alongside the entry points.
pub use astyle_fmt_core::{FormatOptions, OptionsError, ASTYLE_VERSION};
