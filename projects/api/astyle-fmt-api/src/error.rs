//! Error types and the stable numeric codes reported through error sinks.

use crate::allocate::AllocateError;
use astyle_fmt_core::OptionsError;
use derive_enum_all_values::AllValues;
use thiserror::Error;

/// Numeric codes delivered to error sinks.
///
/// The values are stable and shared with the C exports.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum ErrorCode {
    /// No pointer to the source text was provided.
    NullSource = 101,
    /// No pointer to the options text was provided.
    NullOptions = 102,
    /// No allocation function was provided.
    NullAllocator = 103,
    /// The output buffer could not be allocated.
    AllocationFailure = 120,
    /// The options text contained unrecognised directives.
    OptionError = 130,
    /// The source text is not valid UTF-8.
    InputError = 140,
    /// The formatter failed unexpectedly.
    Internal = 199,
}

impl ErrorCode {
    /// The numeric value passed to error sinks.
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Looks up the code with the given numeric value.
    pub fn from_value(value: i32) -> Option<Self> {
        Self::all_values()
            .iter()
            .copied()
            .find(|code| code.value() == value)
    }

    /// A short static description of the code.
    ///
    /// For [`ErrorCode::OptionError`] and [`ErrorCode::InputError`] the message carried by
    /// the reported event has more detail than this.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::NullSource => "No pointer to source input.",
            ErrorCode::NullOptions => "No pointer to AStyle options.",
            ErrorCode::NullAllocator => "No pointer to memory allocation function.",
            ErrorCode::AllocationFailure => "Allocation failure on output.",
            ErrorCode::OptionError => "Invalid Artistic Style options.",
            ErrorCode::InputError => "Source input is not valid UTF-8.",
            ErrorCode::Internal => "Internal error while formatting.",
        }
    }
}

/// A failure of a single transform call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// No pointer to the source text was provided.
    #[error("No pointer to source input.")]
    NullSource,

    /// No pointer to the options text was provided.
    #[error("No pointer to AStyle options.")]
    NullOptions,

    /// No allocation function was provided.
    #[error("No pointer to memory allocation function.")]
    NullAllocator,

    /// The output buffer could not be allocated.
    #[error("Allocation failure on output.")]
    AllocationFailure(#[source] AllocateError),

    /// The options text contained unrecognised directives.
    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),

    /// The source text is not valid UTF-8.
    #[error("Source input is not valid UTF-8 (byte offset {offset}).")]
    InvalidSource {
        /// Offset of the first byte that is not part of a valid UTF-8 sequence.
        offset: usize,
    },

    /// The formatter failed unexpectedly.
    #[error("Internal error while formatting.")]
    Internal,
}

impl TransformError {
    /// The stable code reported alongside this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            TransformError::NullSource => ErrorCode::NullSource,
            TransformError::NullOptions => ErrorCode::NullOptions,
            TransformError::NullAllocator => ErrorCode::NullAllocator,
            TransformError::AllocationFailure(_) => ErrorCode::AllocationFailure,
            TransformError::InvalidOptions(_) => ErrorCode::OptionError,
            TransformError::InvalidSource { .. } => ErrorCode::InputError,
            TransformError::Internal => ErrorCode::Internal,
        }
    }
}

impl From<AllocateError> for TransformError {
    fn from(error: AllocateError) -> Self {
        TransformError::AllocationFailure(error)
    }
}
