//! Output buffer allocation.
//!
//! Every successful transform makes exactly one request to an [`OutputAllocator`], for the
//! formatted text plus its NUL terminator. The returned [`RawAlloc`] owns its memory, so the
//! [`FormattedText`] built on top of it frees itself with the allocator that made it.
//!
//! [`FormattedText`]: crate::FormattedText

use core::alloc::{Layout, LayoutError};
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Supplies memory for transform output.
pub trait OutputAllocator {
    /// Allocates a buffer of at least `num_bytes` bytes.
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError>;
}

/// Allocates output from the global allocator.
///
/// This is the allocator used by [`wrap`](crate::wrap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalOutputAllocator;

impl OutputAllocator for GlobalOutputAllocator {
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        let layout = Layout::from_size_align(num_bytes, align_of::<u8>())?;
        RawAlloc::new(layout).map_err(|_| AllocateError::AllocationFailed)
    }
}

impl<A: OutputAllocator + ?Sized> OutputAllocator for &A {
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        (**self).allocate(num_bytes)
    }
}

/// An error that happened while allocating output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to the output being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// The allocator could not provide the memory.
    #[error("Memory allocation failed.")]
    AllocationFailed,

    /// The allocator returned fewer bytes than were requested.
    #[error("Allocator returned {provided} bytes, {requested} were requested.")]
    BufferTooSmall {
        /// Bytes requested from the allocator.
        requested: usize,
        /// Bytes the allocator returned.
        provided: usize,
    },
}
