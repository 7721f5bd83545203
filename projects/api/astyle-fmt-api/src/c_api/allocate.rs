//! The library's own allocator for C callers.
//!
//! Blocks carry a header in front of the returned pointer holding the requested size, so
//! [`astyle_free`] can rebuild the layout from the pointer alone.

use core::alloc::Layout;
use core::ffi::{c_char, c_ulong, c_void};
use core::ptr;
use std::alloc::{alloc, dealloc};

/// Allocation function accepted by [`astyle_main`](super::astyle_main).
pub type AstyleAllocator = unsafe extern "C" fn(c_ulong) -> *mut c_void;

const HEADER_SIZE: usize = size_of::<usize>();
const ALIGN: usize = align_of::<usize>();

fn block_layout(size: usize) -> Option<Layout> {
    let total = size.checked_add(HEADER_SIZE)?;
    Layout::from_size_align(total, ALIGN).ok()
}

/// Allocates `size` bytes, suitable for passing as `allocate` to
/// [`astyle_main`](super::astyle_main).
///
/// Memory from this function must be released with [`astyle_free`].
///
/// # Returns
/// A pointer to the block, or null if `size` is zero or the allocation fails.
///
/// # Safety
/// This function is safe to call with any size.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_default_alloc(size: c_ulong) -> *mut c_void {
    let Ok(size) = usize::try_from(size) else {
        return ptr::null_mut();
    };
    if size == 0 {
        return ptr::null_mut();
    }
    let Some(layout) = block_layout(size) else {
        return ptr::null_mut();
    };

    unsafe {
        let base = alloc(layout);
        if base.is_null() {
            return ptr::null_mut();
        }
        (base as *mut usize).write(size);
        base.add(HEADER_SIZE) as *mut c_void
    }
}

/// Releases text returned by [`astyle_wrapper`](super::astyle_wrapper), or a block from
/// [`astyle_default_alloc`].
///
/// Output of [`astyle_main`](super::astyle_main) comes from the caller's allocator and must
/// be released with the caller's matching deallocator instead.
///
/// # Safety
/// - `text` must be null or a pointer returned by [`astyle_wrapper`](super::astyle_wrapper)
///   or [`astyle_default_alloc`]
/// - `text` must not have been freed already
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astyle_free(text: *mut c_char) {
    if text.is_null() {
        return;
    }

    unsafe {
        let base = (text as *mut u8).sub(HEADER_SIZE);
        let size = (base as *const usize).read();
        if let Some(layout) = block_layout(size) {
            dealloc(base, layout);
        }
    }
}
