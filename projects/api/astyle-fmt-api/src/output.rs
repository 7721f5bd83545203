//! Owned transform output.

use crate::allocate::{AllocateError, OutputAllocator};
use alloc::string::String;
use core::ffi::CStr;
use core::fmt;
use core::ops::Deref;
use safe_allocator_api::RawAlloc;

/// Formatted source text in a buffer obtained from an [`OutputAllocator`].
///
/// The text is followed by a single NUL byte, so the buffer can be handed to code expecting
/// a C string. The buffer is released when the value is dropped.
pub struct FormattedText {
    buffer: RawAlloc,
    len: usize,
}

impl FormattedText {
    /// Copies `text` and a NUL terminator into one buffer from `allocator`.
    pub(crate) fn new_in<A: OutputAllocator>(
        text: &str,
        allocator: &A,
    ) -> Result<Self, AllocateError> {
        let requested = text.len() + 1;
        let mut buffer = allocator.allocate(requested)?;
        if buffer.len() < requested {
            return Err(AllocateError::BufferTooSmall {
                requested,
                provided: buffer.len(),
            });
        }

        let bytes = buffer.as_mut_slice();
        bytes[..text.len()].copy_from_slice(text.as_bytes());
        bytes[text.len()] = 0;
        Ok(Self {
            buffer,
            len: text.len(),
        })
    }

    /// The formatted text.
    pub fn as_str(&self) -> &str {
        // SAFETY: the first `len` bytes were copied from a `&str` in `new_in`.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The formatted text as bytes, without the NUL terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_slice()[..self.len]
    }

    /// The formatted text as bytes, including the NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buffer.as_slice()[..=self.len]
    }

    /// The buffer as a C string.
    ///
    /// If the source contained NUL characters the C string ends at the first of them.
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// Length of the text in bytes, not counting the NUL terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the formatted text is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the text into a [`String`] and releases the buffer.
    pub fn into_string(self) -> String {
        String::from(self.as_str())
    }
}

impl Deref for FormattedText {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for FormattedText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FormattedText").field(&self.as_str()).finish()
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for FormattedText {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FormattedText {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<FormattedText> for String {
    fn from(text: FormattedText) -> Self {
        text.into_string()
    }
}
