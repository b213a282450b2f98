//! Fixed-capacity text buffers.
//!
//! Every endpoint write lands in a [`BoundedBuffer`]. A store always clears
//! the whole buffer first and then copies at most `CAP` bytes through
//! [`bounded_copy`], so a shorter write never leaves bytes of an earlier,
//! longer write behind and an oversized write can never spill into another
//! buffer.
//!
//! The logical content of a buffer ends at the first NUL byte or at the
//! capacity, whichever comes first.

use crate::constants::{OPERAND_CAPACITY, OPERATOR_CAPACITY};
use std::borrow::Cow;
use std::fmt;

/// Buffer backing the `first` and `second` endpoints.
pub type OperandBuffer = BoundedBuffer<OPERAND_CAPACITY>;

/// Buffer backing the `sign` endpoint.
pub type OperatorBuffer = BoundedBuffer<OPERATOR_CAPACITY>;

/// Copy up to `requested` bytes of `src` into `dst`, clamped to `dst.len()`.
///
/// Returns the number of bytes copied. Never reads past `src` and never
/// writes past `dst`.
///
/// # Examples
///
/// ```
/// use calcdev_core::bounded_copy;
///
/// let mut dst = [0u8; 4];
/// assert_eq!(bounded_copy(b"123456", 6, &mut dst), 4);
/// assert_eq!(&dst, b"1234");
///
/// assert_eq!(bounded_copy(b"123456", 2, &mut dst), 2);
/// assert_eq!(&dst[..2], b"12");
/// ```
#[inline]
pub fn bounded_copy(src: &[u8], requested: usize, dst: &mut [u8]) -> usize {
    let count = requested.min(src.len()).min(dst.len());
    dst[..count].copy_from_slice(&src[..count]);
    count
}

/// Accounting for a single store into a [`BoundedBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Bytes the caller asked to store.
    pub requested: usize,

    /// Bytes actually stored.
    pub stored: usize,
}

impl CopyReport {
    /// Returns `true` if part of the request did not fit.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.stored < self.requested
    }
}

/// Fixed-capacity byte buffer holding a textual value.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundedBuffer<const CAP: usize> {
    data: [u8; CAP],
}

impl<const CAP: usize> BoundedBuffer<CAP> {
    /// Create an empty (all-zero) buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: [0; CAP] }
    }

    /// Buffer capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Replace the buffer content with the first `requested_len` bytes of `src`.
    ///
    /// The buffer is zero-filled before the copy. `requested_len` is clamped
    /// to both `src.len()` and the capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use calcdev_core::BoundedBuffer;
    ///
    /// let mut buffer = BoundedBuffer::<8>::new();
    /// buffer.store(b"12", 2);
    /// buffer.store(b"3", 1);
    /// assert_eq!(buffer.as_bytes(), b"3");
    /// ```
    pub fn store(&mut self, src: &[u8], requested_len: usize) -> CopyReport {
        self.clear();
        let requested = requested_len.min(src.len());
        let stored = bounded_copy(src, requested, &mut self.data);
        CopyReport { requested, stored }
    }

    /// Zero-fill the whole buffer.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Logical content: bytes up to the first NUL or the capacity.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(CAP);
        &self.data[..end]
    }

    /// Logical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.first().is_none_or(|&b| b == 0)
    }

    /// Logical content as text, replacing invalid UTF-8.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl<const CAP: usize> Default for BoundedBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Debug for BoundedBuffer<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &CAP)
            .field("text", &self.to_text())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = OperandBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 100);
        assert!(buffer.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_store_replaces_previous_content() {
        let mut buffer = OperandBuffer::new();
        buffer.store(b"12", 2);
        let report = buffer.store(b"3", 1);

        assert_eq!(buffer.as_bytes(), b"3");
        assert_eq!(report.stored, 1);
        assert!(!report.truncated());
        // Stale tail is zeroed
        assert_eq!(buffer.data[1], 0);
    }

    #[test]
    fn test_store_truncates_to_capacity() {
        let mut buffer = OperandBuffer::new();
        let input = vec![b'7'; 150];
        let report = buffer.store(&input, input.len());

        assert_eq!(report.requested, 150);
        assert_eq!(report.stored, 100);
        assert!(report.truncated());
        assert_eq!(buffer.len(), 100);
    }

    #[rstest]
    #[case(b"+", 1, b"+")]
    #[case(b"*/", 2, b"*/")]
    #[case(b"abcdefgh", 8, b"abcde")]
    #[case(b"abcdefgh", 3, b"abc")]
    fn test_operator_buffer_store(
        #[case] input: &[u8],
        #[case] requested: usize,
        #[case] expected: &[u8],
    ) {
        let mut buffer = OperatorBuffer::new();
        buffer.store(input, requested);
        assert_eq!(buffer.as_bytes(), expected);
    }

    #[test]
    fn test_requested_len_clamped_to_source() {
        let mut buffer = OperandBuffer::new();
        let report = buffer.store(b"42", 10);

        assert_eq!(report.requested, 2);
        assert_eq!(report.stored, 2);
        assert!(!report.truncated());
        assert_eq!(buffer.as_bytes(), b"42");
    }

    #[test]
    fn test_embedded_nul_ends_logical_content() {
        let mut buffer = OperandBuffer::new();
        buffer.store(b"12\0 34", 6);
        assert_eq!(buffer.as_bytes(), b"12");
        assert_eq!(buffer.to_text(), "12");
    }

    #[test]
    fn test_clear() {
        let mut buffer = OperatorBuffer::new();
        buffer.store(b"-", 1);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_bounded_copy_zero_requested() {
        let mut dst = [9u8; 3];
        assert_eq!(bounded_copy(b"abc", 0, &mut dst), 0);
        assert_eq!(dst, [9, 9, 9]);
    }

    #[test]
    fn test_debug_shows_text() {
        let mut buffer = OperatorBuffer::new();
        buffer.store(b"/", 1);
        let debug = format!("{buffer:?}");
        assert!(debug.contains("\"/\""));
        assert!(debug.contains("capacity: 5"));
    }
}
