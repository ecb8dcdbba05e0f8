use std::{ptr::NonNull, slice};

/// A byte range handed out by an [`Allocator`](crate::Allocator).
///
/// The range does not own its memory. It stays valid until the block it was
/// carved from is reset or destroyed, which is why reading or writing through
/// it is `unsafe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
  ptr: NonNull<u8>,
  len: usize,
}

impl ByteRange {
  pub(crate) fn new(
    ptr: NonNull<u8>,
    len: usize,
  ) -> Self {
    Self { ptr, len }
  }

  /// The range returned for zero-sized requests. Points at nothing.
  pub fn empty() -> Self {
    Self {
      ptr: NonNull::dangling(),
      len: 0,
    }
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  pub fn as_non_null(&self) -> NonNull<u8> {
    self.ptr
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Address of the first byte.
  pub fn addr(&self) -> usize {
    self.ptr.as_ptr() as usize
  }

  /// Address one past the last byte.
  pub fn end_addr(&self) -> usize {
    self.addr() + self.len
  }

  /// Whether the two ranges share at least one byte. Empty ranges overlap
  /// nothing.
  pub fn overlaps(
    &self,
    other: &ByteRange,
  ) -> bool {
    if self.is_empty() || other.is_empty() {
      return false;
    }

    self.addr() < other.end_addr() && other.addr() < self.end_addr()
  }

  /// Views the range as a shared slice.
  ///
  /// # Safety
  ///
  /// The owning block must not have been reset or destroyed, and no mutable
  /// view of the same bytes may be alive for `'a`. Bytes that were never
  /// written (including after a reset) are uninitialized.
  pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
    unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }

  /// Views the range as a mutable slice.
  ///
  /// # Safety
  ///
  /// Same as [`ByteRange::as_slice`], and no other view of the same bytes may
  /// be alive for `'a`.
  pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }
}
