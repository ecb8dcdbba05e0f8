use std::{mem, ptr::NonNull};

use crate::{ArenaError, ByteRange};

/// The capability to allocate and release memory.
///
/// Call sites should depend on this trait (usually as `&mut dyn Allocator`)
/// rather than on a concrete strategy, so the backing store can be an
/// [`ArenaBlock`](crate::ArenaBlock), an [`ArenaChain`](crate::ArenaChain), a
/// [`HeapAllocator`](crate::HeapAllocator) or a [`Fallback`](crate::Fallback)
/// of those without the caller changing.
///
/// # Release semantics differ by strategy
///
/// Arena strategies never reclaim a single range: their `release` is an
/// intentional no-op and memory only comes back on reset or destruction.
/// Other strategies (e.g. [`HeapAllocator`](crate::HeapAllocator)) do reclaim
/// on `release`. Callers must not assume either behaviour and should release
/// every range they are done with.
pub trait Allocator {
  /// Hands out a range of exactly `size` bytes. A zero `size` yields an empty
  /// range and consumes nothing.
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError>;

  /// Hands out a range of exactly `size` bytes whose start is a multiple of
  /// `alignment`, which must be a power of two.
  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError>;

  /// Gives `range` back to the allocator. Never fails.
  ///
  /// # Safety
  ///
  /// `range` must have been returned by `allocate` on this allocator with the
  /// same `size`, must not have been released already, and must not be used
  /// afterwards.
  unsafe fn release(
    &mut self,
    range: ByteRange,
    size: usize,
  );

  /// Whether `range` was carved from this allocator's memory. Strategies that
  /// cannot tell answer `false`.
  fn owns(
    &self,
    _range: &ByteRange,
  ) -> bool {
    false
  }
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    (**self).allocate(size)
  }

  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    (**self).allocate_aligned(size, alignment)
  }

  unsafe fn release(
    &mut self,
    range: ByteRange,
    size: usize,
  ) {
    unsafe { (**self).release(range, size) }
  }

  fn owns(
    &self,
    range: &ByteRange,
  ) -> bool {
    (**self).owns(range)
  }
}

/// Allocates room for `count` values of `T` and returns a pointer to the first.
///
/// The memory is uninitialized and aligned for `T`, whatever alignment the
/// allocator uses by default. Fails with [`ArenaError::SizeOverflow`] if the
/// byte size overflows.
///
/// ```rust
/// use rarena::{ArenaBlock, make};
///
/// let mut block = ArenaBlock::new(256).unwrap();
/// let values = make::<u32, _>(&mut block, 4).unwrap();
///
/// unsafe {
///   for i in 0..4 {
///     values.add(i).write(i as u32 * 10);
///   }
///   assert_eq!(values.add(3).read(), 30);
/// }
/// ```
pub fn make<T, A: Allocator + ?Sized>(
  allocator: &mut A,
  count: usize,
) -> Result<NonNull<T>, ArenaError> {
  let size = mem::size_of::<T>()
    .checked_mul(count)
    .ok_or(ArenaError::SizeOverflow)?;

  let range = allocator.allocate_aligned(size, mem::align_of::<T>())?;

  if range.is_empty() {
    return Ok(NonNull::dangling());
  }

  Ok(range.as_non_null().cast())
}
