use std::{fmt, marker::PhantomData, ptr::NonNull};

use libc::{c_void, free, posix_memalign};

use crate::{
  Allocator, ArenaError, ByteRange,
  align::{DEFAULT_ALIGNMENT, align_forward},
};

/// A single fixed-capacity arena.
///
/// ```text
///   base                      base + offset             base + capacity
///    ├──────┬──┬────────┬──────┼──────────────────────────────┤
///    │  A1  │▒▒│   A2   │  A3  │          free space          │
///    └──────┴──┴────────┴──────┴──────────────────────────────┘
///            ▲
///            └── alignment padding (counted in `offset`, not in `committed`)
/// ```
///
/// A block either owns its buffer, reserved once with `posix_memalign` by
/// [`ArenaBlock::new`] and released when the block is dropped or
/// [`destroy`](ArenaBlock::destroy)ed, or borrows one from the caller through
/// [`ArenaBlock::from_slice`].
pub struct ArenaBlock<'a> {
  base: NonNull<u8>,
  capacity: usize,
  offset: usize,
  committed: usize,
  owned: bool,
  _buffer: PhantomData<&'a mut [u8]>,
}

// SAFETY: The block has exclusive access to its buffer, owned or borrowed
// mutably. Ranges handed out from it are raw and carry no borrow, so moving the
// block to another thread is no different from moving a `&mut [u8]`.
unsafe impl Send for ArenaBlock<'_> {}

impl ArenaBlock<'static> {
  /// Reserves an uninitialized buffer of exactly `capacity` usable bytes.
  ///
  /// The buffer start is aligned to [`DEFAULT_ALIGNMENT`], so placement of
  /// default-aligned allocations is the same on every run.
  pub fn new(capacity: usize) -> Result<Self, ArenaError> {
    let mut raw: *mut c_void = std::ptr::null_mut();

    // posix_memalign may hand back null for a zero-sized request.
    let reserve = capacity.max(1);

    let status = unsafe { posix_memalign(&mut raw, DEFAULT_ALIGNMENT, reserve) };

    if status != 0 {
      return Err(ArenaError::OutOfMemory { capacity });
    }

    let base = NonNull::new(raw as *mut u8).ok_or(ArenaError::OutOfMemory { capacity })?;

    Ok(Self {
      base,
      capacity,
      offset: 0,
      committed: 0,
      owned: true,
      _buffer: PhantomData,
    })
  }
}

impl<'a> ArenaBlock<'a> {
  /// Builds a block over memory the caller already has, e.g. a stack array or
  /// a static buffer. Nothing is freed on drop.
  ///
  /// The buffer may start at any address; padding is applied per request.
  ///
  /// ```rust
  /// use rarena::ArenaBlock;
  ///
  /// let mut buffer = [0u8; 256];
  /// let mut block = ArenaBlock::from_slice(&mut buffer);
  ///
  /// let range = block.allocate_aligned(10, 8).unwrap();
  /// assert_eq!(range.addr() % 8, 0);
  /// assert_eq!(block.committed(), 10);
  /// ```
  pub fn from_slice(buffer: &'a mut [u8]) -> Self {
    let capacity = buffer.len();

    Self {
      base: NonNull::from(buffer).cast::<u8>(),
      capacity,
      offset: 0,
      committed: 0,
      owned: false,
      _buffer: PhantomData,
    }
  }

  /// Carves `size` bytes aligned to `alignment` off the front of the free
  /// space.
  ///
  /// Zero-sized requests return [`ByteRange::empty`] and consume nothing,
  /// though `alignment` is still checked.
  pub fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    let insufficient = ArenaError::InsufficientSpace {
      requested: size,
      remaining: self.remaining(),
    };

    let base = self.base_addr();

    let aligned = match align_forward(base + self.offset, alignment) {
      Err(ArenaError::SizeOverflow) => return Err(insufficient),
      result => result?,
    };

    if size == 0 {
      return Ok(ByteRange::empty());
    }

    let start = aligned - base;

    if start > self.capacity || size > self.capacity - start {
      return Err(insufficient);
    }

    self.offset = start + size;
    self.committed += size;

    // SAFETY: `start + size <= capacity`, so the pointer stays inside the buffer.
    let ptr = unsafe { self.base.add(start) };

    Ok(ByteRange::new(ptr, size))
  }

  /// [`allocate_aligned`](ArenaBlock::allocate_aligned) with [`DEFAULT_ALIGNMENT`].
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    self.allocate_aligned(size, DEFAULT_ALIGNMENT)
  }

  /// Forgets every allocation. The buffer keeps its old contents; nothing is
  /// zeroed.
  pub fn reset(&mut self) {
    self.offset = 0;
    self.committed = 0;
  }

  /// Releases the buffer, or hands a borrowed one back to the caller. Same as
  /// dropping the block.
  pub fn destroy(self) {
    drop(self);
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Bytes consumed so far, padding included.
  pub fn used(&self) -> usize {
    self.offset
  }

  /// Bytes handed out to callers, padding excluded.
  pub fn committed(&self) -> usize {
    self.committed
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.offset
  }

  /// Whether `range` lies inside this block's buffer.
  pub fn contains(
    &self,
    range: &ByteRange,
  ) -> bool {
    self.offset_of(range).is_some()
  }

  /// Offset of `range` from the start of the buffer, if it was carved from
  /// this block. Empty ranges belong to no block.
  pub fn offset_of(
    &self,
    range: &ByteRange,
  ) -> Option<usize> {
    if range.is_empty() {
      return None;
    }

    let base = self.base_addr();

    if range.addr() < base || range.end_addr() > base + self.capacity {
      return None;
    }

    Some(range.addr() - base)
  }

  fn base_addr(&self) -> usize {
    self.base.as_ptr() as usize
  }
}

impl Drop for ArenaBlock<'_> {
  fn drop(&mut self) {
    if self.owned {
      unsafe { free(self.base.as_ptr() as *mut c_void) };
    }
  }
}

impl fmt::Debug for ArenaBlock<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("ArenaBlock")
      .field("base", &self.base)
      .field("capacity", &self.capacity)
      .field("offset", &self.offset)
      .field("committed", &self.committed)
      .field("owned", &self.owned)
      .finish()
  }
}

impl fmt::Display for ArenaBlock<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "capacity = {}, used = {}, committed = {}",
      self.capacity, self.offset, self.committed
    )
  }
}

impl Allocator for ArenaBlock<'_> {
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    ArenaBlock::allocate(self, size)
  }

  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    ArenaBlock::allocate_aligned(self, size, alignment)
  }

  /// Does nothing: a bump allocator cannot hand back a single range. The
  /// memory comes back on [`reset`](ArenaBlock::reset) or when the block is
  /// destroyed.
  unsafe fn release(
    &mut self,
    _range: ByteRange,
    _size: usize,
  ) {
  }

  fn owns(
    &self,
    range: &ByteRange,
  ) -> bool {
    self.contains(range)
  }
}
