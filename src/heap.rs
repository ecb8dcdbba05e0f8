use std::{
  collections::BTreeMap,
  mem,
  ptr::{self, NonNull},
};

use libc::{c_void, free, posix_memalign};

use crate::{Allocator, ArenaError, ByteRange, DEFAULT_ALIGNMENT, align::is_power_of_two};

/// A strategy that gets every range straight from the C heap and gives it back
/// on [`release`](Allocator::release).
///
/// Unlike the arenas, releasing here really frees memory. Live ranges are
/// tracked by start address, so [`owns`](Allocator::owns) answers truthfully,
/// releasing a range this allocator never handed out does nothing, and
/// whatever is still live when the allocator is dropped gets freed then.
#[derive(Debug, Default)]
pub struct HeapAllocator {
  live: BTreeMap<usize, usize>,
  live_bytes: usize,
}

impl HeapAllocator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of ranges handed out and not yet released.
  pub fn live(&self) -> usize {
    self.live.len()
  }

  /// Bytes handed out and not yet released.
  pub fn live_bytes(&self) -> usize {
    self.live_bytes
  }
}

impl Allocator for HeapAllocator {
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    self.allocate_aligned(size, DEFAULT_ALIGNMENT)
  }

  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    if !is_power_of_two(alignment) {
      return Err(ArenaError::InvalidAlignment { alignment });
    }

    if size == 0 {
      return Ok(ByteRange::empty());
    }

    let mut raw: *mut c_void = ptr::null_mut();

    // posix_memalign wants at least pointer alignment.
    let alignment = alignment.max(mem::size_of::<*mut c_void>());

    let status = unsafe { posix_memalign(&mut raw, alignment, size) };

    if status != 0 {
      return Err(ArenaError::OutOfMemory { capacity: size });
    }

    let ptr = NonNull::new(raw as *mut u8).ok_or(ArenaError::OutOfMemory { capacity: size })?;

    self.live.insert(ptr.as_ptr() as usize, size);
    self.live_bytes += size;

    Ok(ByteRange::new(ptr, size))
  }

  unsafe fn release(
    &mut self,
    range: ByteRange,
    _size: usize,
  ) {
    if let Some(size) = self.live.remove(&range.addr()) {
      unsafe { free(range.as_ptr() as *mut c_void) };
      self.live_bytes -= size;
    }
  }

  fn owns(
    &self,
    range: &ByteRange,
  ) -> bool {
    if range.is_empty() {
      return false;
    }

    match self.live.range(..=range.addr()).next_back() {
      Some((start, size)) => range.end_addr() <= start + size,
      None => false,
    }
  }
}

impl Drop for HeapAllocator {
  fn drop(&mut self) {
    for addr in self.live.keys() {
      unsafe { free(*addr as *mut c_void) };
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_alloc_release() {
    let mut heap = HeapAllocator::new();

    let first = heap.allocate(64).unwrap();
    let second = heap.allocate(10).unwrap();

    assert_eq!(heap.live(), 2);
    assert_eq!(heap.live_bytes(), 74);
    assert_eq!(first.addr() % DEFAULT_ALIGNMENT, 0);
    assert!(!first.overlaps(&second));

    unsafe {
      first.as_mut_slice().fill(0xAB);
      assert!(first.as_slice().iter().all(|byte| *byte == 0xAB));

      heap.release(first, 64);
    }

    assert_eq!(heap.live(), 1);
    assert_eq!(heap.live_bytes(), 10);

    unsafe { heap.release(second, 10) };

    assert_eq!(heap.live(), 0);
    assert_eq!(heap.live_bytes(), 0);
  }

  #[test]
  fn test_aligned() {
    let mut heap = HeapAllocator::new();

    let range = heap.allocate_aligned(24, 256).unwrap();
    assert_eq!(range.addr() % 256, 0);

    let small = heap.allocate_aligned(3, 1).unwrap();
    assert_eq!(small.len(), 3);

    assert_eq!(
      heap.allocate_aligned(8, 24).unwrap_err(),
      ArenaError::InvalidAlignment { alignment: 24 }
    );
    assert_eq!(heap.live(), 2);
  }

  #[test]
  fn test_zero_size() {
    let mut heap = HeapAllocator::new();

    let range = heap.allocate(0).unwrap();
    assert!(range.is_empty());
    assert_eq!(heap.live(), 0);

    unsafe { heap.release(range, 0) };
    assert_eq!(heap.live(), 0);
  }

  #[test]
  fn test_owns() {
    let mut heap = HeapAllocator::new();

    let range = heap.allocate(32).unwrap();
    assert!(heap.owns(&range));

    let inner = ByteRange::new(unsafe { range.as_non_null().add(8) }, 8);
    assert!(heap.owns(&inner));

    let mut buffer = [0u8; 8];
    let foreign = ByteRange::new(NonNull::from(&mut buffer).cast(), 8);
    assert!(!heap.owns(&foreign));

    // Not ours: nothing is freed and the bookkeeping is untouched.
    unsafe { heap.release(foreign, 8) };
    assert_eq!(heap.live(), 1);

    unsafe { heap.release(range, 32) };
    assert!(!heap.owns(&range));
    assert_eq!(heap.live(), 0);
  }

  #[test]
  fn test_drop_frees_live() {
    let mut heap = HeapAllocator::new();

    heap.allocate(128).unwrap();
    heap.allocate(16).unwrap();
    assert_eq!(heap.live_bytes(), 144);

    drop(heap);
  }
}
