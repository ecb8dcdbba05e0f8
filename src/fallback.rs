use crate::{Allocator, ArenaError, ByteRange};

/// Composes two strategies: requests go to `primary`, and spill over to
/// `secondary` when the primary is out of room or the request is too large for
/// it.
///
/// ```rust
/// use rarena::{Allocator, ArenaBlock, Fallback, HeapAllocator};
///
/// let mut allocator = Fallback::new(ArenaBlock::new(64).unwrap(), HeapAllocator::new());
///
/// let small = allocator.allocate(32).unwrap();
/// let large = allocator.allocate(512).unwrap();
///
/// assert!(allocator.primary().owns(&small));
/// assert_eq!(allocator.secondary().live(), 1);
///
/// unsafe {
///   allocator.release(small, 32);
///   allocator.release(large, 512);
/// }
/// assert_eq!(allocator.secondary().live(), 0);
/// ```
///
/// Releases are routed by [`Allocator::owns`]: ranges the primary recognises go
/// back to it, everything else to the secondary. The primary must therefore
/// answer `owns` truthfully; every strategy in this crate does.
#[derive(Debug)]
pub struct Fallback<P, S> {
  primary: P,
  secondary: S,
}

impl<P: Allocator, S: Allocator> Fallback<P, S> {
  pub fn new(
    primary: P,
    secondary: S,
  ) -> Self {
    Self { primary, secondary }
  }

  pub fn primary(&self) -> &P {
    &self.primary
  }

  pub fn primary_mut(&mut self) -> &mut P {
    &mut self.primary
  }

  pub fn secondary(&self) -> &S {
    &self.secondary
  }

  pub fn secondary_mut(&mut self) -> &mut S {
    &mut self.secondary
  }

  pub fn into_parts(self) -> (P, S) {
    (self.primary, self.secondary)
  }
}

impl<P: Allocator, S: Allocator> Allocator for Fallback<P, S> {
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    match self.primary.allocate(size) {
      Err(ArenaError::InsufficientSpace { .. } | ArenaError::AllocationTooLarge { .. }) => {
        self.secondary.allocate(size)
      },
      result => result,
    }
  }

  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    match self.primary.allocate_aligned(size, alignment) {
      Err(ArenaError::InsufficientSpace { .. } | ArenaError::AllocationTooLarge { .. }) => {
        self.secondary.allocate_aligned(size, alignment)
      },
      result => result,
    }
  }

  unsafe fn release(
    &mut self,
    range: ByteRange,
    size: usize,
  ) {
    if self.primary.owns(&range) {
      unsafe { self.primary.release(range, size) }
    } else {
      unsafe { self.secondary.release(range, size) }
    }
  }

  fn owns(
    &self,
    range: &ByteRange,
  ) -> bool {
    self.primary.owns(range) || self.secondary.owns(range)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ArenaBlock, ArenaChain, HeapAllocator};

  #[test]
  fn test_spill_when_full() {
    let mut allocator = Fallback::new(ArenaBlock::new(64).unwrap(), HeapAllocator::new());

    let first = allocator.allocate(48).unwrap();
    let second = allocator.allocate(48).unwrap();

    assert!(allocator.primary().owns(&first));
    assert!(!allocator.primary().owns(&second));
    assert_eq!(allocator.secondary().live(), 1);

    unsafe {
      allocator.release(first, 48);
      allocator.release(second, 48);
    }

    assert_eq!(allocator.primary().committed(), 48);
    assert_eq!(allocator.secondary().live(), 0);
  }

  #[test]
  fn test_spill_when_too_large() {
    let mut allocator = Fallback::new(ArenaChain::new(128).unwrap(), HeapAllocator::new());

    let small = allocator.allocate(100).unwrap();
    let large = allocator.allocate(4096).unwrap();

    assert_eq!(allocator.primary().len(), 1);
    assert!(allocator.owns(&small));
    assert_eq!(allocator.secondary().live_bytes(), 4096);

    unsafe {
      allocator.release(large, 4096);
      allocator.release(small, 100);
    }

    let (chain, heap) = allocator.into_parts();
    assert_eq!(chain.committed(), 100);
    assert_eq!(heap.live(), 0);
  }

  #[test]
  fn test_chain_grows_before_spilling() {
    let mut allocator = Fallback::new(ArenaChain::new(64).unwrap(), HeapAllocator::new());

    allocator.allocate(64).unwrap();
    allocator.allocate(64).unwrap();

    assert_eq!(allocator.primary().len(), 2);
    assert_eq!(allocator.secondary().live(), 0);
  }

  #[test]
  fn test_heap_primary_routes_release() {
    let mut buffer = [0u8; 256];
    let mut allocator = Fallback::new(HeapAllocator::new(), ArenaBlock::from_slice(&mut buffer));

    let first = allocator.allocate(32).unwrap();
    let second = allocator.allocate(16).unwrap();

    assert!(allocator.primary().owns(&first));
    assert_eq!(allocator.primary().live(), 2);
    assert_eq!(allocator.secondary().used(), 0);

    unsafe {
      allocator.release(first, 32);
      allocator.release(second, 16);
    }

    assert_eq!(allocator.primary().live(), 0);
  }

  #[test]
  fn test_aligned_spill() {
    let mut allocator = Fallback::new(ArenaChain::new(64).unwrap(), HeapAllocator::new());

    let range = allocator.allocate_aligned(128, 64).unwrap();

    assert_eq!(range.addr() % 64, 0);
    assert_eq!(allocator.secondary().live(), 1);

    assert_eq!(
      allocator.allocate_aligned(8, 12).unwrap_err(),
      ArenaError::InvalidAlignment { alignment: 12 }
    );
    assert_eq!(allocator.secondary().live(), 1);
  }
}
