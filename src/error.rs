use thiserror::Error;

/// Everything that can go wrong while reserving or carving arena memory.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ArenaError {
  /// The backing buffer for a block could not be reserved.
  #[error("out of memory: could not reserve a {capacity} byte block")]
  OutOfMemory { capacity: usize },

  /// The requested alignment is not a power of two.
  #[error("invalid alignment {alignment}: must be a non-zero power of two")]
  InvalidAlignment { alignment: usize },

  /// The block has no room left for this request. Chains grow on this error.
  #[error("insufficient space: requested {requested} bytes, {remaining} remaining")]
  InsufficientSpace { requested: usize, remaining: usize },

  /// No single block of this capacity can ever hold the request.
  #[error("allocation too large: requested {requested} bytes, block capacity is {capacity}")]
  AllocationTooLarge { requested: usize, capacity: usize },

  /// A size or address computation overflowed `usize`.
  #[error("size overflow")]
  SizeOverflow,
}

impl ArenaError {
  /// Whether a caller can reasonably act on this error, e.g. by growing or
  /// falling back to another allocator.
  pub fn is_recoverable(&self) -> bool {
    matches!(self, ArenaError::InsufficientSpace { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display() {
    let err = ArenaError::InsufficientSpace {
      requested: 960,
      remaining: 800,
    };
    assert_eq!(
      err.to_string(),
      "insufficient space: requested 960 bytes, 800 remaining"
    );

    let err = ArenaError::InvalidAlignment { alignment: 12 };
    assert_eq!(
      err.to_string(),
      "invalid alignment 12: must be a non-zero power of two"
    );
  }

  #[test]
  fn test_recoverable() {
    assert!(
      ArenaError::InsufficientSpace {
        requested: 1,
        remaining: 0
      }
      .is_recoverable()
    );
    assert!(
      !ArenaError::AllocationTooLarge {
        requested: 2048,
        capacity: 1024
      }
      .is_recoverable()
    );
    assert!(!ArenaError::OutOfMemory { capacity: 8 }.is_recoverable());
    assert!(!ArenaError::InvalidAlignment { alignment: 0 }.is_recoverable());
  }
}
