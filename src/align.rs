use std::mem;

use crate::ArenaError;

/// Alignment used when the caller does not ask for one: twice the machine word,
/// which matches natural pointer alignment for most targets.
///
/// ```text
///   64 bit machine: 16 bytes
///   32 bit machine:  8 bytes
/// ```
pub const DEFAULT_ALIGNMENT: usize = 2 * mem::size_of::<usize>();

/// Returns `true` if `value` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(value: usize) -> bool {
  value != 0 && (value & (value - 1)) == 0
}

/// Rounds `address` up to the next multiple of `alignment`.
///
/// ```text
///   address = 0x1003, alignment = 8
///
///   0x1000  0x1003      0x1008
///     ├───────┼───────────┤
///             │  padding  ▲
///             └───────────┘ returned
/// ```
///
/// Fails with [`ArenaError::InvalidAlignment`] when `alignment` is not a power
/// of two (zero included), and with [`ArenaError::SizeOverflow`] when the
/// rounded address does not fit in a `usize`.
///
/// # Examples
///
/// ```rust
/// use rarena::align_forward;
///
/// assert_eq!(align_forward(13, 8).unwrap(), 16);
/// assert_eq!(align_forward(16, 8).unwrap(), 16);
/// assert!(align_forward(13, 12).is_err());
/// ```
pub fn align_forward(
  address: usize,
  alignment: usize,
) -> Result<usize, ArenaError> {
  if !is_power_of_two(alignment) {
    return Err(ArenaError::InvalidAlignment { alignment });
  }

  let modulo = address & (alignment - 1);

  if modulo == 0 {
    return Ok(address);
  }

  address
    .checked_add(alignment - modulo)
    .ok_or(ArenaError::SizeOverflow)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_alignment() {
    match mem::size_of::<usize>() {
      8 => assert_eq!(DEFAULT_ALIGNMENT, 16),
      4 => assert_eq!(DEFAULT_ALIGNMENT, 8),
      _ => {},
    };
    assert!(is_power_of_two(DEFAULT_ALIGNMENT));
  }

  #[test]
  fn test_align_forward() {
    let ptr_size = mem::size_of::<usize>();

    let mut alignments = Vec::new();

    for i in 0..10 {
      let addresses = (ptr_size * i + 1)..=(ptr_size * (i + 1));

      let expected = ptr_size * (i + 1);

      alignments.push((addresses, expected));
    }

    for (addresses, expected) in alignments {
      for address in addresses {
        assert_eq!(expected, align_forward(address, ptr_size).unwrap());
      }
    }
  }

  #[test]
  fn test_align_forward_bounds() {
    for shift in 0..12 {
      let alignment = 1usize << shift;

      for address in 0..4096usize {
        let aligned = align_forward(address, alignment).unwrap();

        assert_eq!(aligned % alignment, 0);
        assert!(aligned >= address);
        assert!(aligned < address + alignment);
      }
    }
  }

  #[test]
  fn test_invalid_alignment() {
    for alignment in [0usize, 3, 6, 12, 24, 100] {
      assert_eq!(
        align_forward(64, alignment),
        Err(ArenaError::InvalidAlignment { alignment })
      );
    }
  }

  #[test]
  fn test_align_forward_overflow() {
    assert_eq!(align_forward(usize::MAX, 16), Err(ArenaError::SizeOverflow));
    assert_eq!(align_forward(usize::MAX, 1).unwrap(), usize::MAX);
  }
}
