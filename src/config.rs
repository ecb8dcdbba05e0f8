use crate::{
  ArenaError,
  align::{DEFAULT_ALIGNMENT, is_power_of_two},
};

/// Block capacity used by [`ArenaConfig::default`]: one typical page.
pub const DEFAULT_BLOCK_CAPACITY: usize = 4096;

/// Settings for an [`ArenaChain`](crate::ArenaChain).
///
/// ```rust
/// use rarena::{ArenaChain, ArenaConfig};
///
/// let config = ArenaConfig::default().block_capacity(1024).alignment(8);
/// let chain = ArenaChain::with_config(config).unwrap();
///
/// assert_eq!(chain.block_capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
  /// Capacity of every block in the chain. Also the largest single request
  /// the chain can serve.
  pub block_capacity: usize,
  /// Alignment applied to requests made through [`Allocator`](crate::Allocator).
  pub alignment: usize,
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self {
      block_capacity: DEFAULT_BLOCK_CAPACITY,
      alignment: DEFAULT_ALIGNMENT,
    }
  }
}

impl ArenaConfig {
  pub fn block_capacity(
    mut self,
    block_capacity: usize,
  ) -> Self {
    self.block_capacity = block_capacity;
    self
  }

  pub fn alignment(
    mut self,
    alignment: usize,
  ) -> Self {
    self.alignment = alignment;
    self
  }

  /// Checks that the alignment is a power of two.
  pub fn validate(&self) -> Result<(), ArenaError> {
    if !is_power_of_two(self.alignment) {
      return Err(ArenaError::InvalidAlignment {
        alignment: self.alignment,
      });
    }

    Ok(())
  }
}
