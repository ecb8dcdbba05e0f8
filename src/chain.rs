use std::fmt;

use crate::{Allocator, ArenaBlock, ArenaConfig, ArenaError, ByteRange, align::is_power_of_two};

/// An arena that grows by appending equal-capacity blocks.
///
/// ```text
///   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
///   │   block 0    │──▶│   block 1    │──▶│   block 2    │   (created on demand)
///   │ ████████░░░░ │   │ ██████████░░ │   │ ███░░░░░░░░░ │
///   └──────────────┘   └──────────────┘   └──────────────┘
/// ```
///
/// Every request walks the blocks from the head and lands in the first one
/// that has room, so a small request can still fill a gap left in an older
/// block. Only when no block has room is a new one appended.
///
/// Blocks are kept in a `Vec`, so reset and destruction are plain loops and
/// never recurse.
#[derive(Debug)]
pub struct ArenaChain {
  blocks: Vec<ArenaBlock<'static>>,
  config: ArenaConfig,
}

impl ArenaChain {
  /// Creates a chain whose blocks hold `block_capacity` bytes each, using
  /// [`DEFAULT_ALIGNMENT`](crate::DEFAULT_ALIGNMENT).
  pub fn new(block_capacity: usize) -> Result<Self, ArenaError> {
    Self::with_config(ArenaConfig::default().block_capacity(block_capacity))
  }

  /// Creates a chain from `config`. The head block is reserved immediately.
  pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
    config.validate()?;

    let head = ArenaBlock::new(config.block_capacity)?;

    Ok(Self {
      blocks: vec![head],
      config,
    })
  }

  /// Allocates `size` bytes with the configured alignment.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    self.allocate_aligned(size, self.config.alignment)
  }

  /// Allocates `size` bytes aligned to `alignment`, growing the chain by one
  /// block when none of the existing ones has room.
  ///
  /// Fails with [`ArenaError::AllocationTooLarge`] when `size` exceeds the
  /// block capacity, or when even an empty block cannot fit the request once
  /// alignment padding is accounted for.
  pub fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    if !is_power_of_two(alignment) {
      return Err(ArenaError::InvalidAlignment { alignment });
    }

    let block_capacity = self.config.block_capacity;

    let too_large = ArenaError::AllocationTooLarge {
      requested: size,
      capacity: block_capacity,
    };

    if size > block_capacity {
      return Err(too_large);
    }

    for block in self.blocks.iter_mut() {
      match block.allocate_aligned(size, alignment) {
        Err(ArenaError::InsufficientSpace { .. }) => continue,
        result => return result,
      }
    }

    let mut block = ArenaBlock::new(block_capacity)?;

    let range = match block.allocate_aligned(size, alignment) {
      Err(ArenaError::InsufficientSpace { .. }) => return Err(too_large),
      result => result?,
    };

    self.blocks.push(block);

    Ok(range)
  }

  /// Resets every block. Blocks are kept, so a chain that grew once does not
  /// have to grow again for the same workload.
  pub fn reset(&mut self) {
    for block in self.blocks.iter_mut() {
      block.reset();
    }
  }

  /// Releases every block. Same as dropping the chain.
  pub fn destroy(self) {
    drop(self);
  }

  /// Number of blocks in the chain. Never zero.
  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn block(
    &self,
    index: usize,
  ) -> Option<&ArenaBlock<'static>> {
    self.blocks.get(index)
  }

  /// Blocks in creation order.
  pub fn blocks(&self) -> impl Iterator<Item = &ArenaBlock<'static>> {
    self.blocks.iter()
  }

  pub fn config(&self) -> &ArenaConfig {
    &self.config
  }

  pub fn block_capacity(&self) -> usize {
    self.config.block_capacity
  }

  /// Total capacity across all blocks.
  pub fn capacity(&self) -> usize {
    self.blocks.iter().map(ArenaBlock::capacity).sum()
  }

  /// Bytes consumed across all blocks, padding included.
  pub fn used(&self) -> usize {
    self.blocks.iter().map(ArenaBlock::used).sum()
  }

  /// Bytes handed out across all blocks, padding excluded.
  pub fn committed(&self) -> usize {
    self.blocks.iter().map(ArenaBlock::committed).sum()
  }

  /// Which block `range` lives in and at what offset.
  pub fn locate(
    &self,
    range: &ByteRange,
  ) -> Option<(usize, usize)> {
    self
      .blocks
      .iter()
      .enumerate()
      .find_map(|(index, block)| block.offset_of(range).map(|offset| (index, offset)))
  }
}

impl fmt::Display for ArenaChain {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(
      f,
      "ArenaChain: {} block(s), capacity = {}, used = {}, committed = {}",
      self.len(),
      self.capacity(),
      self.used(),
      self.committed()
    )?;

    for (index, block) in self.blocks.iter().enumerate() {
      writeln!(f, "  [{}] {}", index, block)?;
    }

    Ok(())
  }
}

impl Allocator for ArenaChain {
  fn allocate(
    &mut self,
    size: usize,
  ) -> Result<ByteRange, ArenaError> {
    ArenaChain::allocate(self, size)
  }

  fn allocate_aligned(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<ByteRange, ArenaError> {
    ArenaChain::allocate_aligned(self, size, alignment)
  }

  /// Does nothing, like [`ArenaBlock`]'s release. Memory comes back on
  /// [`reset`](ArenaChain::reset) or when the chain is destroyed.
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
    self.locate(range).is_some()
  }
}
