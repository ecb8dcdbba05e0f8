use crate::{ArenaChain, ByteRange};

/// Prints where a range landed. The allocator itself never prints; callers
/// reach for this when they want to watch it work.
pub fn print_alloc(range: &ByteRange) {
  println!(
    "Allocated {} bytes, address = {:?}, end = {:#x}",
    range.len(),
    range.as_ptr(),
    range.end_addr()
  );
}

/// Prints the chain summary followed by one line per block.
pub fn print_arena(chain: &ArenaChain) {
  print!("{}", chain);
}
