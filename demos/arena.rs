use std::io;

use rarena::{Allocator, ArenaBlock, ArenaChain, ArenaError, make, print_alloc, print_arena};

/// Holds the walkthrough on one step until a line is entered, so the arena
/// state just printed can be compared with what an outside tool reports.
fn pause_between_steps() {
  println!("\n>>> Step done, hit RETURN for the next one");
  let mut line = String::new();
  io::stdin().read_line(&mut line).ok();
}

fn main() -> Result<(), ArenaError> {
  // Blocks of 1 KiB. The head block is reserved right away; more are
  // appended only when a request does not fit anywhere.
  let mut chain = ArenaChain::new(1024)?;

  print_arena(&chain);
  pause_between_steps();

  // --------------------------------------------------------------------
  // 1) Allocate 26 bytes through the capability and fill them with letters.
  // --------------------------------------------------------------------
  {
    let allocator: &mut dyn Allocator = &mut chain;
    let letters = make::<u8, _>(allocator, 26)?;

    print!("\n[1] Letters: ");
    unsafe {
      for i in 0..26 {
        letters.add(i).write(b'A' + i as u8);
        print!("{} ", letters.add(i).read() as char);
      }
    }
    println!();
  }

  print_arena(&chain);
  pause_between_steps();

  // --------------------------------------------------------------------
  // 2) 224 bytes, then 960: the second does not fit in what is left of
  //    block 0 and lands at the start of a fresh block 1.
  // --------------------------------------------------------------------
  let first = chain.allocate(224)?;
  println!("\n[2] Allocate 224 bytes");
  print_alloc(&first);

  let second = chain.allocate(960)?;
  println!("[2] Allocate 960 bytes (grows the chain)");
  print_alloc(&second);

  print_arena(&chain);
  pause_between_steps();

  // --------------------------------------------------------------------
  // 3) 700 bytes still fit in block 0, which is searched first.
  // --------------------------------------------------------------------
  let third = chain.allocate(700)?;
  println!("\n[3] Allocate 700 bytes (fills the gap in block 0)");
  print_alloc(&third);
  println!("[3] Located at (block, offset) = {:?}", chain.locate(&third));

  print_arena(&chain);
  pause_between_steps();

  // --------------------------------------------------------------------
  // 4) Anything larger than a block can never be served.
  // --------------------------------------------------------------------
  match chain.allocate(4096) {
    Ok(range) => print_alloc(&range),
    Err(err) => println!("\n[4] {}", err),
  }

  pause_between_steps();

  // --------------------------------------------------------------------
  // 5) Reset keeps the blocks but forgets every allocation.
  // --------------------------------------------------------------------
  chain.reset();
  println!("\n[5] Reset");
  print_arena(&chain);

  // --------------------------------------------------------------------
  // 6) Destroy releases every block at once.
  // --------------------------------------------------------------------
  chain.destroy();
  println!("\n[6] All blocks released.");

  // --------------------------------------------------------------------
  // 7) A block can also run over a buffer the caller already owns, here a
  //    stack array. Dropping the block leaves the array alone.
  // --------------------------------------------------------------------
  let mut stack_buffer = [0u8; 128];
  let mut block = ArenaBlock::from_slice(&mut stack_buffer);

  let greeting = block.allocate_aligned(5, 1)?;
  unsafe { greeting.as_mut_slice().copy_from_slice(b"hello") };
  println!("\n[7] Allocate 5 bytes from a stack buffer");
  print_alloc(&greeting);
  println!("[7] {}", block);

  block.destroy();
  println!("[7] Buffer still holds {:?}", std::str::from_utf8(&stack_buffer[..5]));

  Ok(())
}
