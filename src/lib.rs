//! # rarena - A Region-Based Memory Allocator Library
//!
//! This crate provides an **arena allocator** (also known as a region or bump
//! allocator): byte ranges are carved out of a pre-reserved buffer by bumping
//! an offset, never reclaimed one by one, and all released together on reset
//! or teardown.
//!
//! ## Overview
//!
//! ```text
//!   Arena Block:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           BLOCK BUFFER                               │
//!   │                                                                      │
//!   │   ┌─────┬─┬─────┬─────┬─┬─────┬───────────────────────────────────┐  │
//!   │   │ A1  │▒│ A2  │ A3  │▒│ A4  │            Free Space             │  │
//!   │   └─────┴─┴─────┴─────┴─┴─────┴───────────────────────────────────┘  │
//!   │   ▲     ▲                     ▲                                   ▲  │
//!   │   │     │                     │                                   │  │
//!   │  base  padding             offset                          capacity  │
//!   │                          (next alloc)                                │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Each allocation aligns the offset, then "bumps" it forward.
//!   Allocation: O(1). Reset: O(1) per block. Single release: never.
//! ```
//!
//! When a block runs out, an [`ArenaChain`] appends another block of the same
//! capacity and keeps going:
//!
//! ```text
//!   ┌────────────┐     ┌────────────┐     ┌────────────┐
//!   │  block 0   │ ──▶ │  block 1   │ ──▶ │  block 2   │
//!   │ ██████░░░░ │     │ █████████░ │     │ ██░░░░░░░░ │
//!   └────────────┘     └────────────┘     └────────────┘
//!      searched first, in creation order ──────────▶
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarena
//!   ├── align      - align_forward and DEFAULT_ALIGNMENT
//!   ├── allocator  - Allocator capability trait and make::<T>
//!   ├── block      - ArenaBlock, a single fixed-capacity arena (owned or borrowed buffer)
//!   ├── chain      - ArenaChain, blocks that grow on demand
//!   ├── config     - ArenaConfig for chains
//!   ├── error      - ArenaError
//!   ├── fallback   - Fallback, composes two strategies
//!   ├── heap       - HeapAllocator, malloc/free strategy
//!   ├── print      - print_alloc / print_arena diagnostics
//!   └── range      - ByteRange handed out to callers
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rarena::{Allocator, ArenaChain, make};
//!
//! fn main() {
//!     let mut chain = ArenaChain::new(1024).unwrap();
//!
//!     // Call sites only need "something that can allocate".
//!     let allocator: &mut dyn Allocator = &mut chain;
//!
//!     let letters = make::<u8, _>(allocator, 26).unwrap();
//!
//!     unsafe {
//!         for i in 0..26 {
//!             letters.add(i).write(b'A' + i as u8);
//!         }
//!         assert_eq!(letters.add(25).read(), b'Z');
//!     }
//!
//!     // Everything goes away at once.
//!     chain.reset();
//!     assert_eq!(chain.used(), 0);
//! }
//! ```
//!
//! ## The Allocator Capability
//!
//! [`Allocator`] is a two-operation interface, `allocate(size)` (with an
//! `allocate_aligned(size, alignment)` variant) and `release(range, size)`.
//! Strategies implementing it:
//!
//! | Strategy          | `allocate`                    | `release`          |
//! |-------------------|-------------------------------|--------------------|
//! | [`ArenaBlock`]    | bump, fails when full         | no-op              |
//! | [`ArenaChain`]    | bump, grows when full         | no-op              |
//! | [`HeapAllocator`] | `posix_memalign`              | `free` if owned    |
//! | [`Fallback`]      | primary, then secondary       | routed by `owns`   |
//!
//! Arena `release` is a no-op on purpose: a bump allocator keeps no per-range
//! bookkeeping, so memory only comes back on reset or destruction. Code
//! written against the trait should still release what it is done with, so
//! that it behaves under strategies that do reclaim.
//!
//! ## Errors
//!
//! | Error                  | Meaning                                              |
//! |------------------------|------------------------------------------------------|
//! | `OutOfMemory`          | block buffer could not be reserved                   |
//! | `InvalidAlignment`     | alignment is not a power of two                      |
//! | `InsufficientSpace`    | block is full; chains grow on this                   |
//! | `AllocationTooLarge`   | request can never fit in one block                   |
//! | `SizeOverflow`         | `make` byte size overflowed `usize`                  |
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization. Use one arena per thread or
//!   wrap it in a lock.
//! - **No individual deallocation**: no free-list, no reuse of sub-ranges.
//! - **Uninitialized memory**: nothing is zeroed, not even after a reset.
//!
//! ## Safety
//!
//! Allocation itself is safe. Reading or writing through a [`ByteRange`] is
//! `unsafe`: the range dangles as soon as its block is reset or destroyed, and
//! the compiler cannot track that.

pub mod align;
mod allocator;
mod block;
mod chain;
mod config;
mod error;
mod fallback;
mod heap;
mod print;
mod range;

pub use align::{DEFAULT_ALIGNMENT, align_forward};
pub use allocator::{Allocator, make};
pub use block::ArenaBlock;
pub use chain::ArenaChain;
pub use config::{ArenaConfig, DEFAULT_BLOCK_CAPACITY};
pub use error::ArenaError;
pub use fallback::Fallback;
pub use heap::HeapAllocator;
pub use print::{print_alloc, print_arena};
pub use range::ByteRange;
