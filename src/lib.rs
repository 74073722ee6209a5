//! blockdeque - a double-ended sequence over sqrt-decomposed linked chunks.
//!
//! The container keeps its elements in an outer linked list of chunks,
//! each chunk a doubly linked run sized near sqrt(n). Pushing and popping
//! at either end is O(1) amortized; indexed access, insertion, and erasure
//! anywhere are O(sqrt n) amortized, with copy-free splits and merges
//! keeping the decomposition balanced.
//!
//! # Quick Start
//!
//! ```
//! use blockdeque::BlockDeque;
//!
//! let mut deque: BlockDeque<u32> = (0..4).collect();
//! deque.push_front(99);
//! assert_eq!(deque.len(), 5);
//! assert_eq!(deque.at(0), Ok(&99));
//!
//! // Cursors support random-access arithmetic across chunk boundaries.
//! let third = deque.advance(deque.begin(), 3)?;
//! assert_eq!(deque.get(third), Ok(&2));
//! assert_eq!(deque.distance(deque.begin(), deque.end()), Ok(5));
//! # Ok::<(), blockdeque::Error>(())
//! ```

pub mod arena;
pub mod chunk;
pub mod cursor;
pub mod deque;
pub mod error;
pub mod profiling;

pub use cursor::Cursor;
pub use deque::{BlockDeque, IntoIter, Iter};
pub use error::Error;
