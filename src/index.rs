//! Index access.
//!
//! Retrieval consumes an already-built index through the [`IndexReader`]
//! trait. Any backend (an inverted file, a remote search service, the
//! in-memory [`MemoryIndex`] used by the batch driver and tests) can serve
//! the models by implementing it.

pub mod memory;
pub mod posting;
pub mod reader;

pub use memory::{MemoryIndex, MemoryIndexBuilder};
pub use posting::{Posting, PostingList};
pub use reader::{DocRef, IndexReader};
