//! Key-value persistence: backend trait and write-through mirror.

pub mod backend;
pub mod mirror;

pub use backend::{MemoryBackend, StorageBackend, StorageError};
pub use mirror::{keys, Mirror};
