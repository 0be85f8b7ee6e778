//! Persistent consent store: a versioned, expiring record in client-local
//! key-value storage.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ConsentStore, LoadOutcome};
