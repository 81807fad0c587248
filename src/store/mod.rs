//! Presence-index storage: the adapter interface the worker consumes plus
//! the file-backed and in-memory implementations.

pub mod adapter;
pub mod file_store;
pub mod memory;

pub use adapter::{PresenceAdapter, StoreProvider};
pub use file_store::{FilePresenceStore, FileStoreProvider};
pub use memory::MemoryPresenceStore;
