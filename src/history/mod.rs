//! Finished-cycle history
//!
//! This module contains the history record type and its file-backed store.

pub mod entry;
pub mod store;

// Re-export main types
pub use entry::HistoryEntry;
pub use store::HistoryStore;
