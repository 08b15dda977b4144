//! File watcher for externally edited settings documents.
//!
//! Uses the `notify` crate with a debounce window so editors that save
//! via write + rename produce a single signal.

mod file_watcher;


pub use file_watcher::{FileWatcher, DEFAULT_DEBOUNCE};
