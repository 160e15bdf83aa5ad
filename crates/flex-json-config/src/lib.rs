//! Persistence for flex-json documents.
//!
//! [`ConfigFile`] loads a [`Document`](flex_json::Document) from a
//! [`Storage`] and saves it back, with async and blocking variants of each
//! operation.

mod config_file;
mod storage;

pub use config_file::ConfigFile;
pub use storage::{FileStorage, Storage};
