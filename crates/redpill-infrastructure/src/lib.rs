//! Filesystem-backed infrastructure: the store, paths, and config IO.

pub mod config_service;
mod file_store;
mod paths;

pub use file_store::FileKeyValueStore;
pub use paths::RedpillPaths;
