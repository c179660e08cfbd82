pub mod backend;
pub mod config;
pub mod error;
pub mod memo;
pub mod prompt;
pub mod research;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::RedpillError;
