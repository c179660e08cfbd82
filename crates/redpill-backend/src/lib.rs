//! HTTP implementation of the core chat backend seam.

mod http;

pub use http::{HealthReport, HttpChatBackend};
