//! Session domain module.
//!
//! This module contains all session-related domain models, the persistence
//! layer over the key-value seam, and the controller that drives the active
//! conversation.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `OpenOptions`)
//! - `message`: Conversation message types (`Message`, `Sender`, `MessageKind`)
//! - `store`: Typed persistence with per-project retention (`SessionStore`)
//! - `controller`: Session lifecycle and dispatch (`SessionController`)
//! - `event`: Broadcast events (`SessionEvent`)

mod controller;
mod event;
mod message;
mod model;
mod store;

pub use controller::{SessionController, APOLOGY};
pub use event::SessionEvent;
pub use message::{Message, MessageKind, Sender};
pub use model::{OpenOptions, Session};
pub use store::SessionStore;
