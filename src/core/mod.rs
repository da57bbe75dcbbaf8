//! Core access-control components

pub mod access;
pub mod session;

pub use access::{AccessGate, ResourceClass};
pub use session::{create_session_store, Session, SessionStore, SharedSessionStore};
