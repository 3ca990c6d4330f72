//! Core infrastructure for runner-sync.
//!
//! This crate provides shared functionality used by every runner-sync primitive:
//! - Event system for observability
//! - A unified error type for callers that compose several primitives

pub mod error;
pub mod events;

pub use error::SyncError;
pub use events::{EventListener, EventListeners, FnListener, SyncEvent};
