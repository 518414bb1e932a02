//! Announcement payloads shared across the session crates, plus a minimal
//! in-process dispatcher. Gameplay code publishes; the host (UI/AI) drains.
//!
//! This crate contains pure data with no simulation logic.

pub mod bus;
pub mod events;

pub use bus::{Envelope, EventBus};
pub use events::{EntityRef, GameEvent};
