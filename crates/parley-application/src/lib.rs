//! Application layer for Parley.
//!
//! Hosts the [`SessionController`], the orchestration core a presentation
//! adapter drives. The adapter forwards user intents, renders from the
//! controller's snapshots, and re-renders when a subscribed
//! [`SessionEvent`](parley_core::event::SessionEvent) arrives.

pub mod session_controller;

pub use session_controller::{GREETING, SessionController};
