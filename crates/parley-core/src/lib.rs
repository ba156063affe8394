//! Core domain for the Parley orchestration layer.
//!
//! This crate holds the presentation-free building blocks: the conversation
//! transcript with its single-send state machine, the document registry
//! mirroring server state, the [`gateway::BackendGateway`] trait the
//! transport layer implements, the session events adapters subscribe to,
//! and the shared error taxonomy. It performs no I/O.

pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod event;
pub mod gateway;

// Re-export common error type
pub use error::ParleyError;
