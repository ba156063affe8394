//! Document domain module.
//!
//! Contains the document model and the registry mirroring the server-known
//! document set.

mod model;
mod registry;

// Re-export public API
pub use model::Document;
pub use registry::DocumentRegistry;
