//! Infrastructure layer for Parley.
//!
//! Concrete implementations of the core's outward-facing seams: the HTTP
//! backend gateway and the on-disk configuration service.

pub mod config_service;
pub mod http_gateway;

pub use config_service::ConfigService;
pub use http_gateway::HttpBackendGateway;
