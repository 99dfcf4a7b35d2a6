//! Server crate for the product recommendation service.
//!
//! This crate contains the orchestrator that answers one query against the
//! shared catalog, plus the TCP transport around it:
//!
//! - **orchestrator**: lookup, enrichment, preferences and ranking per query
//! - **protocol**: newline-delimited JSON messages
//! - **listener**: accept loop, one task per connection
//! - **client**: one-shot query client
//! - **config**: listen address and limits

pub mod client;
pub mod config;
pub mod listener;
pub mod orchestrator;
pub mod protocol;

pub use client::RecommendationClient;
pub use config::ServerConfig;
pub use listener::RecommendationServer;
pub use orchestrator::RecommendationOrchestrator;
pub use protocol::{ProtocolError, UserData, UserRequest};
