//! Server configuration.

use anyhow::{ensure, Result};
use pipeline::DEFAULT_RECOMMENDATION_LIMIT;
use std::net::SocketAddr;

/// Default listen address (all interfaces, port 9001)
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9001";

/// Default cap on the size of one request line
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Recommendations returned per query
    pub recommendation_limit: usize,
    /// Longest request line accepted before the connection is dropped
    pub max_request_bytes: usize,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Self::default()
        }
    }

    pub fn with_recommendation_limit(mut self, limit: usize) -> Self {
        self.recommendation_limit = limit;
        self
    }

    pub fn with_max_request_bytes(mut self, max: usize) -> Self {
        self.max_request_bytes = max;
        self
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.recommendation_limit >= 1, "recommendation limit must be at least 1");
        ensure!(self.max_request_bytes >= 16, "max request size must be at least 16 bytes");
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9001)),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}
