//! Client for querying a running recommendation server.

use std::net::SocketAddr;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::debug;

use crate::protocol::{read_message, write_message, ProtocolError, UserData, UserRequest};

/// Upper bound on one response line (a user's full purchase history)
const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct RecommendationClient {
    addr: SocketAddr,
}

impl RecommendationClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Fetch purchases and recommendations for one user.
    ///
    /// Opens a fresh connection per call, matching the server's one query
    /// per connection model.
    pub async fn fetch_user_data(&self, user_id: &str) -> Result<UserData, ProtocolError> {
        let stream = TcpStream::connect(self.addr).await?;
        let (reader, mut writer) = stream.into_split();

        let request = UserRequest {
            user_id: user_id.to_string(),
        };
        write_message(&mut writer, &request).await?;
        debug!("Sent request for user '{}' to {}", user_id, self.addr);

        let mut reader = BufReader::new(reader);
        read_message(&mut reader, MAX_RESPONSE_BYTES).await
    }
}
