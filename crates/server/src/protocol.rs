//! Wire protocol between the server and its clients.
//!
//! One query per connection. Each message is a single JSON object followed
//! by a newline:
//!
//! ```text
//! -> {"user_id":"u1"}
//! <- {"purchased_products":[{"product_id":"p1","rating":5.0,"category":"Books"}],
//!     "recommendations":[{"product_id":"p2","category":"Books"}]}
//! ```

use pipeline::Recommendation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sources::PurchasedProduct;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection closed before a message was received")]
    ConnectionClosed,

    #[error("Message exceeds {limit} bytes")]
    MessageTooLarge { limit: usize },
}

/// A query for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

/// The answer to a query: what the user bought and what to recommend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub purchased_products: Vec<PurchasedProduct>,
    pub recommendations: Vec<Recommendation>,
}

impl UserData {
    /// Response for users we know nothing about
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Read one newline-terminated JSON message.
///
/// A final message without a trailing newline is accepted at end of stream.
pub async fn read_message<R, T>(reader: &mut R, max_bytes: usize) -> Result<T, ProtocolError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = Vec::new();
    let read = (&mut *reader)
        .take(max_bytes as u64 + 1)
        .read_until(b'\n', &mut line)
        .await?;

    if read == 0 {
        return Err(ProtocolError::ConnectionClosed);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.len() > max_bytes {
        return Err(ProtocolError::MessageTooLarge { limit: max_bytes });
    }

    Ok(serde_json::from_slice(&line)?)
}

/// Write one message followed by a newline and flush it
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut bytes = serde_json::to_vec(message)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
