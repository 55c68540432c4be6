//! Transport trait abstraction for pluggable byte sources

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::TransportError;

/// A transport stream the reader pulls raw bytes from
pub trait TransportStream: AsyncRead + Send + Unpin + 'static {}

impl<T> TransportStream for T where T: AsyncRead + Send + Unpin + 'static {}

/// Factory for creating transport connections
#[async_trait]
pub trait TransportConnector: Send + Sync + 'static {
    /// The stream type this connector produces
    type Stream: TransportStream;

    /// Attempt to connect, returning a stream on success
    async fn connect(&self) -> Result<Self::Stream, TransportError>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
