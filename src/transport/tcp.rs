//! TCP transport implementation for device connections

use crate::transport::traits::TransportConnector;
use crate::transport::TransportError;
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info};

/// TCP connector for a device at `host:port`
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
}

impl TcpConnector {
    /// Create a new TCP connector
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the `host:port` endpoint string
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the host, preferring an IPv4 address
    async fn resolve(&self) -> Result<SocketAddr, TransportError> {
        let addrs: Vec<SocketAddr> = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|source| TransportError::Resolve {
                endpoint: self.endpoint(),
                source,
            })?
            .collect();

        debug!("[TCP] {} resolved to {:?}", self.endpoint(), addrs);

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| TransportError::NoAddress {
                endpoint: self.endpoint(),
            })
    }
}

#[async_trait]
impl TransportConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self) -> Result<Self::Stream, TransportError> {
        let addr = self.resolve().await?;
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::Connect {
                endpoint: self.endpoint(),
                source,
            })?;

        info!("[TCP] Connected to {} ({})", self.endpoint(), addr);
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "TCP"
    }
}
