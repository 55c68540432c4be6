//! Byte-stream transports feeding the decode pipeline

mod error;
pub mod tcp;
pub mod traits;

pub use error::TransportError;
pub use tcp::TcpConnector;
pub use traits::{TransportConnector, TransportStream};
