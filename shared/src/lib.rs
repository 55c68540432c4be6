//! Flashlight Shared Protocol Types
//!
//! This crate provides the command model, the TLV codec and the blocking
//! queue shared by the flashlight client and the device simulator.

pub mod codec;
pub mod command;
pub mod queue;

// Re-export commonly used types at crate root
pub use codec::{FrameDecoder, FrameEncoder};
pub use command::{Command, CommandType, Rgb, UnknownCommandType};
pub use queue::BlockingQueue;

/// Wire protocol parameters
pub mod protocol {
    /// Size of the type tag in bytes
    pub const TYPE_LEN: usize = 1;

    /// Size of the big-endian length field in bytes
    pub const LENGTH_LEN: usize = 2;

    /// Full header size for frames that carry a payload
    pub const HEADER_LEN: usize = TYPE_LEN + LENGTH_LEN;

    /// Default host the client connects to
    pub const DEFAULT_HOST: &str = "localhost";

    /// Default device port
    pub const DEFAULT_PORT: u16 = 9999;

    /// Default number of bytes read from the transport per chunk
    pub const DEFAULT_READ_WINDOW: usize = 4;
}

