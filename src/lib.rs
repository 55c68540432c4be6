//! Flashlight client
//!
//! Connects to a device, decodes its TLV command stream and dispatches the
//! decoded commands, with reading, decoding and dispatching running as
//! separate concurrent stages.

pub mod cli;
pub mod command;
pub mod pipeline;
pub mod transport;

pub use command::{Dispatcher, LoggingDispatcher};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineStats};
