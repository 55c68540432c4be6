//! Concurrent decode pipeline
//!
//! This module handles:
//! - Reading raw chunks from a transport (reader task)
//! - Reassembling TLV frames into commands (decoder worker)
//! - Dispatching commands in wire order (dispatch worker)
//! - Drain-then-stop shutdown, cascading stage by stage

mod runner;
mod workers;

pub use runner::{Pipeline, PipelineConfig, PipelineError, PipelineStats, Stage};
