//! Command dispatch for the flashlight client
//!
//! This module handles:
//! - Receiving decoded commands from the pipeline
//! - Applying each command's side effect

mod dispatcher;

pub use dispatcher::{Dispatcher, LoggingDispatcher};
