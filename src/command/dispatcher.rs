//! Command dispatcher - applies decoded commands

use flashlight_shared::Command;
use tracing::info;

/// Consumer of decoded commands, run on the dispatch worker
pub trait Dispatcher: Send + 'static {
    /// Apply a single command
    fn dispatch(&mut self, command: Command);
}

/// Dispatcher that reports every command to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

impl Dispatcher for LoggingDispatcher {
    fn dispatch(&mut self, command: Command) {
        match command {
            Command::SwitchOn => info!("cmd: switch on"),
            Command::SwitchOff => info!("cmd: switch off"),
            Command::SetColor(rgb) => info!("cmd: set color={}", rgb),
            Command::SetBrightness { level } => info!("cmd: set brightness={}", level),
        }
    }
}
