//! Device command model
//!
//! Commands are a closed set. Payload-free commands occupy a single byte on
//! the wire; the others carry a small fixed-size payload behind a TLV header.

use std::fmt;
use thiserror::Error;

/// Wire type tag of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    SwitchOn = 0x12,
    SwitchOff = 0x13,
    SetColor = 0x20,
    SetBrightness = 0x21,
}

/// Returned when a byte is not a known type tag
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown command type: {0:#04x}")]
pub struct UnknownCommandType(pub u8);

impl TryFrom<u8> for CommandType {
    type Error = UnknownCommandType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0x12 => Ok(CommandType::SwitchOn),
            0x13 => Ok(CommandType::SwitchOff),
            0x20 => Ok(CommandType::SetColor),
            0x21 => Ok(CommandType::SetBrightness),
            other => Err(UnknownCommandType(other)),
        }
    }
}

impl From<CommandType> for u8 {
    fn from(cmd_type: CommandType) -> Self {
        cmd_type as u8
    }
}

impl CommandType {
    /// Whether frames of this type carry a length header and payload
    pub fn has_payload(self) -> bool {
        matches!(self, CommandType::SetColor | CommandType::SetBrightness)
    }

    /// Number of payload bytes the command's fields occupy
    pub fn payload_len(self) -> usize {
        match self {
            CommandType::SwitchOn | CommandType::SwitchOff => 0,
            CommandType::SetColor => 3,
            CommandType::SetBrightness => 1,
        }
    }
}

/// RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

/// A decoded device command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    SwitchOn,
    SwitchOff,
    SetColor(Rgb),
    SetBrightness { level: u8 },
}

impl Command {
    /// Get the wire type of this command
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::SwitchOn => CommandType::SwitchOn,
            Command::SwitchOff => CommandType::SwitchOff,
            Command::SetColor(_) => CommandType::SetColor,
            Command::SetBrightness { .. } => CommandType::SetBrightness,
        }
    }

    /// Build a payload-carrying command from its (already reversed) payload.
    ///
    /// Fields are read from the start of the payload; trailing bytes are
    /// ignored. Returns `None` for payload-free types or a payload shorter
    /// than the command's fields.
    pub fn from_payload(cmd_type: CommandType, payload: &[u8]) -> Option<Self> {
        match (cmd_type, payload) {
            (CommandType::SetColor, [r, g, b, ..]) => Some(Command::SetColor(Rgb::new(*r, *g, *b))),
            (CommandType::SetBrightness, [level, ..]) => {
                Some(Command::SetBrightness { level: *level })
            }
            _ => None,
        }
    }

    /// Payload bytes in field order (before the wire reversal is applied)
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Command::SwitchOn | Command::SwitchOff => Vec::new(),
            Command::SetColor(rgb) => vec![rgb.r, rgb.g, rgb.b],
            Command::SetBrightness { level } => vec![*level],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SwitchOn => write!(f, "switch on"),
            Command::SwitchOff => write!(f, "switch off"),
            Command::SetColor(rgb) => write!(f, "set color={}", rgb),
            Command::SetBrightness { level } => write!(f, "set brightness={}", level),
        }
    }
}
