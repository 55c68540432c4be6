//! The command sequence played to every client

use bytes::Bytes;
use flashlight_shared::{Command, FrameEncoder, Rgb};

/// Stray byte sent between frames; not a known type tag
pub const NOISE_BYTE: u8 = 0x22;

/// One write of the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A single encoded command
    Frame(Command),
    /// Bytes that are not a frame
    Noise(Vec<u8>),
    /// Pause before the remaining steps
    Pause,
}

impl Step {
    /// Wire bytes for this step (empty for a pause)
    pub fn to_bytes(&self, encoder: &mut FrameEncoder) -> Bytes {
        match self {
            Step::Frame(command) => encoder.encode(command),
            Step::Noise(bytes) => encoder.put_raw(bytes),
            Step::Pause => {}
        }
        encoder.take()
    }
}

/// The demo sequence: on, off, on, two colors, off, noise, pause, brightness
pub fn demo_script() -> Vec<Step> {
    vec![
        Step::Frame(Command::SwitchOn),
        Step::Frame(Command::SwitchOff),
        Step::Frame(Command::SwitchOn),
        // Wire payload [0x01, 0x00, 0xff]
        Step::Frame(Command::SetColor(Rgb::new(0xff, 0x00, 0x01))),
        // Wire payload [0xff, 0x00, 0x02]
        Step::Frame(Command::SetColor(Rgb::new(0x02, 0x00, 0xff))),
        Step::Frame(Command::SwitchOff),
        Step::Noise(vec![NOISE_BYTE]),
        Step::Pause,
        Step::Frame(Command::SetBrightness { level: 0x81 }),
    ]
}
