//! TLV codec for the device command stream
//!
//! Frames are laid out as:
//! ```text
//! [ 1 byte: type ][ 2 bytes: length (u16, big-endian) ][ length bytes: payload ]
//! ```
//!
//! `SwitchOn` and `SwitchOff` are single-byte frames with no length or
//! payload. Payload bytes are stored on the wire in reverse field order.
//! Bytes that are not a known type tag are skipped one at a time.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::command::{Command, CommandType, UnknownCommandType};
use crate::protocol::HEADER_LEN;

/// Outcome of trying to cut a header + payload frame from the front of a buffer
#[derive(Debug, PartialEq, Eq)]
enum Extraction {
    /// A complete frame; `consumed` includes the header
    Frame { payload: Vec<u8>, consumed: usize },
    /// Not enough bytes for the header and declared payload yet
    Incomplete,
}

/// Total frame length declared by the header at the front of `buf`
fn declared_frame_len(buf: &[u8]) -> Option<usize> {
    match buf {
        [_, hi, lo, ..] => Some(HEADER_LEN + usize::from(u16::from_be_bytes([*hi, *lo]))),
        _ => None,
    }
}

/// Cut a frame whose type tag is `buf[0]`, reversing the payload bytes
fn extract_payload(buf: &[u8]) -> Extraction {
    match declared_frame_len(buf).and_then(|len| buf.get(HEADER_LEN..len)) {
        Some(wire) => {
            let mut payload = wire.to_vec();
            payload.reverse();
            Extraction::Frame {
                consumed: HEADER_LEN + payload.len(),
                payload,
            }
        }
        None => Extraction::Incomplete,
    }
}

/// Decoder state machine for streaming decoding
///
/// Holds the unconsumed tail of the previous chunk (the carry) and prepends
/// it to the next one, so frames split across reads at any byte boundary
/// decode the same as when delivered whole.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Incomplete trailing frame from the previous chunk
    carry: BytesMut,
    /// Largest frame that may be carried; `None` means unbounded
    max_carry: Option<usize>,
}

impl FrameDecoder {
    /// Create a decoder with an unbounded carry buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that refuses to carry frames longer than `max_carry` bytes.
    ///
    /// A frame whose declared length exceeds the cap has its type byte
    /// skipped as noise and scanning resumes at the next byte.
    pub fn with_max_carry(max_carry: usize) -> Self {
        Self {
            carry: BytesMut::new(),
            max_carry: Some(max_carry),
        }
    }

    /// Decode a chunk and collect the resulting commands
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<Command> {
        let mut commands = Vec::new();
        self.decode_into(chunk, |command| commands.push(command));
        commands
    }

    /// Decode a chunk, handing each command to `emit` in wire order
    pub fn decode_into<F>(&mut self, chunk: &[u8], mut emit: F)
    where
        F: FnMut(Command),
    {
        let mut data = std::mem::take(&mut self.carry);
        data.extend_from_slice(chunk);

        let mut pos = 0;
        while let Some(&tag) = data.get(pos) {
            let cmd_type = match CommandType::try_from(tag) {
                Ok(cmd_type) => cmd_type,
                Err(UnknownCommandType(byte)) => {
                    trace!("Skipping stray byte {:#04x}", byte);
                    pos += 1;
                    continue;
                }
            };

            match cmd_type {
                CommandType::SwitchOn => {
                    emit(Command::SwitchOn);
                    pos += 1;
                }
                CommandType::SwitchOff => {
                    emit(Command::SwitchOff);
                    pos += 1;
                }
                CommandType::SetColor | CommandType::SetBrightness => {
                    if let Some(len) = self.oversized_frame_len(&data[pos..]) {
                        warn!(
                            "{:?} frame of {} bytes exceeds carry limit, resyncing",
                            cmd_type, len
                        );
                        pos += 1;
                        continue;
                    }

                    match extract_payload(&data[pos..]) {
                        Extraction::Frame { payload, consumed } => {
                            match Command::from_payload(cmd_type, &payload) {
                                Some(command) => emit(command),
                                None => debug!(
                                    "Dropping {:?} frame with {}-byte payload",
                                    cmd_type,
                                    payload.len()
                                ),
                            }
                            pos += consumed;
                        }
                        Extraction::Incomplete => {
                            self.carry = data.split_off(pos);
                            trace!("Deferring {} bytes to next chunk", self.carry.len());
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Declared length of the frame at the front of `buf`, if it exceeds the cap.
    ///
    /// Checked as soon as the header is complete, whether or not the payload
    /// has arrived, so the outcome is the same however the stream is chunked.
    fn oversized_frame_len(&self, buf: &[u8]) -> Option<usize> {
        let max = self.max_carry?;
        declared_frame_len(buf).filter(|len| *len > max)
    }

    /// Get the current carry length (for debugging)
    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }
}

/// Encode a command directly into a provided buffer
pub fn encode_into(command: &Command, buf: &mut BytesMut) {
    let cmd_type = command.command_type();
    buf.put_u8(cmd_type.into());

    if cmd_type.has_payload() {
        let mut payload = command.payload();
        payload.reverse();

        // Payloads are at most three bytes
        buf.put_u16(payload.len() as u16);
        buf.put_slice(&payload);
    }
}

/// Encode a command into its wire bytes
pub fn encode(command: &Command) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + command.command_type().payload_len());
    encode_into(command, &mut buf);
    buf.freeze()
}

/// Encoder for building frames
#[derive(Debug, Default)]
pub struct FrameEncoder {
    /// Output buffer
    buffer: BytesMut,
}

impl FrameEncoder {
    /// Create a new frame encoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(64),
        }
    }

    /// Encode a command and add it to the output buffer
    pub fn encode(&mut self, command: &Command) {
        encode_into(command, &mut self.buffer);
    }

    /// Append raw bytes that are not a frame
    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    /// Take the encoded bytes, leaving an empty buffer
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Check if the encoder has any pending data
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
