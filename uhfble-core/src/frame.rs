//! Reader protocol frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;
use uhfble_types::PowerLevel;

use crate::{
    checksum,
    command::Command,
    constants::{offsets, DEFAULT_ADDRESS, FRAME_HEADER},
    error::{Error, Result},
};

/// Reader protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌────────┬────────┬─────────┬─────────┬─────────────┬──────────┐
/// │ Header │ Length │ Address │ Command │   Payload   │ Checksum │
/// │  0xA0  │ 1 byte │  0x01   │ 1 byte  │   N bytes   │  1 byte  │
/// └────────┴────────┴─────────┴─────────┴─────────────┴──────────┘
/// ```
///
/// The checksum is the 8-bit sum of every byte before it. Outbound frames
/// carry `length = 4 + N`; inbound frames are not held to that rule, but
/// their payload must still fit [`Frame::MAX_PAYLOAD_SIZE`].
///
/// # Examples
///
/// ```
/// use uhfble_core::{Frame, Command};
///
/// let frame = Frame::start_inventory();
/// assert_eq!(&frame.encode()[..], &[0xA0, 0x04, 0x01, 0x27, 0xCC]);
///
/// let decoded = Frame::decode(&frame.encode()).unwrap();
/// assert_eq!(decoded.command, Command::StartInventory);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Reader address
    pub address: u8,

    /// Command code
    pub command: Command,

    payload: Bytes,
}

impl Frame {
    /// Smallest valid frame: header, length, address, command, checksum
    pub const MIN_SIZE: usize = 5;

    /// Value of the length field for an empty payload
    pub const LENGTH_OVERHEAD: usize = 4;

    /// Maximum payload size
    pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize - Self::LENGTH_OVERHEAD;

    /// Create a frame with empty payload
    pub fn new(command: Command) -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] when the payload does not fit the
    /// length field.
    ///
    /// # Examples
    ///
    /// ```
    /// use uhfble_core::{Frame, Command};
    ///
    /// let frame = Frame::with_payload(Command::SetPower, vec![20]).unwrap();
    /// assert_eq!(frame.payload(), &[20]);
    /// ```
    pub fn with_payload(command: Command, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();

        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            address: DEFAULT_ADDRESS,
            command,
            payload,
        })
    }

    /// Start inventory command
    pub fn start_inventory() -> Self {
        Self::new(Command::StartInventory)
    }

    /// Stop inventory command
    pub fn stop_inventory() -> Self {
        Self::new(Command::StopInventory)
    }

    /// Output power query
    pub fn get_power() -> Self {
        Self::new(Command::GetPower)
    }

    /// Set output power command
    pub fn set_power(level: PowerLevel) -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            command: Command::SetPower,
            payload: Bytes::copy_from_slice(&[level.value()]),
        }
    }

    /// Command-specific payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value written to the length field
    pub fn length(&self) -> u8 {
        // payload never exceeds MAX_PAYLOAD_SIZE
        (Self::LENGTH_OVERHEAD + self.payload.len()) as u8
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u8 {
        let head = [
            FRAME_HEADER,
            self.length(),
            self.address,
            self.command.into(),
        ];

        checksum::calculate(&head).wrapping_add(checksum::calculate(&self.payload))
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(FRAME_HEADER);
        buf.put_u8(self.length());
        buf.put_u8(self.address);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);
        buf.put_u8(self.checksum());

        buf
    }

    /// Decode frame from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is too short (< 5 bytes)
    /// - First byte is not `0xA0`
    /// - Checksum verification fails
    /// - Payload exceeds [`Frame::MAX_PAYLOAD_SIZE`]
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(Error::FrameTooShort {
                expected: Self::MIN_SIZE,
                actual: data.len(),
            });
        }

        let header = data[offsets::HEADER];
        if header != FRAME_HEADER {
            return Err(Error::InvalidHeader(header));
        }

        let (body, trailer) = data.split_at(data.len() - 1);
        let checksum_calculated = checksum::calculate(body);
        let checksum_received = trailer[0];
        if checksum_calculated != checksum_received {
            return Err(Error::ChecksumMismatch {
                expected: checksum_calculated,
                received: checksum_received,
            });
        }

        let payload = &body[offsets::PAYLOAD..];
        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        let length = data[offsets::LENGTH];
        let address = data[offsets::ADDRESS];
        let command = Command::from(data[offsets::COMMAND]);

        trace!(
            command = %command,
            length = length,
            payload_len = payload.len(),
            "Decoded frame"
        );

        Ok(Self {
            address,
            command,
            payload: Bytes::copy_from_slice(payload),
        })
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        Self::MIN_SIZE + self.payload.len()
    }
}

/// Encode a command and its payload into a wire frame
///
/// # Examples
///
/// ```
/// use uhfble_core::{frame, Command};
///
/// let bytes = frame::encode(Command::GetPower, &[]).unwrap();
/// assert_eq!(&bytes[..], &[0xA0, 0x04, 0x01, 0xB7, 0x5C]);
/// ```
pub fn encode(command: Command, payload: &[u8]) -> Result<BytesMut> {
    Ok(Frame::with_payload(command, Bytes::copy_from_slice(payload))?.encode())
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &format!("0x{:02X}", self.address))
            .field("command", &self.command)
            .field("length", &self.length())
            .field("payload", &format!("{:02X?}", &self.payload[..]))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](addr=0x{:02X}, len={})",
            self.command,
            self.address,
            self.payload.len()
        )
    }
}
