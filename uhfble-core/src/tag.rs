//! Inventory report parsing
//!
//! An inventory report carries, starting at wire offset 5:
//!
//! ```text
//! ┌──────┬─────────┬──────────────────┐
//! │ RSSI │ PC word │       EPC        │
//! │ 1 B  │ 2 B BE  │ (PC >> 11) * 2 B │
//! └──────┴─────────┴──────────────────┘
//! ```
//!
//! The EPC length subfield sits in the top five bits of the PC word and
//! counts 16-bit words. Bytes after the EPC are ignored.

use bitflags::bitflags;
use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};
use tracing::trace;
use uhfble_types::TagReading;

use crate::{
    constants::offsets,
    error::{Error, Result},
    frame::Frame,
};

bitflags! {
    /// Flag bits of the PC word
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PcFlags: u16 {
        /// User memory indicator
        const UMI = 0x0400;
        /// Extended PC word present
        const XPC = 0x0200;
        /// Numbering system toggle (ISO AFI follows)
        const TOGGLE = 0x0100;
    }
}

/// Protocol Control word of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcWord(u16);

impl PcWord {
    /// Wrap a raw PC word
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Read a PC word as it appears on the wire
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(BigEndian::read_u16(&bytes))
    }

    /// Raw value
    pub fn raw(self) -> u16 {
        self.0
    }

    /// EPC length in 16-bit words
    pub fn epc_words(self) -> usize {
        usize::from((self.0 >> 11) & 0x1F)
    }

    /// EPC length in bytes
    pub fn epc_len(self) -> usize {
        self.epc_words() * 2
    }

    /// Flag bits
    pub fn flags(self) -> PcFlags {
        PcFlags::from_bits_truncate(self.0)
    }

    /// Uppercase hex rendering, 4 characters
    pub fn to_hex(self) -> String {
        format!("{:04X}", self.0)
    }
}

/// Parse an inventory report, stamping it with the current time
pub fn parse(frame: &Frame) -> Result<TagReading> {
    parse_at(frame, Utc::now())
}

/// Parse an inventory report with an explicit observation time
///
/// # Errors
///
/// - [`Error::NotInventoryFrame`] if the command does not carry a tag
/// - [`Error::TagTruncated`] if the payload ends before the RSSI, the PC
///   word or the announced EPC length (sizes counted in payload bytes)
///
/// # Examples
///
/// ```
/// use uhfble_core::{tag, Command, Frame};
///
/// // antenna, RSSI, PC = 0x1000 (2 words), EPC
/// let payload = vec![0x01, 0xC8, 0x10, 0x00, 0xE2, 0x00, 0x12, 0x34];
/// let frame = Frame::with_payload(Command::InventoryReport, payload).unwrap();
///
/// let reading = tag::parse(&frame).unwrap();
/// assert_eq!(reading.epc, "E2001234");
/// assert_eq!(reading.pc, "1000");
/// assert_eq!(reading.rssi, 0xC8);
/// ```
pub fn parse_at(frame: &Frame, timestamp: DateTime<Utc>) -> Result<TagReading> {
    if !frame.command.is_inventory_report() {
        return Err(Error::NotInventoryFrame(frame.command));
    }

    let payload = frame.payload();
    let rssi_at = offsets::TAG_RSSI - offsets::PAYLOAD;
    let epc_at = rssi_at + 3;

    if payload.len() < epc_at {
        return Err(Error::TagTruncated {
            needed: epc_at,
            available: payload.len(),
        });
    }

    let rssi = payload[rssi_at];
    let pc = PcWord::from_bytes([payload[rssi_at + 1], payload[rssi_at + 2]]);

    let epc_end = epc_at + pc.epc_len();
    let epc = payload.get(epc_at..epc_end).ok_or(Error::TagTruncated {
        needed: epc_end,
        available: payload.len(),
    })?;

    let reading = TagReading::new(hex::encode_upper(epc), pc.to_hex(), rssi, timestamp);

    trace!(epc = %reading.epc, pc = %reading.pc, rssi = rssi, "Parsed tag");

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn report(command: Command, rssi: u8, pc: [u8; 2], epc: &[u8]) -> Frame {
        let mut payload = vec![0x01, rssi, pc[0], pc[1]];
        payload.extend_from_slice(epc);
        Frame::with_payload(command, payload).unwrap()
    }

    #[test]
    fn test_parse_96_bit_epc() {
        let epc = [0xE2, 0x80, 0x11, 0x70, 0x00, 0x00, 0x02, 0x0A, 0xBC, 0xDE, 0xF0, 0x12];
        let frame = report(Command::InventoryReport, 0x4E, [0x30, 0x00], &epc);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();

        let reading = parse_at(&frame, at).unwrap();

        assert_eq!(reading.epc, "E28011700000020ABCDEF012");
        assert_eq!(reading.pc, "3000");
        assert_eq!(reading.rssi, 0x4E);
        assert_eq!(reading.count, 1);
        assert_eq!(reading.timestamp, at);
    }

    #[test]
    fn test_parse_single_shot_echo() {
        let frame = report(Command::StartInventory, 0x30, [0x08, 0x00], &[0xAB, 0xCD]);

        let reading = parse(&frame).unwrap();
        assert_eq!(reading.epc, "ABCD");
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        // EPC followed by a CRC-16
        let frame = report(Command::InventoryReport, 0x30, [0x08, 0x00], &[0xAB, 0xCD, 0x12, 0x34]);

        assert_eq!(parse(&frame).unwrap().epc, "ABCD");
    }

    #[test]
    fn test_zero_length_epc() {
        let frame = report(Command::InventoryReport, 0x30, [0x00, 0x00], &[]);

        let reading = parse(&frame).unwrap();
        assert_eq!(reading.epc, "");
        assert_eq!(reading.pc, "0000");
    }

    #[test]
    fn test_truncated_epc() {
        // PC announces 6 words, only 4 bytes present
        let frame = report(Command::InventoryReport, 0x30, [0x30, 0x00], &[1, 2, 3, 4]);

        assert!(matches!(
            parse(&frame),
            Err(Error::TagTruncated { needed: 16, available: 8 })
        ));
    }

    #[test]
    fn test_missing_pc_word() {
        let frame = Frame::with_payload(Command::InventoryReport, vec![0x01, 0x30]).unwrap();
        assert!(matches!(parse(&frame), Err(Error::TagTruncated { .. })));
    }

    #[test]
    fn test_empty_echo_frame() {
        assert!(parse(&Frame::start_inventory()).is_err());
    }

    #[test]
    fn test_not_inventory_frame() {
        let frame = report(Command::GetPower, 0x30, [0x08, 0x00], &[0xAB, 0xCD]);
        assert!(matches!(parse(&frame), Err(Error::NotInventoryFrame(Command::GetPower))));
    }

    #[test]
    fn test_pc_word_fields() {
        let pc = PcWord::from_bytes([0x34, 0x00]);

        assert_eq!(pc.raw(), 0x3400);
        assert_eq!(pc.epc_words(), 6);
        assert_eq!(pc.epc_len(), 12);
        assert_eq!(pc.flags(), PcFlags::UMI);
        assert_eq!(pc.to_hex(), "3400");
    }

    proptest! {
        #[test]
        fn prop_epc_length_from_pc(pc0 in any::<u8>(), pc1 in any::<u8>(), fill in any::<u8>()) {
            let len = usize::from((pc0 >> 3) & 0x1F) * 2;
            let epc = vec![fill; len];
            let frame = report(Command::InventoryReport, 0x40, [pc0, pc1], &epc);

            let reading = parse(&frame).unwrap();
            prop_assert_eq!(reading.epc.len(), 2 * len);
        }

        #[test]
        fn prop_short_epc_rejected(pc0 in 0x08u8.., missing in 1usize..=2) {
            let len = usize::from((pc0 >> 3) & 0x1F) * 2;
            let epc = vec![0xEE; len - missing];
            let frame = report(Command::InventoryReport, 0x40, [pc0, 0x00], &epc);

            let truncated = matches!(parse(&frame), Err(Error::TagTruncated { .. }));
            prop_assert!(truncated);
        }
    }
}
