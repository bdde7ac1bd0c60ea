//! Tag observation structures

use std::fmt;

use chrono::{DateTime, Utc};

/// One observed tag
///
/// Identity is the EPC: two readings describe the same tag when their
/// `epc` fields are equal, whatever their signal or timing.
#[derive(Debug, Clone)]
pub struct TagReading {
    /// Electronic Product Code, uppercase hex without separators
    pub epc: String,
    
    /// Raw RSSI byte as reported by the reader
    pub rssi: u8,
    
    /// Protocol Control word, 4 uppercase hex characters
    pub pc: String,
    
    /// Number of observations in the current scan session
    pub count: u32,
    
    /// Time of the last observation
    pub timestamp: DateTime<Utc>,
}

impl TagReading {
    /// Create a first observation (`count == 1`)
    pub fn new(
        epc: impl Into<String>,
        pc: impl Into<String>,
        rssi: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            epc: epc.into(),
            rssi,
            pc: pc.into(),
            count: 1,
            timestamp,
        }
    }
    
    /// RSSI byte reinterpreted as a signed value
    pub fn signal(&self) -> i8 {
        self.rssi as i8
    }
    
    /// EPC length in bytes
    pub fn epc_len(&self) -> usize {
        self.epc.len() / 2
    }
}

impl PartialEq for TagReading {
    fn eq(&self, other: &Self) -> bool {
        self.epc == other.epc
    }
}

impl Eq for TagReading {}

impl fmt::Display for TagReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tag[EPC: {}, PC: {}, RSSI: {}, seen: {}]",
            self.epc, self.pc, self.rssi, self.count
        )
    }
}
