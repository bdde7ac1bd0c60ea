//! Protocol constants

/// Frame start sentinel
pub const FRAME_HEADER: u8 = 0xA0;

/// Reader address used in every frame
pub const DEFAULT_ADDRESS: u8 = 0x01;

/// GATT service exposing the reader's serial channel
pub const SERVICE_UUID: &str = "0000fff0-0000-1000-8000-00805f9b34fb";

/// Characteristic used for both writes and notifications
pub const CHARACTERISTIC_UUID: &str = "0000fff1-0000-1000-8000-00805f9b34fb";

/// Advertised name prefixes of supported readers
pub const NAME_PREFIXES: [&str; 2] = ["R6", "Chainway"];

/// Wire offsets
pub mod offsets {
    /// Header byte
    pub const HEADER: usize = 0;
    
    /// Length byte
    pub const LENGTH: usize = 1;
    
    /// Reader address
    pub const ADDRESS: usize = 2;
    
    /// Command code
    pub const COMMAND: usize = 3;
    
    /// First payload byte
    pub const PAYLOAD: usize = 4;
    
    /// RSSI byte of an inventory report
    pub const TAG_RSSI: usize = 5;
}
