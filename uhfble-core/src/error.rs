//! Error types for uhfble-core

/// Result type alias for uhfble operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },
    
    /// First byte is not the frame sentinel
    #[error("Invalid frame header: 0x{0:02X}")]
    InvalidHeader(u8),
    
    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },
    
    /// Payload too large for the one-byte length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
    
    /// Frame does not carry an inventory report
    #[error("Not an inventory report: {0}")]
    NotInventoryFrame(crate::command::Command),
    
    /// Inventory report shorter than its PC word announces
    #[error("Tag payload truncated: need {needed} bytes, got {available} bytes")]
    TagTruncated {
        needed: usize,
        available: usize,
    },
    
    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
    
    /// Session not initialized
    #[error("Session not initialized - connect to reader first")]
    SessionNotInitialized,
}
