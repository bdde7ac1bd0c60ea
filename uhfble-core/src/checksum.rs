//! Frame checksum
//!
//! The trailing byte of every frame is the sum of all preceding bytes,
//! header included, truncated to 8 bits.

use tracing::trace;

/// Calculate frame checksum over `bytes`
///
/// # Examples
///
/// ```
/// use uhfble_core::checksum;
///
/// // start inventory frame without its checksum
/// assert_eq!(checksum::calculate(&[0xA0, 0x04, 0x01, 0x27]), 0xCC);
/// ```
pub fn calculate(bytes: &[u8]) -> u8 {
    let checksum = bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b));
    
    trace!(
        len = bytes.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );
    
    checksum
}

/// Verify checksum
pub fn verify(bytes: &[u8], expected: u8) -> bool {
    calculate(bytes) == expected
}
