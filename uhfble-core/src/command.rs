//! Reader command codes

use std::fmt;

/// Protocol command codes
///
/// Codes this client sends, plus the inventory report the reader pushes
/// while a continuous inventory runs. Any other code decodes as
/// [`Command::Other`] so unknown frames can still be checksum-validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Tag report pushed during continuous inventory
    InventoryReport,
    
    /// Start inventory (echoed with a tag on single-shot reads)
    StartInventory,
    
    /// Stop inventory
    StopInventory,
    
    /// Set output power
    SetPower,
    
    /// Query output power
    GetPower,
    
    /// Any other code
    Other(u8),
}

impl Command {
    /// Check if frames with this code carry a tag payload
    pub fn is_inventory_report(self) -> bool {
        matches!(self, Self::InventoryReport | Self::StartInventory)
    }
    
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::InventoryReport => "CMD_INVENTORY_REPORT",
            Self::StartInventory => "CMD_START_INVENTORY",
            Self::StopInventory => "CMD_STOP_INVENTORY",
            Self::SetPower => "CMD_SET_POWER",
            Self::GetPower => "CMD_GET_POWER",
            Self::Other(_) => "CMD_UNKNOWN",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        match cmd {
            Command::InventoryReport => 0x22,
            Command::StartInventory => 0x27,
            Command::StopInventory => 0x28,
            Command::SetPower => 0xB6,
            Command::GetPower => 0xB7,
            Command::Other(code) => code,
        }
    }
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        match value {
            0x22 => Self::InventoryReport,
            0x27 => Self::StartInventory,
            0x28 => Self::StopInventory,
            0xB6 => Self::SetPower,
            0xB7 => Self::GetPower,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_command_conversion() {
        assert_eq!(u8::from(Command::StartInventory), 0x27);
        assert_eq!(u8::from(Command::StopInventory), 0x28);
        assert_eq!(u8::from(Command::SetPower), 0xB6);
        assert_eq!(u8::from(Command::GetPower), 0xB7);
        assert_eq!(Command::from(0x22), Command::InventoryReport);
    }
    
    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::from(0x89), Command::Other(0x89));
        assert_eq!(u8::from(Command::Other(0x89)), 0x89);
    }
    
    #[test]
    fn test_inventory_codes() {
        assert!(Command::InventoryReport.is_inventory_report());
        assert!(Command::StartInventory.is_inventory_report());
        assert!(!Command::GetPower.is_inventory_report());
        assert!(!Command::Other(0x22 ^ 0xFF).is_inventory_report());
    }
    
    #[test]
    fn test_display() {
        assert_eq!(Command::GetPower.to_string(), "CMD_GET_POWER(0xB7)");
    }
}
