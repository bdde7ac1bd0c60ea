//! GATT-level values exchanged with a transport

use bytes::Bytes;
use tokio::sync::mpsc;

use uhfble_core::constants::NAME_PREFIXES;

/// Advertisement filter used during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    /// Accepted device name prefixes
    pub name_prefixes: Vec<String>,
}

impl ScanFilter {
    /// Create a filter accepting the given prefixes
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
    
    /// Check an advertised name against the filter
    pub fn matches(&self, name: &str) -> bool {
        self.name_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::new(NAME_PREFIXES)
    }
}

/// A discovered reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peripheral {
    /// Platform identifier (address or UUID)
    pub id: String,
    
    /// Advertised local name
    pub name: String,
}

/// Event delivered by a transport after subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Raw notification payload, exactly as received
    Notification(Bytes),
    
    /// Link lost without a local disconnect request
    Disconnected,
}

/// In-order stream of transport events
pub type EventStream = mpsc::UnboundedReceiver<TransportEvent>;

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_filter() {
        let filter = ScanFilter::default();
        
        assert!(filter.matches("R6-0A1B"));
        assert!(filter.matches("Chainway R6"));
        assert!(!filter.matches("r6 lowercase"));
        assert!(!filter.matches("Headset"));
    }
    
    #[test]
    fn test_custom_filter() {
        let filter = ScanFilter::new(["UR4"]);
        
        assert!(filter.matches("UR4-01"));
        assert!(!filter.matches("R6-01"));
    }
}
