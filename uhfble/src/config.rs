//! Reader connection settings

use uhfble_core::constants::{CHARACTERISTIC_UUID, SERVICE_UUID};
use uhfble_transport::ScanFilter;
use uhfble_types::PowerLevel;

/// Connection settings for a [`Reader`](crate::Reader)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Discovery filter on advertised names
    pub scan_filter: ScanFilter,
    
    /// GATT service holding the serial characteristic
    pub service_uuid: String,
    
    /// Characteristic used for writes and notifications
    pub characteristic_uuid: String,
    
    /// Power level applied right after connecting
    pub power_level: PowerLevel,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            scan_filter: ScanFilter::default(),
            service_uuid: SERVICE_UUID.to_string(),
            characteristic_uuid: CHARACTERISTIC_UUID.to_string(),
            power_level: PowerLevel::default(),
        }
    }
}
