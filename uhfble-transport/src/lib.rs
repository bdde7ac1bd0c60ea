//! Transport layer for the reader protocol
//!
//! The core only needs a handful of BLE central primitives: discovery by
//! name prefix, connect, characteristic lookup with notification
//! subscription, write, and a disconnect signal. [`Transport`] captures
//! exactly those, so a platform BLE stack plugs in behind it.

pub mod error;
pub mod gatt;
pub mod mock;

pub use error::{Error, Result};
pub use gatt::{EventStream, Peripheral, ScanFilter, TransportEvent};
pub use mock::{MockHandle, MockTransport};

use async_trait::async_trait;

/// Transport trait for BLE central backends
#[async_trait]
pub trait Transport: Send + Sync {
    /// Find the first advertising reader accepted by `filter`
    async fn discover(&mut self, filter: &ScanFilter) -> Result<Peripheral>;
    
    /// Connect to a discovered reader
    async fn connect(&mut self, peripheral: &Peripheral) -> Result<()>;
    
    /// Look up `characteristic` within `service` and enable notifications
    ///
    /// Subsequent writes go to this characteristic. The stream yields
    /// notifications in delivery order, then [`TransportEvent::Disconnected`]
    /// if the link drops.
    async fn subscribe(&mut self, service: &str, characteristic: &str) -> Result<EventStream>;
    
    /// Write raw bytes to the subscribed characteristic
    async fn write(&mut self, data: &[u8]) -> Result<()>;
    
    /// Disconnect from reader (no-op if already disconnected)
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Name of the connected reader
    fn peripheral_name(&self) -> Option<String>;
}
