//! In-memory transport
//!
//! Stands in for a BLE stack in tests and demos. A [`MockHandle`] drives
//! the "reader" side: it injects notifications, drops the link and
//! inspects what the client wrote.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use uhfble_core::constants::{CHARACTERISTIC_UUID, SERVICE_UUID};

use crate::{error::*, EventStream, Peripheral, ScanFilter, Transport, TransportEvent};

#[derive(Debug, Default)]
struct MockState {
    /// Names advertised during discovery
    advertised: Vec<String>,

    /// Connected peripheral
    peripheral: Option<Peripheral>,

    /// Sender side of the subscribed event stream
    events: Option<mpsc::UnboundedSender<TransportEvent>>,

    /// Captured writes
    writes: Vec<Vec<u8>>,

    fail_connect: bool,
    fail_write: bool,
    connect_count: usize,
}

impl MockState {
    fn teardown(&mut self) {
        self.peripheral = None;
        self.events = None;
    }
}

/// Mock transport advertising a single R6 reader by default
#[derive(Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// Control side of a [`MockTransport`]
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Device name advertised by [`MockTransport::new`]
    pub const DEFAULT_NAME: &'static str = "R6-MOCK";

    /// Create a transport advertising [`MockTransport::DEFAULT_NAME`]
    pub fn new() -> Self {
        Self::with_devices([Self::DEFAULT_NAME])
    }

    /// Create a transport advertising the given names
    pub fn with_devices<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = MockState {
            advertised: names.into_iter().map(Into::into).collect(),
            ..MockState::default()
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Get a control handle
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHandle {
    /// Deliver a notification to the subscriber
    ///
    /// Returns `false` if nothing is subscribed.
    pub fn notify(&self, data: impl Into<Bytes>) -> bool {
        let state = self.state.lock();

        match &state.events {
            Some(tx) => tx.send(TransportEvent::Notification(data.into())).is_ok(),
            None => false,
        }
    }

    /// Simulate the reader going away (powered off, out of range)
    pub fn drop_link(&self) {
        let mut state = self.state.lock();

        if let Some(tx) = state.events.take() {
            let _ = tx.send(TransportEvent::Disconnected);
        }
        state.teardown();
    }

    /// Get all captured writes
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().writes.clone()
    }

    /// Clear captured writes
    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    /// Make the next connection attempts fail
    pub fn set_fail_connect(&self, fail: bool) {
        self.state.lock().fail_connect = fail;
    }

    /// Make writes fail
    pub fn set_fail_write(&self, fail: bool) {
        self.state.lock().fail_write = fail;
    }

    /// Check if a client is connected
    pub fn is_connected(&self) -> bool {
        self.state.lock().peripheral.is_some()
    }

    /// Check if a client holds a notification subscription
    pub fn is_subscribed(&self) -> bool {
        self.state.lock().events.is_some()
    }

    /// Number of successful connections so far
    pub fn connect_count(&self) -> usize {
        self.state.lock().connect_count
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn discover(&mut self, filter: &ScanFilter) -> Result<Peripheral> {
        let state = self.state.lock();

        let name = state
            .advertised
            .iter()
            .find(|name| filter.matches(name))
            .ok_or_else(|| Error::DeviceNotFound {
                prefixes: filter.name_prefixes.clone(),
            })?;

        debug!("Discovered {}", name);

        Ok(Peripheral {
            id: format!("mock:{}", name),
            name: name.clone(),
        })
    }

    async fn connect(&mut self, peripheral: &Peripheral) -> Result<()> {
        let mut state = self.state.lock();

        if state.peripheral.is_some() {
            return Err(Error::AlreadyConnected);
        }

        if state.fail_connect {
            return Err(Error::ConnectFailed(format!("{} refused connection", peripheral.name)));
        }

        state.peripheral = Some(peripheral.clone());
        state.connect_count += 1;

        debug!("Connected to {}", peripheral.name);
        Ok(())
    }

    async fn subscribe(&mut self, service: &str, characteristic: &str) -> Result<EventStream> {
        let mut state = self.state.lock();

        if state.peripheral.is_none() {
            return Err(Error::NotConnected);
        }
        if !service.eq_ignore_ascii_case(SERVICE_UUID) {
            return Err(Error::ServiceNotFound(service.to_string()));
        }
        if !characteristic.eq_ignore_ascii_case(CHARACTERISTIC_UUID) {
            return Err(Error::CharacteristicNotFound(characteristic.to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.events = Some(tx);

        Ok(rx)
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();

        if state.peripheral.is_none() {
            return Err(Error::NotConnected);
        }
        if state.fail_write {
            return Err(Error::WriteFailed("GATT write rejected".into()));
        }

        trace!("Writing {} bytes: {:02X?}", data.len(), data);

        state.writes.push(data.to_vec());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state.lock();

        if let Some(peripheral) = &state.peripheral {
            debug!("Disconnecting from {}...", peripheral.name);
        }
        state.teardown();

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().peripheral.is_some()
    }

    fn peripheral_name(&self) -> Option<String> {
        self.state.lock().peripheral.as_ref().map(|p| p.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected() -> (MockTransport, MockHandle, EventStream) {
        let mut transport = MockTransport::new();
        let handle = transport.handle();

        let peripheral = transport.discover(&ScanFilter::default()).await.unwrap();
        transport.connect(&peripheral).await.unwrap();
        let events = transport.subscribe(SERVICE_UUID, CHARACTERISTIC_UUID).await.unwrap();

        (transport, handle, events)
    }

    #[tokio::test]
    async fn test_discover_by_prefix() {
        let mut transport = MockTransport::with_devices(["Headset", "Chainway-C72"]);

        let peripheral = transport.discover(&ScanFilter::default()).await.unwrap();
        assert_eq!(peripheral.name, "Chainway-C72");
    }

    #[tokio::test]
    async fn test_discover_nothing() {
        let mut transport = MockTransport::with_devices(["Headset"]);

        let result = transport.discover(&ScanFilter::default()).await;
        assert!(matches!(result, Err(Error::DeviceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let mut transport = MockTransport::new();
        transport.handle().set_fail_connect(true);

        let peripheral = transport.discover(&ScanFilter::default()).await.unwrap();
        assert!(transport.connect(&peripheral).await.is_err());
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_subscribe_unknown_characteristic() {
        let mut transport = MockTransport::new();
        let peripheral = transport.discover(&ScanFilter::default()).await.unwrap();
        transport.connect(&peripheral).await.unwrap();

        let result = transport.subscribe(SERVICE_UUID, "0000fff2-0000-1000-8000-00805f9b34fb").await;
        assert!(matches!(result, Err(Error::CharacteristicNotFound(_))));
        assert!(!transport.handle().is_subscribed());
    }

    #[tokio::test]
    async fn test_notifications_in_order() {
        let (_transport, handle, mut events) = connected().await;

        assert!(handle.notify(vec![1u8]));
        assert!(handle.notify(vec![2u8]));

        assert_eq!(events.recv().await, Some(TransportEvent::Notification(Bytes::from_static(&[1]))));
        assert_eq!(events.recv().await, Some(TransportEvent::Notification(Bytes::from_static(&[2]))));
    }

    #[tokio::test]
    async fn test_write_capture() {
        let (mut transport, handle, _events) = connected().await;

        transport.write(&[0xA0, 0x04]).await.unwrap();

        assert_eq!(handle.writes(), vec![vec![0xA0, 0x04]]);
    }

    #[tokio::test]
    async fn test_write_failure() {
        let (mut transport, handle, _events) = connected().await;
        handle.set_fail_write(true);

        assert!(matches!(transport.write(&[0xA0]).await, Err(Error::WriteFailed(_))));
        assert!(handle.writes().is_empty());
    }

    #[tokio::test]
    async fn test_drop_link() {
        let (mut transport, handle, mut events) = connected().await;
        assert!(handle.is_subscribed());

        handle.drop_link();

        assert!(!handle.is_subscribed());
        assert_eq!(events.recv().await, Some(TransportEvent::Disconnected));
        assert_eq!(events.recv().await, None);
        assert!(!transport.is_connected());
        assert!(transport.write(&[0xA0]).await.is_err());
    }

    #[tokio::test]
    async fn test_disconnect_closes_stream() {
        let (mut transport, handle, mut events) = connected().await;

        transport.disconnect().await.unwrap();
        transport.disconnect().await.unwrap();

        assert_eq!(events.recv().await, None);
        assert!(!handle.is_connected());
        assert!(!handle.is_subscribed());
        assert!(!handle.notify(vec![1u8]));
    }
}
