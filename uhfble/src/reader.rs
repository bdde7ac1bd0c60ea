//! High-level reader interface

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use uhfble_core::{Frame, Inbound, Session};
use uhfble_transport::{EventStream, MockTransport, ScanFilter, Transport, TransportEvent};
use uhfble_types::{ConnectionStatus, PowerLevel};

use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::events::{ChannelObserver, Observers, ReaderEvent, ReaderObserver, SubscriptionId};

/// Handheld UHF RFID reader
///
/// High-level interface over one BLE connection: commands go out through
/// the transport, notifications come back on a background task and are
/// turned into [`ReaderEvent`]s for subscribers.
///
/// # Examples
///
/// ```no_run
/// use uhfble::{MockTransport, Reader, ReaderEvent};
///
/// #[tokio::main]
/// async fn main() -> uhfble::Result<()> {
///     let mut reader = Reader::new(MockTransport::new());
///     let (_subscription, mut events) = reader.events();
///
///     reader.connect().await?;
///     reader.start_inventory().await?;
///
///     while let Some(event) = events.recv().await {
///         if let ReaderEvent::TagRead(tag) = event {
///             println!("{}", tag);
///             break;
///         }
///     }
///
///     reader.stop_inventory().await?;
///     reader.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Reader {
    transport: Box<dyn Transport>,
    session: Session,
    observers: Observers,
    config: ReaderConfig,
    pump: Option<JoinHandle<()>>,
}

impl Reader {
    /// Create a reader over a transport with default settings
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ReaderConfig::default())
    }

    /// Create a reader over a transport
    pub fn with_config(transport: impl Transport + 'static, config: ReaderConfig) -> Self {
        Self {
            transport: Box::new(transport),
            session: Session::with_power_level(config.power_level),
            observers: Observers::default(),
            config,
            pump: None,
        }
    }

    /// Create a reader over an in-memory transport
    pub fn mock() -> Self {
        Self::new(MockTransport::new())
    }

    /// Set the power level applied after connecting
    pub fn with_power_level(mut self, level: PowerLevel) -> Self {
        self.config.power_level = level;
        self.session.set_power_level(level);
        self
    }

    /// Set accepted device name prefixes
    pub fn with_scan_filter(mut self, filter: ScanFilter) -> Self {
        self.config.scan_filter = filter;
        self
    }

    /// Connection settings
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Current connection status
    pub fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Check if an inventory is running
    pub fn is_inventory_running(&self) -> bool {
        self.session.is_inventory_running()
    }

    /// Last configured or reported power level
    pub fn power_level(&self) -> PowerLevel {
        self.session.power_level()
    }

    /// Session state shared with the notification task
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Register an observer
    pub fn subscribe(&self, observer: Arc<dyn ReaderObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    /// Remove an observer
    ///
    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered observers
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Subscribe through a channel
    pub fn events(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (observer, rx) = ChannelObserver::channel();
        (self.subscribe(Arc::new(observer)), rx)
    }

    /// Connect to reader
    ///
    /// Discovers the first reader matching the scan filter, connects,
    /// subscribes to its notification characteristic, then applies the
    /// configured power level.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A connection is already active or in progress
    /// - No matching reader is advertising
    /// - Connection or GATT subscription fails (status becomes `Error`)
    pub async fn connect(&mut self) -> Result<()> {
        if !self.session.status().can_connect() {
            return Err(Error::AlreadyConnected);
        }

        if let Some(pump) = self.pump.take() {
            pump.abort();
        }

        // The session was released on link loss but the backend may still
        // hold the old link
        if self.transport.is_connected() {
            debug!("Tearing down stale link before reconnecting");
            if let Err(e) = self.transport.disconnect().await {
                warn!("Failed to tear down stale link: {}", e);
            }
        }

        self.session.begin_connect()?;
        self.observers.status_changed(ConnectionStatus::Connecting);

        let events = match self.open_channel().await {
            Ok(events) => events,
            Err(e) => {
                warn!("Connection failed: {}", e);

                if self.transport.is_connected() {
                    if let Err(teardown) = self.transport.disconnect().await {
                        warn!("Failed to tear down half-open link: {}", teardown);
                    }
                }

                self.session.fail();
                self.observers.status_changed(ConnectionStatus::Error);
                return Err(e);
            }
        };

        let generation = self.session.establish(self.config.characteristic_uuid.clone())?;
        self.observers.status_changed(ConnectionStatus::Connected);

        info!(
            "Connected to {} (generation={})",
            self.transport.peripheral_name().unwrap_or_default(),
            generation
        );

        self.pump = Some(tokio::spawn(pump(
            events,
            self.session.clone(),
            self.observers.clone(),
            generation,
        )));

        let level = self.session.power_level();
        if let Err(e) = self.write_power(level).await {
            warn!("Failed to apply power level {}: {}", level, e);
        }

        Ok(())
    }

    /// Disconnect from reader
    ///
    /// Safe to call in any state; a second call is a no-op.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }

        let result = if self.transport.is_connected() {
            info!("Disconnecting from {}...", self.transport.peripheral_name().unwrap_or_default());
            self.transport.disconnect().await
        } else {
            Ok(())
        };

        release(&self.session, &self.observers, None);

        result.map_err(Error::from)
    }

    /// Start continuous inventory
    pub async fn start_inventory(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Starting inventory...");

        self.send_frame(&Frame::start_inventory()).await?;
        self.session.set_inventory_running(true);

        Ok(())
    }

    /// Stop continuous inventory
    pub async fn stop_inventory(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Stopping inventory...");

        self.send_frame(&Frame::stop_inventory()).await?;
        self.session.set_inventory_running(false);

        Ok(())
    }

    /// Set output power (0..=30)
    ///
    /// Out-of-range values fail without touching the transport.
    pub async fn set_power(&mut self, level: u8) -> Result<()> {
        let level = PowerLevel::new(level)?;
        self.ensure_connected()?;

        self.write_power(level).await
    }

    /// Query output power
    ///
    /// The answer, if the reader sends one, arrives as
    /// [`ReaderEvent::PowerReported`]. The reply is read as a 0xB7 frame
    /// whose first payload byte is the level, a layout not yet confirmed on
    /// hardware.
    pub async fn get_power(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Querying power...");

        self.send_frame(&Frame::get_power()).await?;
        self.session.mark_power_query();

        Ok(())
    }

    // Helper methods

    async fn open_channel(&mut self) -> Result<EventStream> {
        let peripheral = self.transport.discover(&self.config.scan_filter).await?;

        info!("Connecting to {}...", peripheral.name);

        self.transport.connect(&peripheral).await?;

        let events = self
            .transport
            .subscribe(&self.config.service_uuid, &self.config.characteristic_uuid)
            .await?;

        Ok(events)
    }

    async fn write_power(&mut self, level: PowerLevel) -> Result<()> {
        debug!("Setting power to {}...", level);

        self.send_frame(&Frame::set_power(level)).await?;
        self.session.set_power_level(level);

        Ok(())
    }

    fn ensure_connected(&self) -> Result<()> {
        self.session.ensure_connected().map_err(|_| Error::NotConnected)
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        let data = frame.encode();
        self.transport.write(&data).await?;

        Ok(())
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        if self.session.is_connected() {
            warn!("Reader dropped while still connected");
        }
    }
}

/// Drain transport events for one connection
async fn pump(mut events: EventStream, session: Session, observers: Observers, generation: u64) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Notification(data) => handle_notification(&session, &observers, &data),
            TransportEvent::Disconnected => {
                warn!("Link lost (generation={})", generation);
                break;
            }
        }
    }

    release(&session, &observers, Some(generation));
}

fn handle_notification(session: &Session, observers: &Observers, data: &[u8]) {
    let frame = match Frame::decode(data) {
        Ok(frame) => frame,
        Err(e) => {
            trace!("Dropping notification {:02X?}: {}", data, e);
            return;
        }
    };

    trace!("Received: {:?}", frame);

    match session.dispatch(&frame) {
        Some(Inbound::Tag(tag)) => observers.tag_read(&tag),
        Some(Inbound::Power(level)) => observers.power_reported(level),
        None => {}
    }
}

/// Shared cleanup for explicit disconnect and link loss
///
/// `generation` scopes the cleanup to one connection; `None` closes
/// whatever is current.
fn release(session: &Session, observers: &Observers, generation: Option<u64>) {
    let closed = match generation {
        Some(generation) => session.close_generation(generation),
        None => session.close(),
    };

    if closed {
        info!("Disconnected");
        observers.status_changed(ConnectionStatus::Disconnected);
    }
}
