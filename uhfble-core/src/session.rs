//! Session management for the reader protocol
//!
//! A session represents the single logical connection to a reader and
//! tracks:
//! - Connection status
//! - Active notification channel
//! - Inventory-running flag
//! - Last known output power and any pending power query
//!
//! Every path that ends a connection (explicit disconnect, link loss)
//! goes through [`Session::close`] or [`Session::close_generation`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use uhfble_types::{ConnectionStatus, PowerLevel, TagReading};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::tag;

/// Typed result of routing an inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A tag was reported
    Tag(TagReading),

    /// A pending power query was answered
    Power(PowerLevel),
}

/// Point-in-time copy of the session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: ConnectionStatus,
    pub inventory_running: bool,
    pub power_level: PowerLevel,
    pub pending_power_query: bool,
    pub channel: Option<String>,
    pub generation: u64,
}

/// Session manager
///
/// Thread-safe and can be cloned cheaply (Arc internally). The facade and
/// the notification pump hold clones of the same session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

#[derive(Debug)]
struct SessionInner {
    status: ConnectionStatus,

    /// Characteristic of the active notification channel
    channel: Option<String>,

    inventory_running: bool,

    /// Last configured or reported power level
    power_level: PowerLevel,

    pending_power_query: bool,

    /// Bumped on every established connection
    generation: u64,
}

impl SessionInner {
    fn reset(&mut self) {
        self.channel = None;
        self.inventory_running = false;
        self.pending_power_query = false;
    }
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self::with_power_level(PowerLevel::default())
    }

    /// Create a new disconnected session with an initial power level
    pub fn with_power_level(power_level: PowerLevel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                status: ConnectionStatus::Disconnected,
                channel: None,
                inventory_running: false,
                power_level,
                pending_power_query: false,
                generation: 0,
            })),
        }
    }

    /// Get current status
    pub fn status(&self) -> ConnectionStatus {
        self.inner.read().status
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.inner.read().status == ConnectionStatus::Connected
    }

    /// Check if an inventory is running
    pub fn is_inventory_running(&self) -> bool {
        self.inner.read().inventory_running
    }

    /// Last configured or reported power level
    pub fn power_level(&self) -> PowerLevel {
        self.inner.read().power_level
    }

    /// Check if a power query awaits its reply
    pub fn is_power_query_pending(&self) -> bool {
        self.inner.read().pending_power_query
    }

    /// Characteristic of the active channel
    pub fn channel(&self) -> Option<String> {
        self.inner.read().channel.clone()
    }

    /// Generation of the current (or last) connection
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Copy the whole state
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();

        SessionSnapshot {
            status: inner.status,
            inventory_running: inner.inventory_running,
            power_level: inner.power_level,
            pending_power_query: inner.pending_power_query,
            channel: inner.channel.clone(),
            generation: inner.generation,
        }
    }

    /// Enter `Connecting`
    ///
    /// Allowed from `Disconnected` and `Error` only.
    pub fn begin_connect(&self) -> Result<()> {
        let mut inner = self.inner.write();

        if !inner.status.can_connect() {
            return Err(Error::InvalidSessionState(format!(
                "Cannot connect from state: {}",
                inner.status
            )));
        }

        inner.reset();
        inner.status = ConnectionStatus::Connecting;
        Ok(())
    }

    /// Enter `Connected` with an active channel
    ///
    /// Returns the generation of the new connection.
    pub fn establish(&self, channel: impl Into<String>) -> Result<u64> {
        let mut inner = self.inner.write();

        if inner.status != ConnectionStatus::Connecting {
            return Err(Error::InvalidSessionState(format!(
                "Cannot establish from state: {}",
                inner.status
            )));
        }

        inner.channel = Some(channel.into());
        inner.generation = inner.generation.wrapping_add(1);
        inner.status = ConnectionStatus::Connected;

        debug!(generation = inner.generation, "Session established");

        Ok(inner.generation)
    }

    /// Enter `Error` after a failed connection attempt
    pub fn fail(&self) {
        let mut inner = self.inner.write();
        inner.reset();
        inner.status = ConnectionStatus::Error;
    }

    /// Close session
    ///
    /// Returns `false` if the session was already disconnected.
    pub fn close(&self) -> bool {
        let mut inner = self.inner.write();
        Self::close_locked(&mut inner)
    }

    /// Close session only if `generation` is still the current connection
    ///
    /// Used by tasks bound to one connection so they cannot tear down a
    /// newer one.
    pub fn close_generation(&self, generation: u64) -> bool {
        let mut inner = self.inner.write();

        if inner.generation != generation {
            trace!(
                current = inner.generation,
                stale = generation,
                "Ignoring close for stale connection"
            );
            return false;
        }

        Self::close_locked(&mut inner)
    }

    fn close_locked(inner: &mut SessionInner) -> bool {
        let changed = inner.status != ConnectionStatus::Disconnected;

        inner.reset();
        inner.status = ConnectionStatus::Disconnected;

        changed
    }

    /// Fail unless a channel is active
    pub fn ensure_connected(&self) -> Result<()> {
        let inner = self.inner.read();

        if inner.status != ConnectionStatus::Connected || inner.channel.is_none() {
            return Err(Error::SessionNotInitialized);
        }
        Ok(())
    }

    /// Record the inventory flag after a successful start/stop write
    pub fn set_inventory_running(&self, running: bool) {
        self.inner.write().inventory_running = running;
    }

    /// Record the power level after a successful set-power write
    pub fn set_power_level(&self, level: PowerLevel) {
        self.inner.write().power_level = level;
    }

    /// Record that a power query was written
    pub fn mark_power_query(&self) {
        self.inner.write().pending_power_query = true;
    }

    /// Route a decoded inbound frame
    ///
    /// Inventory reports become tags and answered power queries update the
    /// power level. Everything else, including frames arriving while not
    /// connected and reports that fail to parse, is dropped.
    pub fn dispatch(&self, frame: &Frame) -> Option<Inbound> {
        if !self.is_connected() {
            trace!(frame = %frame, "Dropping frame: not connected");
            return None;
        }

        match frame.command {
            command if command.is_inventory_report() => match tag::parse(frame) {
                Ok(reading) => Some(Inbound::Tag(reading)),
                Err(e) => {
                    trace!(error = %e, "Dropping inventory frame");
                    None
                }
            },
            Command::GetPower => self.complete_power_query(frame),
            _ => {
                trace!(frame = %frame, "Ignoring frame");
                None
            }
        }
    }

    /// Correlate a 0xB7 frame with the pending power query
    ///
    /// The reply layout is not documented by the vendor. The level is taken
    /// from the first payload byte; this has not been verified against
    /// hardware. Frames without a valid level leave the query pending.
    fn complete_power_query(&self, frame: &Frame) -> Option<Inbound> {
        let mut inner = self.inner.write();

        if !inner.pending_power_query {
            trace!("Ignoring unsolicited power reply");
            return None;
        }

        let level = frame
            .payload()
            .first()
            .and_then(|raw| PowerLevel::new(*raw).ok())?;

        inner.pending_power_query = false;
        inner.power_level = level;

        debug!(level = %level, "Power query answered");

        Some(Inbound::Power(level))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
