//! Connection status reported to subscribers

use std::fmt;

/// Lifecycle of the single reader connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// No link to a reader
    #[default]
    Disconnected,
    
    /// Discovery, GATT negotiation and subscription in progress
    Connecting,
    
    /// Notification channel active, commands accepted
    Connected,
    
    /// Last connection attempt failed
    Error,
}

impl ConnectionStatus {
    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
    
    /// A new connection attempt may start from this status
    pub fn can_connect(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
