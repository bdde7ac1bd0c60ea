//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] uhfble_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] uhfble_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] uhfble_types::Error),
    
    #[error("Reader not connected")]
    NotConnected,
    
    #[error("Reader already connected or connecting")]
    AlreadyConnected,
}

impl Error {
    /// Discovery, connect or write failure reported by the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
    
    /// Operation rejected before any transport interaction
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::AlreadyConnected | Self::Types(_)
        )
    }
}
