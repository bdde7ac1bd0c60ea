//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    #[error("No device advertising a name starting with {prefixes:?}")]
    DeviceNotFound {
        prefixes: Vec<String>,
    },
    
    #[error("Connection failed: {0}")]
    ConnectFailed(String),
    
    #[error("GATT service not found: {0}")]
    ServiceNotFound(String),
    
    #[error("GATT characteristic not found: {0}")]
    CharacteristicNotFound(String),
    
    #[error("Write failed: {0}")]
    WriteFailed(String),
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
