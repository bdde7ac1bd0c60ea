//! # uhfble
//!
//! Rust client for handheld UHF RFID readers (R6 / Chainway) over BLE GATT.
//!
//! ## Features
//!
//! - Bit-exact command frames and validated notification decoding
//! - Tag reports parsed into typed [`TagReading`]s
//! - Async/await API using Tokio
//! - Observer and channel subscriptions for tag and status events
//! - Transport-agnostic: any BLE stack implementing [`Transport`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use uhfble::{MockTransport, Reader, ReaderEvent, TagCollection};
//!
//! #[tokio::main]
//! async fn main() -> uhfble::Result<()> {
//!     // Connect to reader
//!     let mut reader = Reader::new(MockTransport::new());
//!     let (_subscription, mut events) = reader.events();
//!     reader.connect().await?;
//!     
//!     // Collect ten distinct tags
//!     reader.start_inventory().await?;
//!     let mut tags = TagCollection::new();
//!     while let Some(event) = events.recv().await {
//!         if let ReaderEvent::TagRead(tag) = event {
//!             tags.record(tag);
//!             if tags.len() >= 10 {
//!                 break;
//!             }
//!         }
//!     }
//!     reader.stop_inventory().await?;
//!     
//!     // Disconnect
//!     reader.disconnect().await?;
//!     
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod reader;

// Re-exports
pub use config::ReaderConfig;
pub use error::{Error, Result};
pub use events::{ChannelObserver, ReaderEvent, ReaderObserver, SubscriptionId, TracingObserver};
pub use reader::Reader;

// Re-export types
pub use uhfble_core::{Command, Frame, Session};
pub use uhfble_transport::{MockHandle, MockTransport, Peripheral, ScanFilter, Transport, TransportEvent};
pub use uhfble_types::{ConnectionStatus, PowerLevel, TagCollection, TagReading};
