//! # uhfble-core
//!
//! Core protocol implementation for handheld UHF RFID readers (R6 /
//! Chainway) spoken over a BLE notification channel.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions
//! - Inventory tag payload parsing
//! - Session state machine
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod session;
pub mod tag;

pub use command::Command;
pub use error::{Error, Result};
pub use frame::Frame;
pub use session::{Inbound, Session, SessionSnapshot};
pub use tag::PcWord;
