//! Type definitions for uhfble

pub mod collection;
pub mod error;
pub mod power;
pub mod status;
pub mod tag;

pub use collection::TagCollection;
pub use error::{Error, Result};
pub use power::PowerLevel;
pub use status::ConnectionStatus;
pub use tag::TagReading;
