//! Core types shared by the whole crate
//!
//! This module contains the error type, the configuration structures and the
//! wire-level constants every other module builds on.

pub mod error;
pub mod types;
pub mod serde;

pub use self::error::{Error, Result};
pub use self::types::{LinkConfig, SerialConfig, UdpConfig};

/// Number of header bytes at the start of every frame: id, seq and ack
pub const HEADER_LENGTH: usize = 3;

/// Reference frame size in bytes, header included
pub const DEFAULT_FRAME_SIZE: usize = 64;

/// Payload bytes available in a frame of the reference size
pub const DEFAULT_PAYLOAD_SIZE: usize = DEFAULT_FRAME_SIZE - HEADER_LENGTH;

/// Handler id reserved for the management handler
pub const MANAGEMENT_PACKET_ID: u8 = 1;

/// Default UDP port a device listens on
pub const DEFAULT_PORT: u16 = 1866;
