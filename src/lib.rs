//! framelink: fixed-size frame dispatch for embedded device links
//!
//! Every frame carries a handler id, a sequence bit and an acknowledgement bit
//! ahead of its payload. The [`ComsEngine`] routes each incoming frame to the
//! handler registered for its id and echoes the handler's reply. Handlers that
//! need delivery guarantees are protected by the alternating-bit protocol: a
//! single sequence bit per link, so at most one reliable exchange is in flight.
//!
//! ```no_run
//! use framelink::{ComsEngine, NoopHandler, UdpConfig, UdpTransport, DEFAULT_FRAME_SIZE};
//!
//! # fn main() -> framelink::Result<()> {
//! let transport = UdpTransport::<DEFAULT_FRAME_SIZE>::bind(&UdpConfig::default())?;
//! let mut engine = ComsEngine::new(transport);
//! engine.add_packet(NoopHandler::new(2, true))?;
//!
//! loop {
//!     if let Err(e) = engine.run_iteration() {
//!         eprintln!("iteration failed: {}", e);
//!     }
//! }
//! # }
//! ```

pub mod core;
pub mod coms;
pub mod handler;
pub mod network;
pub mod protocol;
pub mod util;

// Re-export commonly used items
pub use crate::core::{
    Error, LinkConfig, Result, SerialConfig, UdpConfig, DEFAULT_FRAME_SIZE, DEFAULT_PAYLOAD_SIZE,
    HEADER_LENGTH, MANAGEMENT_PACKET_ID,
};
pub use crate::coms::{ComsEngine, ComsStats, ControllerState, Dispatch, LinkController};
pub use crate::handler::{EchoHandler, HandlerRegistry, ManagementHandler, NoopHandler, PacketHandler};
pub use crate::network::{AlwaysUp, Link, SerialTransport, Transport, UdpTransport};
pub use crate::protocol::{ArqState, Frame, FrameCodec, ManagementOp, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
