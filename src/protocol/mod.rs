//! Protocol implementation module
//!
//! This module defines the frame layout, the fixed-size stream codec, the
//! alternating-bit state machine and the management sub-protocol.

pub mod codec;
pub mod frame;
pub mod message;
pub mod state;

pub use self::codec::FrameCodec;
pub use self::frame::Frame;
pub use self::message::{ManagementOp, Status};
pub use self::state::{ArqState, Delivery, Step};
