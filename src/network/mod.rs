//! Transports and link status
//!
//! The engine only needs three operations from a transport: check whether a
//! frame is waiting, read one frame, write one frame. Every call is
//! non-blocking; `ErrorKind::WouldBlock` is the normal "nothing to read" case.

pub mod mock;
mod serial;
mod udp;

pub use self::mock::{MockTransport, RecordingHandler};
pub use self::serial::SerialTransport;
pub use self::udp::UdpTransport;

use std::io;

use crate::protocol::Frame;

/// Moves whole frames of `N` bytes across the physical link
pub trait Transport<const N: usize> {
    /// Reports whether a frame can be read without blocking
    fn is_data_available(&mut self) -> io::Result<bool>;

    /// Reads exactly one frame
    fn read(&mut self) -> io::Result<Frame<N>>;

    /// Writes exactly one frame
    fn write(&mut self, frame: &Frame<N>) -> io::Result<()>;
}

impl<const N: usize, T: Transport<N> + ?Sized> Transport<N> for Box<T> {
    fn is_data_available(&mut self) -> io::Result<bool> {
        (**self).is_data_available()
    }

    fn read(&mut self) -> io::Result<Frame<N>> {
        (**self).read()
    }

    fn write(&mut self, frame: &Frame<N>) -> io::Result<()> {
        (**self).write(frame)
    }
}

/// Link bring-up and connection status, e.g. Wi-Fi association
pub trait Link {
    /// Starts bringing the link up
    fn bring_up(&mut self) -> io::Result<()>;

    /// Gives the link a chance to make progress. Called once per tick.
    fn poll(&mut self) {}

    /// Whether frames can currently flow
    fn is_connected(&self) -> bool;
}

/// A link that is up as soon as it exists (USB, serial, loopback)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysUp;

impl Link for AlwaysUp {
    fn bring_up(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// Returns true for the error kind that means "no data yet"
pub fn is_would_block(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
}
