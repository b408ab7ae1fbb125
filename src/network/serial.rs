use std::io::{self, Read, Write};

use bytes::BytesMut;
use serialport::{ClearBuffer, SerialPort};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use super::Transport;
use crate::core::{Error, Result, SerialConfig};
use crate::protocol::{Frame, FrameCodec};

/// Bytes received from a stream, waiting to be cut into frames
#[derive(Debug, Default)]
struct FrameBuffer<const N: usize> {
    codec: FrameCodec<N>,
    buf: BytesMut,
}

impl<const N: usize> FrameBuffer<N> {
    fn new() -> Self {
        FrameBuffer {
            codec: FrameCodec::new(),
            buf: BytesMut::with_capacity(4 * N),
        }
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn has_frame(&self) -> bool {
        self.buf.len() >= N
    }

    fn next_frame(&mut self) -> io::Result<Option<Frame<N>>> {
        self.codec.decode(&mut self.buf)
    }

    fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Transport over a serial port (USB CDC, UART, HID bridges)
///
/// The port delivers a byte stream, so frame boundaries are recovered by
/// counting bytes. Both ends must agree on `N`. A byte lost on the wire shifts
/// every later frame; call [`SerialTransport::reset`] to realign once the peer
/// is known to be quiet.
pub struct SerialTransport<const N: usize> {
    port: Box<dyn SerialPort>,
    incoming: FrameBuffer<N>,
    codec: FrameCodec<N>,
    outgoing: BytesMut,
}

impl<const N: usize> SerialTransport<N> {
    /// Opens the configured port
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|e| Error::config(format!("Failed to open {}: {}", config.path, e)))?;

        debug!(path = %config.path, baud = config.baud_rate, "Serial transport opened");
        Ok(Self::from_port(port))
    }

    /// Wraps an already opened port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialTransport {
            port,
            incoming: FrameBuffer::new(),
            codec: FrameCodec::new(),
            outgoing: BytesMut::with_capacity(N),
        }
    }

    /// Drops partially received frames and discards the port's input queue
    pub fn reset(&mut self) -> io::Result<()> {
        self.incoming.clear();
        self.port.clear(ClearBuffer::Input)?;
        debug!("Serial transport input reset");
        Ok(())
    }

    /// Moves whatever the port has buffered into the frame buffer
    fn drain_port(&mut self) -> io::Result<()> {
        let pending = self.port.bytes_to_read()? as usize;
        if pending == 0 {
            return Ok(());
        }

        let mut chunk = vec![0u8; pending];
        let len = self.port.read(&mut chunk)?;
        self.incoming.extend(&chunk[..len]);
        Ok(())
    }
}

impl<const N: usize> Transport<N> for SerialTransport<N> {
    fn is_data_available(&mut self) -> io::Result<bool> {
        if !self.incoming.has_frame() {
            self.drain_port()?;
        }

        if self.incoming.has_frame() {
            Ok(true)
        } else {
            Err(io::ErrorKind::WouldBlock.into())
        }
    }

    fn read(&mut self) -> io::Result<Frame<N>> {
        if !self.incoming.has_frame() {
            self.drain_port()?;
        }

        self.incoming
            .next_frame()?
            .ok_or_else(|| io::ErrorKind::WouldBlock.into())
    }

    fn write(&mut self, frame: &Frame<N>) -> io::Result<()> {
        self.outgoing.clear();
        self.codec.encode(*frame, &mut self.outgoing)?;
        self.port.write_all(&self.outgoing)?;
        self.port.flush()
    }
}
