use std::io;
use std::net::{SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use super::Transport;
use crate::core::{Result, UdpConfig};
use crate::protocol::Frame;

/// Non-blocking UDP transport
///
/// One datagram carries exactly one frame. Replies go to the configured peer,
/// or to whoever sent the last frame.
#[derive(Debug)]
pub struct UdpTransport<const N: usize> {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
    fixed_peer: bool,
    // One byte longer than a frame so oversized datagrams are not cut to fit
    scratch: Vec<u8>,
}

impl<const N: usize> UdpTransport<N> {
    /// Binds a non-blocking socket on the configured address
    pub fn bind(config: &UdpConfig) -> Result<Self> {
        let socket = Socket::new(
            Domain::for_address(config.bind_addr),
            Type::DGRAM,
            Some(Protocol::UDP),
        )?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&config.bind_addr.into())?;

        let socket: UdpSocket = socket.into();
        let local_addr = socket.local_addr()?;
        debug!(addr = %local_addr, "UDP transport bound");

        Ok(UdpTransport {
            socket,
            peer: config.peer_addr,
            fixed_peer: config.peer_addr.is_some(),
            scratch: vec![0u8; N + 1],
        })
    }

    /// Returns the local socket address
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// The address replies are currently sent to
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl<const N: usize> Transport<N> for UdpTransport<N> {
    fn is_data_available(&mut self) -> io::Result<bool> {
        // WouldBlock when the receive queue is empty
        self.socket.peek_from(&mut self.scratch).map(|_| true)
    }

    fn read(&mut self) -> io::Result<Frame<N>> {
        let (len, addr) = self.socket.recv_from(&mut self.scratch)?;

        if !self.fixed_peer {
            self.peer = Some(addr);
        }

        if len != N {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Expected a {} byte datagram from {}, got {} bytes", N, addr, len),
            ));
        }

        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.scratch[..N]);
        Ok(Frame::from_bytes(bytes))
    }

    fn write(&mut self, frame: &Frame<N>) -> io::Result<()> {
        let peer = self
            .peer
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "No peer to reply to"))?;

        let sent = self.socket.send_to(frame.as_bytes(), peer)?;
        if sent != N {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "Short datagram write"));
        }
        Ok(())
    }
}
