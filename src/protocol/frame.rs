use std::fmt;

use crate::core::{Error, Result, HEADER_LENGTH};

/// A fixed-size frame as it travels on the wire
///
/// Layout: `<id (1 byte)> <seq (1 byte)> <ack (1 byte)> <payload (N - 3 bytes)>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame<const N: usize>([u8; N]);

impl<const N: usize> Frame<N> {
    const ID_OFFSET: usize = 0;
    const SEQ_OFFSET: usize = 1;
    const ACK_OFFSET: usize = 2;

    /// The frame must hold the header plus at least one payload byte
    const VALID_LENGTH: () = assert!(
        N >= HEADER_LENGTH + 1,
        "Frame length must be at least the header length plus one payload byte"
    );

    /// Number of payload bytes in this frame size
    pub const PAYLOAD_LENGTH: usize = N - HEADER_LENGTH;

    /// Creates an all-zero frame
    pub fn new() -> Self {
        Self::from_bytes([0; N])
    }

    /// Wraps raw wire bytes
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        let () = Self::VALID_LENGTH;
        Frame(bytes)
    }

    /// Creates a zero-payload frame with the given header
    pub fn with_header(id: u8, seq: u8, ack: u8) -> Self {
        let mut frame = Self::new();
        frame.set_id(id);
        frame.set_seq(seq);
        frame.set_ack(ack);
        frame
    }

    /// Copies a frame out of a slice that must be exactly `N` bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; N] = bytes.try_into().map_err(|_| {
            Error::protocol(format!("Expected a {} byte frame, got {} bytes", N, bytes.len()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn id(&self) -> u8 {
        self.0[Self::ID_OFFSET]
    }

    pub fn seq(&self) -> u8 {
        self.0[Self::SEQ_OFFSET]
    }

    pub fn ack(&self) -> u8 {
        self.0[Self::ACK_OFFSET]
    }

    pub fn set_id(&mut self, id: u8) {
        self.0[Self::ID_OFFSET] = id;
    }

    pub fn set_seq(&mut self, seq: u8) {
        self.0[Self::SEQ_OFFSET] = seq;
    }

    pub fn set_ack(&mut self, ack: u8) {
        self.0[Self::ACK_OFFSET] = ack;
    }

    /// The bytes after the header. This is all a handler ever sees.
    pub fn payload(&self) -> &[u8] {
        &self.0[HEADER_LENGTH..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.0[HEADER_LENGTH..]
    }

    /// Zeroes every byte after the header
    pub fn clear_payload(&mut self) {
        self.payload_mut().fill(0);
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; N] {
        self.0
    }
}

impl<const N: usize> Default for Frame<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AsRef<[u8]> for Frame<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Frame<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<const N: usize> fmt::Debug for Frame<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id())
            .field("seq", &self.seq())
            .field("ack", &self.ack())
            .field("payload", &self.payload())
            .finish()
    }
}
