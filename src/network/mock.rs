//! In-memory transport and handler doubles
//!
//! Used by the unit tests, the integration tests and the benchmarks.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::core::{Error, Result};
use crate::handler::PacketHandler;
use crate::protocol::Frame;

/// A transport backed by two queues
///
/// Frames pushed with [`MockTransport::push_read`] are handed to the engine in
/// order; every frame the engine writes lands in [`MockTransport::written`].
#[derive(Debug, Default)]
pub struct MockTransport<const N: usize> {
    reads: VecDeque<Frame<N>>,
    writes: VecDeque<Frame<N>>,
    availability_error: Option<io::ErrorKind>,
    read_error: Option<io::ErrorKind>,
    write_error: Option<io::ErrorKind>,
}

impl<const N: usize> MockTransport<N> {
    pub fn new() -> Self {
        MockTransport {
            reads: VecDeque::new(),
            writes: VecDeque::new(),
            availability_error: None,
            read_error: None,
            write_error: None,
        }
    }

    /// Queues a frame for the engine to read
    pub fn push_read(&mut self, frame: Frame<N>) {
        self.reads.push_back(frame);
    }

    /// Queues raw wire bytes for the engine to read
    pub fn push_bytes(&mut self, bytes: [u8; N]) {
        self.push_read(Frame::from_bytes(bytes));
    }

    /// Takes the oldest frame the engine wrote
    pub fn pop_written(&mut self) -> Option<Frame<N>> {
        self.writes.pop_front()
    }

    pub fn written(&self) -> &VecDeque<Frame<N>> {
        &self.writes
    }

    pub fn pending_reads(&self) -> usize {
        self.reads.len()
    }

    /// Makes the next availability check fail with `kind`
    pub fn fail_next_availability(&mut self, kind: io::ErrorKind) {
        self.availability_error = Some(kind);
    }

    /// Makes the next read fail with `kind`. The queued frame is kept.
    pub fn fail_next_read(&mut self, kind: io::ErrorKind) {
        self.read_error = Some(kind);
    }

    /// Makes the next write fail with `kind`. The frame is dropped.
    pub fn fail_next_write(&mut self, kind: io::ErrorKind) {
        self.write_error = Some(kind);
    }
}

impl<const N: usize> Transport<N> for MockTransport<N> {
    fn is_data_available(&mut self) -> io::Result<bool> {
        if let Some(kind) = self.availability_error.take() {
            return Err(io::Error::new(kind, "injected availability failure"));
        }
        Ok(!self.reads.is_empty())
    }

    fn read(&mut self) -> io::Result<Frame<N>> {
        if let Some(kind) = self.read_error.take() {
            return Err(io::Error::new(kind, "injected read failure"));
        }
        self.reads
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
    }

    fn write(&mut self, frame: &Frame<N>) -> io::Result<()> {
        if let Some(kind) = self.write_error.take() {
            return Err(io::Error::new(kind, "injected write failure"));
        }
        self.writes.push_back(*frame);
        Ok(())
    }
}

/// Shared view of what a [`RecordingHandler`] has seen
#[derive(Debug, Clone, Default)]
pub struct Recording {
    payloads: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Recording {
    /// Number of times the handler ran
    pub fn calls(&self) -> usize {
        self.lock().len()
    }

    /// Copies of every payload the handler received, oldest first
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        // A poisoned lock only means a test panicked mid-record
        self.payloads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A handler that records every payload it is given
#[derive(Debug)]
pub struct RecordingHandler {
    id: u8,
    reliable: bool,
    fail: bool,
    reply: Option<Vec<u8>>,
    recording: Recording,
}

impl RecordingHandler {
    pub fn new(id: u8, reliable: bool) -> Self {
        RecordingHandler {
            id,
            reliable,
            fail: false,
            reply: None,
            recording: Recording::default(),
        }
    }

    /// Makes every call return a handler error after recording
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Overwrites the start of each payload with `reply`
    pub fn replying(mut self, reply: &[u8]) -> Self {
        self.reply = Some(reply.to_vec());
        self
    }

    /// A handle that stays valid after the handler moves into a registry
    pub fn recording(&self) -> Recording {
        self.recording.clone()
    }
}

impl PacketHandler for RecordingHandler {
    fn id(&self) -> u8 {
        self.id
    }

    fn is_reliable(&self) -> bool {
        self.reliable
    }

    fn process(&mut self, payload: &mut [u8]) -> Result<()> {
        self.recording.lock().push(payload.to_vec());

        if let Some(reply) = &self.reply {
            let len = reply.len().min(payload.len());
            payload[..len].copy_from_slice(&reply[..len]);
        }

        if self.fail {
            return Err(Error::handler(format!("handler {} failed", self.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_queues() {
        let mut transport = MockTransport::<4>::new();
        assert!(!transport.is_data_available().unwrap());

        transport.push_bytes([1, 0, 0, 5]);
        assert!(transport.is_data_available().unwrap());
        let frame = transport.read().unwrap();
        assert_eq!(frame.payload(), &[5]);

        transport.write(&frame).unwrap();
        assert_eq!(transport.pop_written(), Some(frame));
        assert!(transport.pop_written().is_none());
    }

    #[test]
    fn test_injected_failures_fire_once() {
        let mut transport = MockTransport::<4>::new();
        transport.fail_next_availability(io::ErrorKind::NotConnected);
        let err = transport.is_data_available().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert!(transport.is_data_available().is_ok());

        transport.push_bytes([2, 0, 0, 0]);
        transport.fail_next_read(io::ErrorKind::Other);
        assert!(transport.read().is_err());
        assert_eq!(transport.pending_reads(), 1);
        assert!(transport.read().is_ok());
    }

    #[test]
    fn test_recording_handler() {
        let mut handler = RecordingHandler::new(3, true).replying(&[9, 9]);
        let recording = handler.recording();

        let mut payload = [1u8, 2, 3];
        handler.process(&mut payload).unwrap();
        assert_eq!(payload, [9, 9, 3]);
        assert_eq!(recording.calls(), 1);
        assert_eq!(recording.payloads(), vec![vec![1, 2, 3]]);

        let mut handler = RecordingHandler::new(4, false).failing();
        assert!(matches!(handler.process(&mut payload), Err(Error::Handler(_))));
    }
}
