use serde::{Serialize, Deserialize};
use tracing::{debug, trace, warn};

use crate::core::{Error, Result, MANAGEMENT_PACKET_ID};
use crate::handler::{HandlerRegistry, ManagementHandler, PacketHandler};
use crate::network::{is_would_block, Transport};
use crate::protocol::{ArqState, Delivery, Frame};

/// Outcome of one engine iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to read
    Idle,
    /// The availability check or the read failed; already reported
    TransportFault,
    /// An unreliable handler ran and its frame was echoed
    Unreliable { id: u8 },
    /// A new reliable delivery was processed and acknowledged
    Accepted { id: u8, seq: u8 },
    /// A retransmission was acknowledged without running the handler
    Retransmission { id: u8, seq: u8 },
}

/// Counters kept by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComsStats {
    /// Frames read from the transport
    pub frames_received: u64,
    /// Replies successfully written
    pub frames_sent: u64,
    /// Frames handled by unreliable handlers
    pub unreliable: u64,
    /// New reliable deliveries
    pub accepted: u64,
    /// Reliable frames suppressed as duplicates
    pub retransmissions: u64,
    /// Frames for ids with no handler
    pub unknown_ids: u64,
    /// Handler calls that returned an error
    pub handler_failures: u64,
    /// Transport errors other than would-block
    pub transport_errors: u64,
}

/// Frame dispatch engine
///
/// Owns the transport, the handler registry and the alternating-bit state of
/// one link. Each call to [`ComsEngine::run_iteration`] performs at most one
/// read and one write and never blocks.
pub struct ComsEngine<const N: usize, T> {
    transport: T,
    registry: HandlerRegistry,
    management: Option<ManagementHandler>,
    state: ArqState,
    stats: ComsStats,
}

impl<const N: usize, T: Transport<N>> ComsEngine<N, T> {
    /// Creates an engine with the management handler enabled and nothing ensured
    pub fn new(transport: T) -> Self {
        ComsEngine {
            transport,
            registry: HandlerRegistry::new(),
            management: Some(ManagementHandler::new()),
            state: ArqState::default(),
            stats: ComsStats::default(),
        }
    }

    /// Creates an engine with the given management handler, or none
    ///
    /// The management handler's ensured handlers are registered immediately.
    pub fn with_management(transport: T, management: Option<ManagementHandler>) -> Result<Self> {
        let mut registry = HandlerRegistry::new();
        if let Some(management) = &management {
            management.add_ensured(&mut registry)?;
        }

        Ok(ComsEngine {
            transport,
            registry,
            management,
            state: ArqState::default(),
            stats: ComsStats::default(),
        })
    }

    /// Adds a packet handler. The id cannot be the management id or already in use.
    pub fn add_packet<H: PacketHandler + 'static>(&mut self, handler: H) -> Result<()> {
        self.registry.add(Box::new(handler))
    }

    /// Removes a packet handler
    pub fn remove_packet(&mut self, id: u8) {
        self.registry.remove(id);
    }

    /// Every registered user handler id, in registration order
    pub fn packet_ids(&self) -> Vec<u8> {
        self.registry.all_ids()
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn is_management_enabled(&self) -> bool {
        self.management.is_some()
    }

    /// Current alternating-bit state
    pub fn state(&self) -> ArqState {
        self.state
    }

    pub fn stats(&self) -> &ComsStats {
        &self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Runs one iteration of coms
    ///
    /// Transport failures are reported and end the iteration without an error.
    /// A frame for an id with no handler is answered with a zeroed payload and
    /// fails with [`Error::NoDevice`].
    pub fn run_iteration(&mut self) -> Result<Dispatch> {
        match self.transport.is_data_available() {
            Ok(true) => {}
            Ok(false) => return Ok(Dispatch::Idle),
            // No data is not an error
            Err(e) if is_would_block(&e) => return Ok(Dispatch::Idle),
            Err(e) => {
                self.stats.transport_errors += 1;
                warn!(error = %e, "Error peeking");
                return Ok(Dispatch::TransportFault);
            }
        }

        let mut frame = match self.transport.read() {
            Ok(frame) => frame,
            Err(e) if is_would_block(&e) => return Ok(Dispatch::Idle),
            Err(e) => {
                self.stats.transport_errors += 1;
                warn!(error = %e, "Error reading");
                return Ok(Dispatch::TransportFault);
            }
        };
        self.stats.frames_received += 1;

        let id = frame.id();
        match self.reliability(id) {
            None => {
                self.stats.unknown_ids += 1;
                debug!(id, "No handler registered, replying with empty payload");
                frame.clear_payload();
                self.reply(&frame);
                Err(Error::NoDevice(id))
            }
            Some(false) => {
                self.stats.unreliable += 1;
                self.run_handler(id, &mut frame);
                self.reply(&frame);
                trace!(id, "Handled unreliable frame");
                Ok(Dispatch::Unreliable { id })
            }
            Some(true) => Ok(self.handle_reliable(id, frame)),
        }
    }

    /// Alternating-bit step for a frame whose handler is reliable
    fn handle_reliable(&mut self, id: u8, mut frame: Frame<N>) -> Dispatch {
        let seq = frame.seq();
        let step = self.state.step(seq);

        let dispatch = match step.delivery {
            Delivery::New => {
                self.stats.accepted += 1;
                self.run_handler(id, &mut frame);
                debug!(id, seq, "Accepted reliable frame");
                Dispatch::Accepted { id, seq }
            }
            Delivery::Retransmission => {
                // Already processed; resend the previous ack with no payload
                self.stats.retransmissions += 1;
                frame.clear_payload();
                debug!(id, seq, ack = step.ack, "Suppressed retransmission");
                Dispatch::Retransmission { id, seq }
            }
        };

        frame.set_ack(step.ack);
        self.reply(&frame);
        self.state = step.next;
        dispatch
    }

    /// Some(reliable) if something answers `id`
    fn reliability(&self, id: u8) -> Option<bool> {
        if id == MANAGEMENT_PACKET_ID {
            if let Some(management) = &self.management {
                return Some(management.is_reliable());
            }
        }
        self.registry.get(id).map(|handler| handler.is_reliable())
    }

    /// Runs the handler for `id` on the frame payload. Failures are reported only.
    fn run_handler(&mut self, id: u8, frame: &mut Frame<N>) {
        let payload = frame.payload_mut();
        let result = match (id, self.management.as_mut()) {
            (MANAGEMENT_PACKET_ID, Some(management)) => {
                management.process(payload, &mut self.registry)
            }
            _ => match self.registry.get_mut(id) {
                Some(handler) => handler.process(payload),
                None => Err(Error::NoDevice(id)),
            },
        };

        if let Err(e) = result {
            self.stats.handler_failures += 1;
            warn!(id, error = %e, "Error handling packet event");
        }
    }

    fn reply(&mut self, frame: &Frame<N>) {
        match self.transport.write(frame) {
            Ok(()) => self.stats.frames_sent += 1,
            Err(e) => {
                self.stats.transport_errors += 1;
                warn!(id = frame.id(), error = %e, "Error writing");
            }
        }
    }
}
