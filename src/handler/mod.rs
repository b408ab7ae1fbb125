//! Packet handlers and the registry that owns them
//!
//! A handler is bound to one frame id and processes payloads for that id in
//! place. The header is never visible to handler code.

pub mod management;
pub mod registry;

pub use self::management::{HandlerFactory, ManagementHandler};
pub use self::registry::HandlerRegistry;

use tracing::info;

use crate::core::Result;
use crate::util;

/// Business logic bound to a single frame id
pub trait PacketHandler: Send {
    /// The frame id this handler answers
    fn id(&self) -> u8;

    /// Whether exchanges with this handler go through the alternating-bit protocol
    fn is_reliable(&self) -> bool;

    /// Processes a payload, optionally rewriting it in place as the reply
    fn process(&mut self, payload: &mut [u8]) -> Result<()>;
}

/// A handler which does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoopHandler {
    id: u8,
    reliable: bool,
}

impl NoopHandler {
    pub fn new(id: u8, reliable: bool) -> Self {
        NoopHandler { id, reliable }
    }
}

impl PacketHandler for NoopHandler {
    fn id(&self) -> u8 {
        self.id
    }

    fn is_reliable(&self) -> bool {
        self.reliable
    }

    fn process(&mut self, _payload: &mut [u8]) -> Result<()> {
        Ok(())
    }
}

/// A handler which logs its payload and leaves it unchanged
#[derive(Debug, Clone, Copy)]
pub struct EchoHandler {
    id: u8,
    reliable: bool,
}

impl EchoHandler {
    pub fn new(id: u8, reliable: bool) -> Self {
        EchoHandler { id, reliable }
    }
}

impl PacketHandler for EchoHandler {
    fn id(&self) -> u8 {
        self.id
    }

    fn is_reliable(&self) -> bool {
        self.reliable
    }

    fn process(&mut self, payload: &mut [u8]) -> Result<()> {
        info!(id = self.id, payload = %util::format_payload(payload), "Echo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_leaves_payload() {
        let mut handler = NoopHandler::new(2, true);
        let mut payload = [1u8, 2, 3];
        handler.process(&mut payload).unwrap();
        assert_eq!(payload, [1, 2, 3]);
        assert_eq!(handler.id(), 2);
        assert!(handler.is_reliable());
    }

    #[test]
    fn test_echo_leaves_payload() {
        let mut handler = EchoHandler::new(5, false);
        let mut payload = [9u8; 8];
        handler.process(&mut payload).unwrap();
        assert_eq!(payload, [9; 8]);
        assert!(!handler.is_reliable());
    }
}
