use std::fmt;

use tracing::{debug, warn};

use super::{HandlerRegistry, PacketHandler};
use crate::core::{Error, Result, MANAGEMENT_PACKET_ID};
use crate::protocol::{ManagementOp, Status};

/// Builds a fresh instance of a handler that must survive a registry reset
pub type HandlerFactory = Box<dyn Fn() -> Box<dyn PacketHandler> + Send>;

/// The built-in handler at the management id
///
/// It is the only handler allowed to change the registry during a dispatch, so
/// the engine keeps it beside the registry and lends it `&mut HandlerRegistry`.
#[derive(Default)]
pub struct ManagementHandler {
    ensured: Vec<HandlerFactory>,
}

impl ManagementHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler factory that `AddEnsuredPackets` re-registers
    pub fn ensure<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn PacketHandler> + Send + 'static,
    {
        self.ensured.push(Box::new(factory));
        self
    }

    pub fn id(&self) -> u8 {
        MANAGEMENT_PACKET_ID
    }

    /// Management exchanges always use the alternating-bit protocol
    pub fn is_reliable(&self) -> bool {
        true
    }

    pub fn ensured_count(&self) -> usize {
        self.ensured.len()
    }

    /// Registers every ensured handler that is not already present
    ///
    /// An id that is already registered counts as ensured. Any other
    /// registration failure is returned after the remaining factories ran.
    pub fn add_ensured(&self, registry: &mut HandlerRegistry) -> Result<()> {
        let mut failure = None;
        for factory in &self.ensured {
            let handler = factory();
            let id = handler.id();
            match registry.add(handler) {
                Ok(()) | Err(Error::AlreadyRegistered(_)) => {}
                Err(e) => {
                    warn!(id, error = %e, "Failed to register ensured handler");
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Runs the operation named by the first payload byte
    pub fn process(&mut self, payload: &mut [u8], registry: &mut HandlerRegistry) -> Result<()> {
        let opcode = payload
            .first()
            .copied()
            .ok_or_else(|| Error::invalid_argument("Empty management payload"))?;

        let status = match ManagementOp::try_from(opcode)? {
            ManagementOp::Disconnect => {
                registry.clear();
                debug!("Disconnect cleared all handlers");
                Status::Accepted
            }
            ManagementOp::AddEnsuredPackets => match self.add_ensured(registry) {
                Ok(()) => {
                    debug!(ids = ?registry.all_ids(), "Ensured handlers registered");
                    Status::Accepted
                }
                Err(_) => Status::RejectedGeneric,
            },
        };

        payload[0] = status.into();
        Ok(())
    }
}

impl fmt::Debug for ManagementHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementHandler")
            .field("ensured", &self.ensured.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::NoopHandler;

    fn registry_with(ids: &[u8]) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for &id in ids {
            registry.add(Box::new(NoopHandler::new(id, false))).unwrap();
        }
        registry
    }

    #[test]
    fn test_disconnect_clears_registry() {
        let mut registry = registry_with(&[2, 3, 10]);
        let mut management = ManagementHandler::new();
        let mut payload = [1u8, 0, 0];

        management.process(&mut payload, &mut registry).unwrap();
        assert!(registry.all_ids().is_empty());
        assert_eq!(payload[0], u8::from(Status::Accepted));
    }

    #[test]
    fn test_invalid_opcode() {
        let mut registry = registry_with(&[2]);
        let mut management = ManagementHandler::new();
        let mut payload = [0x7Fu8, 5];

        let err = management.process(&mut payload, &mut registry).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(payload, [0x7F, 5]);
        assert_eq!(registry.all_ids(), vec![2]);
    }

    #[test]
    fn test_add_ensured_after_disconnect() {
        let mut registry = registry_with(&[]);
        let mut management = ManagementHandler::new()
            .ensure(|| Box::new(NoopHandler::new(2, true)))
            .ensure(|| Box::new(NoopHandler::new(3, false)));
        assert_eq!(management.ensured_count(), 2);

        management.add_ensured(&mut registry).unwrap();
        registry.add(Box::new(NoopHandler::new(9, false))).unwrap();
        assert_eq!(registry.all_ids(), vec![2, 3, 9]);

        let mut payload = [u8::from(ManagementOp::Disconnect), 0];
        management.process(&mut payload, &mut registry).unwrap();
        assert!(registry.is_empty());

        let mut payload = [u8::from(ManagementOp::AddEnsuredPackets), 0];
        management.process(&mut payload, &mut registry).unwrap();
        assert_eq!(payload[0], u8::from(Status::Accepted));
        assert_eq!(registry.all_ids(), vec![2, 3]);
    }

    #[test]
    fn test_add_ensured_is_idempotent() {
        let mut registry = registry_with(&[2]);
        let mut management = ManagementHandler::new().ensure(|| Box::new(NoopHandler::new(2, true)));

        let mut payload = [u8::from(ManagementOp::AddEnsuredPackets)];
        management.process(&mut payload, &mut registry).unwrap();
        assert_eq!(payload[0], u8::from(Status::Accepted));
        assert_eq!(registry.all_ids(), vec![2]);
    }

    #[test]
    fn test_add_ensured_rejects_reserved_id() {
        let mut registry = registry_with(&[]);
        let mut management = ManagementHandler::new()
            .ensure(|| Box::new(NoopHandler::new(MANAGEMENT_PACKET_ID, true)))
            .ensure(|| Box::new(NoopHandler::new(4, true)));

        let mut payload = [u8::from(ManagementOp::AddEnsuredPackets)];
        management.process(&mut payload, &mut registry).unwrap();
        assert_eq!(payload[0], u8::from(Status::RejectedGeneric));
        // Later factories still ran
        assert_eq!(registry.all_ids(), vec![4]);
    }
}
