//! Handler registry keyed by frame id.
//!
//! Ids are unique and enumerate in registration order. The management id is
//! never accepted as a user entry.

use std::fmt;

use tracing::debug;

use super::PacketHandler;
use crate::core::{Error, Result, MANAGEMENT_PACKET_ID};

/// Registry mapping frame ids to the handlers that own them
#[derive(Default)]
pub struct HandlerRegistry {
    /// Handlers in registration order. At most 255 entries, so a linear scan is fine.
    handlers: Vec<Box<dyn PacketHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler, taking ownership of it
    ///
    /// Fails with [`Error::ReservedId`] for the management id and with
    /// [`Error::AlreadyRegistered`] if the id is taken.
    pub fn add(&mut self, handler: Box<dyn PacketHandler>) -> Result<()> {
        let id = handler.id();
        if id == MANAGEMENT_PACKET_ID {
            return Err(Error::ReservedId(id));
        }
        if self.contains(id) {
            return Err(Error::AlreadyRegistered(id));
        }

        debug!(id, reliable = handler.is_reliable(), "Registered handler");
        self.handlers.push(handler);
        Ok(())
    }

    /// Removes the handler for `id`, if any
    pub fn remove(&mut self, id: u8) {
        if let Some(index) = self.position(id) {
            self.handlers.remove(index);
            debug!(id, "Removed handler");
        }
    }

    pub fn get(&self, id: u8) -> Option<&dyn PacketHandler> {
        self.position(id).map(|index| self.handlers[index].as_ref())
    }

    pub fn get_mut(&mut self, id: u8) -> Option<&mut (dyn PacketHandler + 'static)> {
        match self.position(id) {
            Some(index) => Some(self.handlers[index].as_mut()),
            None => None,
        }
    }

    pub fn contains(&self, id: u8) -> bool {
        self.position(id).is_some()
    }

    /// Every registered id, in registration order
    pub fn all_ids(&self) -> Vec<u8> {
        self.handlers.iter().map(|handler| handler.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Removes every handler
    pub fn clear(&mut self) {
        for id in self.all_ids() {
            self.remove(id);
        }
    }

    fn position(&self, id: u8) -> Option<usize> {
        self.handlers.iter().position(|handler| handler.id() == id)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("ids", &self.all_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::NoopHandler;

    fn noop(id: u8) -> Box<dyn PacketHandler> {
        Box::new(NoopHandler::new(id, false))
    }

    #[test]
    fn test_add_and_enumerate_in_order() {
        let mut registry = HandlerRegistry::new();
        registry.add(noop(2)).unwrap();
        registry.add(noop(3)).unwrap();
        assert_eq!(registry.all_ids(), vec![2, 3]);

        registry.remove(2);
        assert_eq!(registry.all_ids(), vec![3]);
    }

    #[test]
    fn test_enumeration_keeps_registration_order() {
        let mut registry = HandlerRegistry::new();
        for id in [40, 7, 200, 3] {
            registry.add(noop(id)).unwrap();
        }
        assert_eq!(registry.all_ids(), vec![40, 7, 200, 3]);
        assert_eq!(registry.all_ids(), registry.all_ids());
    }

    #[test]
    fn test_reserved_id_rejected() {
        let mut registry = HandlerRegistry::new();
        let err = registry.add(noop(MANAGEMENT_PACKET_ID)).unwrap_err();
        assert!(matches!(err, Error::ReservedId(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.add(Box::new(NoopHandler::new(4, true))).unwrap();

        let err = registry.add(noop(4)).unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered(4)));
        // The first entry survives
        assert!(registry.get(4).unwrap().is_reliable());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = HandlerRegistry::new();
        registry.add(noop(9)).unwrap();
        registry.remove(9);
        registry.remove(9);
        registry.remove(42);
        assert!(registry.is_empty());
        assert!(registry.get(9).is_none());
    }

    #[test]
    fn test_clear() {
        let mut registry = HandlerRegistry::new();
        registry.add(noop(2)).unwrap();
        registry.add(noop(3)).unwrap();
        registry.clear();
        assert!(registry.all_ids().is_empty());
    }
}
