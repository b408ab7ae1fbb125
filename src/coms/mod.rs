//! Frame dispatch engine and link controller
//!
//! [`ComsEngine`] is the reliable-delivery core: one call to
//! [`ComsEngine::run_iteration`] reads at most one frame, routes it to the
//! handler registered for its id and writes the reply. [`LinkController`] is the
//! tick source that waits for the link to come up before driving the engine.

mod controller;
mod engine;

pub use self::controller::{ControllerState, LinkController};
pub use self::engine::{ComsEngine, ComsStats, Dispatch};
