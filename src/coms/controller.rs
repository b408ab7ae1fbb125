use std::future::Future;
use std::time::Instant;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::engine::{ComsEngine, Dispatch};
use crate::core::{LinkConfig, Result};
use crate::network::{Link, Transport};
use crate::util;

/// Lifecycle of a device link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Link not brought up yet
    Startup,
    /// Bring-up started, waiting for the link to report connected
    WaitForConnection,
    /// Link up, frames flowing
    Run,
}

/// Drives a [`ComsEngine`] once its link is up
///
/// State steps happen at most once per `setup_interval`; the engine itself
/// runs on every tick while the link is connected.
pub struct LinkController<const N: usize, T, L> {
    engine: ComsEngine<N, T>,
    link: L,
    config: LinkConfig,
    state: ControllerState,
    last_step: Option<Instant>,
}

impl<const N: usize, T: Transport<N>, L: Link> LinkController<N, T, L> {
    /// Creates a controller in the `Startup` state
    pub fn new(engine: ComsEngine<N, T>, link: L, config: LinkConfig) -> Result<Self> {
        util::validate_config(&config)?;

        Ok(LinkController {
            engine,
            link,
            config,
            state: ControllerState::Startup,
            last_step: None,
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn engine(&self) -> &ComsEngine<N, T> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ComsEngine<N, T> {
        &mut self.engine
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Runs one controller tick at time `now`
    ///
    /// Returns the engine's result when it ran, or `Dispatch::Idle` when the
    /// link is not up yet.
    pub fn tick(&mut self, now: Instant) -> Result<Dispatch> {
        let due = match self.last_step {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.setup_interval,
        };
        if due {
            self.step();
            self.last_step = Some(now);
        }

        if self.state == ControllerState::Startup {
            return Ok(Dispatch::Idle);
        }

        self.link.poll();
        if !self.link.is_connected() {
            return Ok(Dispatch::Idle);
        }

        self.engine.run_iteration()
    }

    fn step(&mut self) {
        match self.state {
            ControllerState::Startup => match self.link.bring_up() {
                Ok(()) => {
                    info!("Link bring-up started");
                    self.state = ControllerState::WaitForConnection;
                }
                Err(e) => warn!(error = %e, "Link bring-up failed, retrying"),
            },
            ControllerState::WaitForConnection => {
                if self.link.is_connected() {
                    info!("Link connected");
                    self.state = ControllerState::Run;
                }
            }
            ControllerState::Run => {
                if !self.link.is_connected() {
                    info!("Link lost, waiting for connection");
                    self.state = ControllerState::WaitForConnection;
                }
            }
        }
    }

    /// Ticks on a fixed interval until `shutdown` resolves
    ///
    /// Iteration errors are logged and never stop the loop.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Link controller stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.tick(Instant::now()) {
                        debug!(error = %e, "Iteration failed");
                    }
                }
            }
        }
    }
}
