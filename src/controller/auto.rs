//! Timer that keeps a simulation walking on its own.
//!
//! The driver is a Tokio task holding only a weak reference to the
//! simulation. Each tick it starts a step in the background when
//! auto-advance is on and nothing is in flight, so a tick never waits for a
//! step and a slow step never queues extra ones.

use super::simulation::{Inner, Simulation};
use crate::core::State;
use crate::error::SimulationError;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Auto-advance settings and the running driver, if any.
pub(crate) struct AutoAdvance {
    pub(crate) enabled: bool,
    pub(crate) interval: Duration,
    driver: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            enabled: false,
            interval,
            driver: None,
        }
    }

    /// Start ticking every `interval`, replacing any running driver.
    ///
    /// Nothing changes when no runtime is available.
    pub(crate) fn start<S: State>(
        &mut self,
        inner: &Arc<Inner<S>>,
        interval: Duration,
    ) -> Result<(), SimulationError> {
        let runtime = Handle::try_current().map_err(|_| SimulationError::RuntimeUnavailable)?;
        self.abort_driver();
        self.interval = interval;
        self.driver = Some(runtime.spawn(drive(Arc::downgrade(inner), interval)));
        self.enabled = true;
        Ok(())
    }

    /// Stop ticking. A step already started by the driver runs to completion.
    pub(crate) fn stop(&mut self) {
        self.abort_driver();
        self.enabled = false;
    }

    fn abort_driver(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.abort_driver();
    }
}

async fn drive<S: State>(inner: Weak<Inner<S>>, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let simulation = Simulation::from_inner(inner);
        if !simulation.ready_for_tick() {
            continue;
        }
        tokio::spawn(async move {
            simulation.step().await;
        });
    }
}
