// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::errors::Result;

use super::core::CoreMonitor;
use super::observe::ChangeHub;
use super::MonitorEvent;

/// Drives a [`CoreMonitor`] from a periodic timer and a host event channel,
/// publishing each step's changes to a [`ChangeHub`].
///
/// Host events already queued are handled before the next tick, so seeding
/// a refresh and a selection before `run` means the first tick already sees
/// the selected process.
pub struct Runtime {
    core: CoreMonitor,
    event_rx: mpsc::Receiver<MonitorEvent>,
    hub: ChangeHub,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(core: CoreMonitor, event_rx: mpsc::Receiver<MonitorEvent>, hub: ChangeHub) -> Self {
        Self {
            core,
            event_rx,
            hub,
        }
    }

    /// Main loop. Returns when the core asks to stop, the event channel
    /// closes, or a step fails.
    pub async fn run(mut self) -> Result<()> {
        let mut ticker = time::interval(self.core.options().poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("procwatch runtime started");

        loop {
            let event = tokio::select! {
                biased;
                received = self.event_rx.recv() => match received {
                    Some(e) => e,
                    None => {
                        info!("monitor event channel closed; exiting");
                        break;
                    }
                },
                _ = ticker.tick() => MonitorEvent::PollTick,
            };

            if event != MonitorEvent::PollTick {
                debug!(?event, "runtime received event");
            }

            let step = self.core.step(event)?;
            self.hub.publish(&step.changes);

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }
}
