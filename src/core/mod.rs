//! Core driver tying the scheduler, output registry and backend together.
//!
//! One [`Core::tick`] performs a full update: re-plan the day if needed, look
//! up the target temperature, submit ramps to outputs when the temperature
//! changed (or an output asked for a refresh), and report when to wake up
//! next. [`Core::run`] repeats that against a [`TimeSource`] until stopped,
//! handling force toggles and shutdown requests as they arrive.

pub mod outputs;
pub mod period;

use anyhow::Result;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::Ordering;

use crate::backend::{GammaBackend, RampTable, create_gamma_table};
use crate::common::utils::{Timestamp, format_clock};
use crate::core::outputs::OutputRegistry;
use crate::core::period::{ForceMode, Scheduler};
use crate::signals::{SignalMessage, SignalState};
use crate::time_source::TimeSource;

/// Dependencies for creating a [`Core`].
pub struct CoreParams<B> {
    pub scheduler: Scheduler,
    pub outputs: OutputRegistry,
    pub backend: B,
}

pub struct Core<B: GammaBackend> {
    scheduler: Scheduler,
    outputs: OutputRegistry,
    backend: B,
    /// Temperature last submitted to outputs.
    applied_temperature: Option<u32>,
}

impl<B: GammaBackend> Core<B> {
    pub fn new(params: CoreParams<B>) -> Self {
        Self {
            scheduler: params.scheduler,
            outputs: params.outputs,
            backend: params.backend,
            applied_temperature: None,
        }
    }

    /// Run one update at `now` and return the next deadline.
    pub fn tick(&mut self, now: Timestamp) -> Result<Timestamp> {
        self.scheduler.recompute(now);
        let temperature = self.scheduler.current_temperature();

        if self.applied_temperature != Some(temperature) {
            log_decorated!("Setting temperature to {}K", temperature);
            self.apply(temperature, true)?;
            self.applied_temperature = Some(temperature);
        } else if self.outputs.needs_refresh() {
            self.apply(temperature, false)?;
        }

        Ok(self.scheduler.next_deadline())
    }

    /// Submit ramps for `temperature` to every ready output, or only to those
    /// flagged as needing it when `all` is false.
    fn apply(&mut self, temperature: u32, all: bool) -> Result<()> {
        let gamma = self.scheduler.settings().gamma();
        let mut tables: HashMap<usize, RampTable> = HashMap::new();
        let mut applied = Vec::new();

        for output in self.outputs.ready() {
            if !(all || output.needs_apply) {
                continue;
            }
            let Some(ramp_size) = output.ramp_size else {
                continue;
            };
            let table = match tables.entry(ramp_size) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    entry.insert(create_gamma_table(ramp_size, temperature, gamma)?)
                }
            };
            match self.backend.set_gamma(output, table) {
                Ok(()) => applied.push(output.id),
                Err(e) => {
                    // Left flagged so the next tick retries
                    log_warning!(
                        "Failed to apply gamma to '{}': {}",
                        output.display_name(),
                        e
                    );
                }
            }
        }

        for id in applied {
            self.outputs.mark_applied(id);
        }
        Ok(())
    }

    /// Advance the force cycle `off -> high -> low -> off`.
    pub fn toggle_forced(&mut self) -> ForceMode {
        let mode = self.scheduler.forced().next();
        self.scheduler.set_forced(mode);
        log_block_start!("Forced mode: {}", mode);
        mode
    }

    /// Repeat ticks until a shutdown is requested or the time source ends.
    ///
    /// Between ticks the loop waits for the next deadline, waking early for
    /// any message on the signal channel.
    pub fn run(&mut self, time: &dyn TimeSource, signals: &SignalState) -> Result<()> {
        log_block_start!(
            "Applying ramps through the {} backend",
            self.backend.backend_name()
        );
        while signals.is_running() && !time.is_ended() {
            let deadline = self.tick(time.now())?;
            log_indented!("Next update at {}", format_clock(deadline));
            if let Some(message) = time.wait_until(deadline, &signals.receiver) {
                self.handle_signal(message, signals);
            }
        }
        Ok(())
    }

    fn handle_signal(&mut self, message: SignalMessage, signals: &SignalState) {
        match message {
            SignalMessage::ToggleForced => {
                self.toggle_forced();
            }
            SignalMessage::Shutdown => {
                signals.running.store(false, Ordering::SeqCst);
                log_block_start!("Shutting down");
            }
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }

    /// Output registry, for feeding display-session events.
    pub fn outputs_mut(&mut self) -> &mut OutputRegistry {
        &mut self.outputs
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn applied_temperature(&self) -> Option<u32> {
        self.applied_temperature
    }
}
