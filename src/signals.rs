//! Signal handling for the update loop.
//!
//! A background thread turns Unix signals into [`SignalMessage`]s on a
//! channel. The driver waits on that channel instead of sleeping blindly, so
//! a force toggle or a shutdown request is handled as soon as it arrives
//! rather than at the next scheduled update.
//!
//! - `SIGUSR1`: cycle the forced mode `off -> high -> low -> off`
//! - `SIGINT`, `SIGTERM`, `SIGHUP`: stop the loop

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Requests delivered to the update loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Advance the force toggle (SIGUSR1).
    ToggleForced,
    /// Stop the loop (SIGINT, SIGTERM, SIGHUP).
    Shutdown,
}

/// State shared between the signal thread and the update loop.
pub struct SignalState {
    /// Cleared once a shutdown has been requested.
    pub running: Arc<AtomicBool>,
    pub receiver: Receiver<SignalMessage>,
    /// Sender side, for requests that do not come from the OS.
    pub sender: Sender<SignalMessage>,
}

impl SignalState {
    /// A running state with no OS handlers attached.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            receiver,
            sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a stop and wake the loop.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        // The receiver lives as long as self
        let _ = self.sender.send(SignalMessage::Shutdown);
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Install OS signal handlers feeding a fresh [`SignalState`].
pub fn setup_signal_handler() -> Result<SignalState> {
    let state = SignalState::new();
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.sender.clone();
    thread::spawn(move || {
        for signal in signals.forever() {
            let message = match signal {
                SIGUSR1 => {
                    log_pipe!();
                    log_info!("Received SIGUSR1, toggling forced mode");
                    SignalMessage::ToggleForced
                }
                _ => {
                    log_pipe!();
                    log_info!("Received shutdown signal");
                    running.store(false, Ordering::SeqCst);
                    SignalMessage::Shutdown
                }
            };
            if sender.send(message).is_err() {
                // Update loop is gone
                break;
            }
        }
    });

    Ok(state)
}
