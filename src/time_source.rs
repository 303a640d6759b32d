//! Time source abstraction for real and simulated clocks.
//!
//! The scheduler itself never reads a clock; the driver asks a [`TimeSource`]
//! for the current instant and waits for each deadline through it, waking
//! early when a signal message arrives. A
//! simulated source lets a whole day be previewed in seconds, either jumping
//! straight from deadline to deadline or running at a fixed acceleration.

use anyhow::{Context, Result, anyhow, ensure};
use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::common::utils::Timestamp;
use crate::signals::SignalMessage;

/// Global time source, used by the logger for simulated timestamps.
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

pub trait TimeSource: Send + Sync {
    /// Current instant in Unix seconds.
    fn now(&self) -> Timestamp;

    /// Block until `deadline` (or simulate doing so), returning early with
    /// the first message that arrives on `events`.
    fn wait_until(
        &self,
        deadline: Timestamp,
        events: &Receiver<SignalMessage>,
    ) -> Option<SignalMessage>;

    fn is_simulated(&self) -> bool;

    /// Whether a simulation has reached its end (never for real time).
    fn is_ended(&self) -> bool {
        false
    }
}

/// Wall clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp()
    }

    fn wait_until(
        &self,
        deadline: Timestamp,
        events: &Receiver<SignalMessage>,
    ) -> Option<SignalMessage> {
        let remaining = (deadline - self.now()).max(0) as u64;
        match events.recv_timeout(Duration::from_secs(remaining)) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                // No one left to wake us: plain sleep
                std::thread::sleep(Duration::from_secs(remaining));
                None
            }
        }
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated clock running from `start` to `end`.
///
/// A multiplier of `0.0` fast-forwards: each wait jumps to its deadline
/// immediately. Otherwise simulated time passes `multiplier` times faster
/// than real time.
pub struct SimulatedTimeSource {
    end: Timestamp,
    multiplier: f64,
    current: AtomicI64,
}

impl SimulatedTimeSource {
    pub fn new(start: Timestamp, end: Timestamp, multiplier: f64) -> Result<Self> {
        ensure!(end > start, "simulation end must be after its start");
        ensure!(
            multiplier.is_finite() && multiplier >= 0.0,
            "time multiplier ({}) must be zero or positive",
            multiplier
        );
        Ok(Self {
            end,
            multiplier,
            current: AtomicI64::new(start),
        })
    }

    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> Timestamp {
        self.current.load(Ordering::SeqCst)
    }

    fn wait_until(
        &self,
        deadline: Timestamp,
        events: &Receiver<SignalMessage>,
    ) -> Option<SignalMessage> {
        let current = self.now();
        let target = deadline.min(self.end);
        if target <= current {
            return events.try_recv().ok();
        }
        let real_wait = if self.is_fast_forward() {
            // Give log output a chance to flush between jumps
            Duration::from_millis(1)
        } else {
            Duration::from_secs_f64((target - current) as f64 / self.multiplier)
        };
        match events.recv_timeout(real_wait) {
            // Interrupted before the deadline, the clock stays put
            Ok(message) => Some(message),
            Err(_) => {
                self.current.store(target, Ordering::SeqCst);
                None
            }
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.now() >= self.end
    }
}

/// Install the global time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn global() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

/// Current instant from the global time source.
pub fn now() -> Timestamp {
    global().now()
}

pub fn is_simulated() -> bool {
    global().is_simulated()
}

/// Parse a local `YYYY-MM-DD HH:MM:SS` datetime into a timestamp.
pub fn parse_datetime(s: &str) -> Result<Timestamp> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("invalid datetime '{s}', use YYYY-MM-DD HH:MM:SS"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.timestamp())
        .ok_or_else(|| anyhow!("'{s}' does not exist in the local timezone"))
}
