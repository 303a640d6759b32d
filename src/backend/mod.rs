//! Display-session seam for applying gamma ramps.
//!
//! The scheduler decides *what* temperature to show; a [`GammaBackend`]
//! hands the resulting per-output ramp to whatever owns the displays. The
//! color math that turns a temperature into a ramp lives in [`gamma`].
//!
//! ## Backends
//!
//! - **Dry run**: [`DryRunBackend`] records every submitted ramp in memory
//!   and logs it, used for previews and tests.

use anyhow::Result;

pub mod dry_run;
pub mod gamma;

pub use dry_run::DryRunBackend;
pub use gamma::{RampTable, Whitepoint, create_gamma_table, fill_ramp_table, whitepoint};

/// Identifier a display session assigns to an output for its lifetime.
pub type OutputId = u32;

/// A display output as announced by the display session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub id: OutputId,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Gamma ramp length, known once the session reports it.
    pub ramp_size: Option<usize>,
    /// Whether the output passes the configured allow-list.
    pub enabled: bool,
    /// Whether the current temperature still has to be applied.
    pub needs_apply: bool,
}

impl Output {
    pub fn new(id: OutputId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            ramp_size: None,
            enabled: false,
            needs_apply: false,
        }
    }

    /// Name for log messages, falling back to a placeholder until the real name arrives.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("output-{}", self.id))
    }

    /// Whether ramps can be submitted to this output.
    pub fn is_ready(&self) -> bool {
        self.enabled && self.ramp_size.is_some()
    }
}

/// Applies gamma ramps to outputs.
#[cfg_attr(test, mockall::automock)]
pub trait GammaBackend {
    /// Submit `table` to `output`. The table's ramp size matches the output's.
    fn set_gamma(&mut self, output: &Output, table: &RampTable) -> Result<()>;

    /// Human-readable backend name.
    fn backend_name(&self) -> &'static str;
}
