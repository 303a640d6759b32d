//! In-memory backend that records applied ramps instead of touching displays.

use anyhow::Result;

use super::{GammaBackend, Output, OutputId, RampTable};

/// One ramp submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRamp {
    pub output: OutputId,
    pub output_name: String,
    pub table: RampTable,
}

#[derive(Debug, Default)]
pub struct DryRunBackend {
    applied: Vec<AppliedRamp>,
    verbose: bool,
}

impl DryRunBackend {
    pub fn new(verbose: bool) -> Self {
        Self {
            applied: Vec::new(),
            verbose,
        }
    }

    pub fn applied(&self) -> &[AppliedRamp] {
        &self.applied
    }

    /// Most recent ramp submitted to `output`.
    pub fn last_for(&self, output: OutputId) -> Option<&AppliedRamp> {
        self.applied.iter().rev().find(|ramp| ramp.output == output)
    }
}

impl GammaBackend for DryRunBackend {
    fn set_gamma(&mut self, output: &Output, table: &RampTable) -> Result<()> {
        let output_name = output.display_name();
        if self.verbose {
            let size = table.ramp_size();
            log_indented!(
                "{}: ramp of {} entries, peak r={} g={} b={}",
                output_name,
                size,
                table.red()[size - 1],
                table.green()[size - 1],
                table.blue()[size - 1]
            );
        }
        self.applied.push(AppliedRamp {
            output: output.id,
            output_name,
            table: table.clone(),
        });
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::create_gamma_table;

    #[test]
    fn test_records_submissions() {
        let mut backend = DryRunBackend::new(false);
        let mut output = Output::new(7);
        output.ramp_size = Some(4);

        let warm = create_gamma_table(4, 3000, 1.0).unwrap();
        let neutral = create_gamma_table(4, 6500, 1.0).unwrap();
        backend.set_gamma(&output, &warm).unwrap();
        backend.set_gamma(&output, &neutral).unwrap();

        assert_eq!(backend.applied().len(), 2);
        assert_eq!(backend.applied()[0].output_name, "output-7");
        assert_eq!(backend.last_for(7).unwrap().table, neutral);
        assert!(backend.last_for(8).is_none());
        assert_eq!(backend.backend_name(), "dry-run");
    }
}
