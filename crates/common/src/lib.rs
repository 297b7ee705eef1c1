use serde::{Deserialize, Serialize};

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod metrics;
pub mod pd;
pub mod plant;

pub use config::{ControllerConfig, LoopConfig};
pub use diagnostics::{DiagnosticsSnapshot, SharedDiagnostics};
pub use error::{ControlError, LoopError};
pub use metrics::{CycleRecord, TraceRecorder};
pub use pd::PdController;
pub use plant::FirstOrderPlant;

/// Plant-side measurement handed to the controller worker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    pub cycle: u64,
    pub reference: f64,
    pub measured: f64,
}

/// Controller reply for one sample. `output` is `None` when the sample was
/// rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Command {
    pub cycle: u64,
    pub output: Option<f64>,
    pub saturated: bool,
}

/// Result of a closed-loop run.
pub struct LoopOutcome {
    pub trace: TraceRecorder,
    pub diagnostics: DiagnosticsSnapshot,
}

impl LoopOutcome {
    pub fn summary(&self) -> String {
        format!(
            "{} cycles, final error {:.6}, {} saturated, {} rejected",
            self.trace.len(),
            self.trace.final_error().unwrap_or(f64::NAN),
            self.diagnostics.saturated_outputs,
            self.diagnostics.rejected_samples,
        )
    }
}

/// Controller half of a closed loop: answers one sample with one command.
///
/// Shared by the threaded and async drivers so both produce identical traces.
pub fn handle_sample(
    pd: &mut PdController,
    sample: Sample,
    diagnostics: &SharedDiagnostics,
) -> Command {
    match pd.step(sample.reference, sample.measured) {
        Ok(u) => {
            let saturated = pd.is_saturated(u);
            if saturated {
                diagnostics.record_saturation();
                log::debug!("Cycle #{}: output saturated at {:.4}", sample.cycle, u);
            }
            Command {
                cycle: sample.cycle,
                output: Some(u),
                saturated,
            }
        }
        Err(e) => {
            diagnostics.record_rejection();
            log::debug!("Cycle #{}: sample rejected: {}", sample.cycle, e);
            Command {
                cycle: sample.cycle,
                output: None,
                saturated: false,
            }
        }
    }
}

/// Plant half of a closed loop: applies a command and records the cycle.
///
/// A rejected sample leaves the plant untouched.
pub fn apply_command(
    plant: &mut FirstOrderPlant,
    sample: Sample,
    command: Command,
    recorder: &TraceRecorder,
) {
    let output = match command.output {
        Some(u) => u,
        None => return,
    };

    let measured = plant.apply(output);
    log::trace!(
        "Cycle #{}: y {:.4} -> {:.4} (u {:.4})",
        sample.cycle,
        sample.measured,
        measured,
        output
    );

    recorder.record(CycleRecord {
        cycle: sample.cycle,
        reference: sample.reference,
        measured,
        error: sample.reference - sample.measured,
        output,
        saturated: command.saturated,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_sample_counts_saturation_and_rejection() {
        let mut pd = PdController::new(10.0, 0.0, Some(-1.0), Some(1.0));
        let diagnostics = SharedDiagnostics::default();

        let cmd = handle_sample(
            &mut pd,
            Sample { cycle: 0, reference: 1.0, measured: 0.0 },
            &diagnostics,
        );
        assert_eq!(cmd.output, Some(1.0));
        assert!(cmd.saturated);

        let cmd = handle_sample(
            &mut pd,
            Sample { cycle: 1, reference: f64::NAN, measured: 0.0 },
            &diagnostics,
        );
        assert_eq!(cmd.output, None);
        assert_eq!(pd.prev_error(), Some(1.0));

        assert_eq!(
            diagnostics.snapshot(),
            DiagnosticsSnapshot { saturated_outputs: 1, rejected_samples: 1 }
        );
    }

    #[test]
    fn rejected_command_is_not_recorded() {
        let mut plant = FirstOrderPlant::new(0.0, 1.0);
        let recorder = TraceRecorder::new();
        let sample = Sample { cycle: 3, reference: 1.0, measured: 0.0 };

        apply_command(
            &mut plant,
            sample,
            Command { cycle: 3, output: None, saturated: false },
            &recorder,
        );
        assert!(recorder.is_empty());
        assert_eq!(plant.measured(), 0.0);

        apply_command(
            &mut plant,
            sample,
            Command { cycle: 3, output: Some(0.75), saturated: false },
            &recorder,
        );
        assert_eq!(recorder.get_results()[0].measured, 0.75);
        assert_eq!(recorder.final_error(), Some(0.25));
    }
}
