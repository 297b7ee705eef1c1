//! Demo closed loop around `common::PdController` on OS threads.
//!
//! Drives a simulated plant so the controller can be exercised end to end;
//! the controller itself has no dependency on this crate.

use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use common::{ControllerConfig, LoopConfig, LoopError, LoopOutcome, SharedDiagnostics, TraceRecorder};

pub mod actuator;
pub mod sensor;

/// Runs the closed loop with the plant and the controller on separate OS
/// threads, exchanging samples and commands over bounded channels.
pub fn run_closed_loop(
    controller: ControllerConfig,
    config: LoopConfig,
) -> Result<LoopOutcome, LoopError> {
    log::info!(
        "Threaded loop: {} cycles, reference {:.3}",
        config.cycles,
        config.reference
    );

    let recorder = TraceRecorder::for_cycles(config.cycles);
    let diagnostics = Arc::new(SharedDiagnostics::default());

    let (sample_tx, sample_rx) = sync_channel(1);
    let (command_tx, command_rx) = sync_channel(1);

    let pd = controller.build();
    let controller_diagnostics = Arc::clone(&diagnostics);
    let controller_handle = thread::Builder::new()
        .name("pd-controller".into())
        .spawn(move || {
            actuator::run_controller_thread(pd, sample_rx, command_tx, controller_diagnostics)
        })
        .map_err(|e| LoopError::Join(e.to_string()))?;

    let plant_recorder = recorder.clone();
    let plant_handle = thread::Builder::new()
        .name("pd-plant".into())
        .spawn(move || sensor::run_plant_thread(config, sample_tx, command_rx, plant_recorder))
        .map_err(|e| LoopError::Join(e.to_string()))?;

    let plant_result = join_worker(plant_handle, "plant")?;
    join_worker(controller_handle, "controller")?;
    plant_result?;

    let outcome = LoopOutcome {
        trace: recorder,
        diagnostics: diagnostics.snapshot(),
    };
    log::info!("Threaded loop finished: {}", outcome.summary());

    Ok(outcome)
}

fn join_worker<T>(handle: JoinHandle<T>, name: &'static str) -> Result<T, LoopError> {
    handle.join().map_err(|_| {
        log::error!("{} thread panicked", name);
        LoopError::WorkerPanicked(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use common::{Command, Sample};

    #[test]
    fn first_cycles_match_hand_computation() {
        let config = LoopConfig {
            cycles: 2,
            ..LoopConfig::default()
        };
        let outcome = run_closed_loop(ControllerConfig::default(), config).unwrap();
        let trace = outcome.trace.get_results();

        assert_eq!(trace.len(), 2);
        assert_relative_eq!(trace[0].output, 0.75, epsilon = 1e-12);
        assert_relative_eq!(trace[0].measured, 0.75, epsilon = 1e-12);
        // e = 0.25, previous e = 1.0
        assert_relative_eq!(trace[1].error, 0.25, epsilon = 1e-12);
        assert_relative_eq!(trace[1].output, 0.15 * 0.25 + 0.6 * (0.25 - 1.0), epsilon = 1e-12);
    }

    #[test]
    fn loop_converges_on_reference() {
        let config = LoopConfig {
            cycles: 200,
            reference: 2.5,
            ..LoopConfig::default()
        };
        let outcome = run_closed_loop(ControllerConfig::default(), config).unwrap();

        assert_eq!(outcome.trace.len(), 200);
        assert_relative_eq!(outcome.trace.final_error().unwrap(), 0.0, epsilon = 1e-6);
        assert_eq!(outcome.diagnostics.rejected_samples, 0);
    }

    #[test]
    fn bounded_controller_reports_saturation() {
        let controller = ControllerConfig {
            u_min: Some(-0.1),
            u_max: Some(0.1),
            ..ControllerConfig::default()
        };
        let config = LoopConfig {
            cycles: 5,
            reference: 10.0,
            ..LoopConfig::default()
        };
        let outcome = run_closed_loop(controller, config).unwrap();

        assert_eq!(outcome.diagnostics.saturated_outputs, 5);
        assert!(outcome.trace.get_results().iter().all(|r| r.output == 0.1));
        assert_relative_eq!(outcome.trace.final_error().unwrap(), 9.5, epsilon = 1e-9);
    }

    #[test]
    fn nan_reference_is_rejected_every_cycle() {
        let config = LoopConfig {
            cycles: 3,
            reference: f64::NAN,
            ..LoopConfig::default()
        };
        let outcome = run_closed_loop(ControllerConfig::default(), config).unwrap();

        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.diagnostics.rejected_samples, 3);
    }

    #[test]
    fn plant_stops_when_controller_hangs_up() {
        let (sample_tx, sample_rx) = sync_channel::<Sample>(1);
        let (command_tx, command_rx) = sync_channel::<Command>(1);
        drop(command_tx);

        let config = LoopConfig {
            cycles: u64::MAX,
            ..LoopConfig::default()
        };
        let recorder = TraceRecorder::for_cycles(config.cycles);
        let result = sensor::run_plant_thread(config, sample_tx, command_rx, recorder.clone());

        assert!(matches!(result, Err(LoopError::ChannelClosed)));
        assert!(recorder.is_empty());
        assert_eq!(sample_rx.try_recv().unwrap().cycle, 0);
    }

    #[test]
    fn plant_stops_when_sample_receiver_is_gone() {
        let (sample_tx, sample_rx) = sync_channel::<Sample>(1);
        let (_command_tx, command_rx) = sync_channel::<Command>(1);
        drop(sample_rx);

        let result = sensor::run_plant_thread(
            LoopConfig::default(),
            sample_tx,
            command_rx,
            TraceRecorder::new(),
        );

        assert!(matches!(result, Err(LoopError::ChannelClosed)));
    }

    #[test]
    fn panicking_worker_is_reported() {
        let handle = thread::spawn(|| -> u32 { panic!("worker failure") });
        assert!(matches!(
            join_worker(handle, "plant"),
            Err(LoopError::WorkerPanicked("plant"))
        ));

        let handle = thread::spawn(|| 7_u32);
        assert_eq!(join_worker(handle, "controller").unwrap(), 7);
    }
}
