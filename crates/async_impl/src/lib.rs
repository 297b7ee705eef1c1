//! Demo closed loop around `common::PdController` on tokio tasks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use common::{ControllerConfig, LoopConfig, LoopError, LoopOutcome, SharedDiagnostics, TraceRecorder};

pub mod actuator;
pub mod sensor;

/// Runs the closed loop as two tokio tasks. Produces the same trace as
/// `threaded_impl::run_closed_loop` for the same configuration.
pub async fn run_closed_loop(
    controller: ControllerConfig,
    config: LoopConfig,
) -> Result<LoopOutcome, LoopError> {
    log::info!(
        "Async loop: {} cycles, reference {:.3}",
        config.cycles,
        config.reference
    );

    let recorder = TraceRecorder::for_cycles(config.cycles);
    let diagnostics = Arc::new(SharedDiagnostics::default());

    let (sample_tx, sample_rx) = mpsc::channel(1);
    let (command_tx, command_rx) = mpsc::channel(1);

    let controller_task = tokio::spawn(actuator::run_controller_task(
        controller.build(),
        sample_rx,
        command_tx,
        Arc::clone(&diagnostics),
    ));
    let plant_task = tokio::spawn(sensor::run_plant_task(
        config,
        sample_tx,
        command_rx,
        recorder.clone(),
    ));

    let plant_result = join_task(plant_task, "plant").await?;
    join_task(controller_task, "controller").await?;
    plant_result?;

    let outcome = LoopOutcome {
        trace: recorder,
        diagnostics: diagnostics.snapshot(),
    };
    log::info!("Async loop finished: {}", outcome.summary());

    Ok(outcome)
}

async fn join_task<T>(handle: JoinHandle<T>, name: &'static str) -> Result<T, LoopError> {
    handle.await.map_err(|e| {
        if e.is_panic() {
            log::error!("{} task panicked", name);
            LoopError::WorkerPanicked(name)
        } else {
            LoopError::Join(e.to_string())
        }
    })
}
