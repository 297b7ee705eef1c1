use std::sync::Arc;

use tokio::sync::mpsc;

use common::{handle_sample, Command, PdController, Sample, SharedDiagnostics};

/// Controller task. The controller lives inside the task and is never shared.
pub async fn run_controller_task(
    mut pd: PdController,
    mut receiver: mpsc::Receiver<Sample>,
    command_tx: mpsc::Sender<Command>,
    diagnostics: Arc<SharedDiagnostics>,
) {
    log::debug!("Controller task started (kp={}, kd={})", pd.kp(), pd.kd());

    while let Some(sample) = receiver.recv().await {
        let command = handle_sample(&mut pd, sample, &diagnostics);
        if command_tx.send(command).await.is_err() {
            break;
        }
    }

    log::debug!("Controller task stopped");
}
