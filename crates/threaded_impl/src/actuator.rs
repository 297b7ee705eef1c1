use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::Arc;

use common::{handle_sample, Command, PdController, Sample, SharedDiagnostics};

/// Controller worker. Owns its controller exclusively and exits once the
/// plant side hangs up.
pub fn run_controller_thread(
    mut pd: PdController,
    receiver: Receiver<Sample>,
    command_tx: SyncSender<Command>,
    diagnostics: Arc<SharedDiagnostics>,
) {
    log::debug!(
        "Controller thread started (kp={}, kd={}, u_min={:?}, u_max={:?})",
        pd.kp(),
        pd.kd(),
        pd.u_min(),
        pd.u_max()
    );

    while let Ok(sample) = receiver.recv() {
        let command = handle_sample(&mut pd, sample, &diagnostics);
        if command_tx.send(command).is_err() {
            break;
        }
    }

    log::debug!("Controller thread stopped");
}
