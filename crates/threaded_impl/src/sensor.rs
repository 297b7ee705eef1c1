use std::sync::mpsc::{Receiver, SyncSender};
use std::thread;
use std::time::{Duration, Instant};

use common::{apply_command, Command, FirstOrderPlant, LoopConfig, LoopError, Sample, TraceRecorder};

/// Plant side of the loop: publishes one sample per cycle and applies the
/// controller's reply before the next one.
pub fn run_plant_thread(
    config: LoopConfig,
    sender: SyncSender<Sample>,
    command_rx: Receiver<Command>,
    recorder: TraceRecorder,
) -> Result<(), LoopError> {
    let mut plant = FirstOrderPlant::new(config.initial_measured, config.plant_gain);
    let period = Duration::from_millis(config.period_ms);
    let mut next_tick = Instant::now();

    for cycle in 0..config.cycles {
        if !period.is_zero() {
            let expected = next_tick;
            next_tick += period;

            let now = Instant::now();
            if now < expected {
                thread::sleep(expected - now);
            }
        }

        let sample = Sample {
            cycle,
            reference: config.reference,
            measured: plant.measured(),
        };

        sender.send(sample).map_err(|_| LoopError::ChannelClosed)?;
        let command = command_rx.recv().map_err(|_| LoopError::ChannelClosed)?;

        apply_command(&mut plant, sample, command, &recorder);
    }

    Ok(())
}
