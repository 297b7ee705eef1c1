use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use common::{apply_command, Command, FirstOrderPlant, LoopConfig, LoopError, Sample, TraceRecorder};

pub async fn run_plant_task(
    config: LoopConfig,
    sender: mpsc::Sender<Sample>,
    mut command_rx: mpsc::Receiver<Command>,
    recorder: TraceRecorder,
) -> Result<(), LoopError> {
    let mut plant = FirstOrderPlant::new(config.initial_measured, config.plant_gain);
    let period = Duration::from_millis(config.period_ms);
    let mut next_tick = Instant::now();

    for cycle in 0..config.cycles {
        if !period.is_zero() {
            tokio::time::sleep_until(next_tick).await;
            next_tick += period;
        }

        let sample = Sample {
            cycle,
            reference: config.reference,
            measured: plant.measured(),
        };

        sender
            .send(sample)
            .await
            .map_err(|_| LoopError::ChannelClosed)?;
        let command = command_rx.recv().await.ok_or(LoopError::ChannelClosed)?;

        apply_command(&mut plant, sample, command, &recorder);
    }

    Ok(())
}
