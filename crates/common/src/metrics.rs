use std::io;
use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CycleRecord {
    pub cycle: u64,
    pub reference: f64,
    pub measured: f64,
    pub error: f64,
    pub output: f64,
    pub saturated: bool,
}

/// Upper limit on records reserved up front; longer runs grow the buffer.
pub const MAX_PREALLOCATED_RECORDS: usize = 65_536;

/// Thread-safe trace of a control loop.
/// Clones share the same underlying buffer.
#[derive(Clone)]
pub struct TraceRecorder {
    results: Arc<Mutex<Vec<CycleRecord>>>,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::with_capacity(1_024)
    }

    /// Reserves at most [`MAX_PREALLOCATED_RECORDS`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::with_capacity(
                capacity.min(MAX_PREALLOCATED_RECORDS),
            ))),
        }
    }

    /// Recorder sized for a run of `cycles` cycles.
    pub fn for_cycles(cycles: u64) -> Self {
        Self::with_capacity(usize::try_from(cycles).unwrap_or(usize::MAX))
    }

    pub fn capacity(&self) -> usize {
        self.results.lock().map(|r| r.capacity()).unwrap_or(0)
    }

    pub fn record(&self, record: CycleRecord) {
        if let Ok(mut data) = self.results.lock() {
            data.push(record);
        }
    }

    pub fn get_results(&self) -> Vec<CycleRecord> {
        self.results.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.results.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracking error left after the last recorded command was applied.
    pub fn final_error(&self) -> Option<f64> {
        self.results
            .lock()
            .ok()
            .and_then(|r| r.last().map(|c| c.reference - c.measured))
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let data = self.get_results();
        let mut wtr = csv::Writer::from_writer(writer);
        for record in data.iter() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        log::debug!("Wrote {} trace records", data.len());
        Ok(())
    }
}
