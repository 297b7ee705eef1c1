use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct SharedDiagnostics {
    pub saturated_outputs: AtomicU64,
    pub rejected_samples: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub saturated_outputs: u64,
    pub rejected_samples: u64,
}

impl SharedDiagnostics {
    pub fn record_saturation(&self) {
        self.saturated_outputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            saturated_outputs: self.saturated_outputs.load(Ordering::Relaxed),
            rejected_samples: self.rejected_samples.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counters_accumulate_across_threads() {
        let diagnostics = Arc::new(SharedDiagnostics::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let diagnostics = Arc::clone(&diagnostics);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        diagnostics.record_saturation();
                    }
                    diagnostics.record_rejection();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            diagnostics.snapshot(),
            DiagnosticsSnapshot {
                saturated_outputs: 40,
                rejected_samples: 4,
            }
        );
    }
}
