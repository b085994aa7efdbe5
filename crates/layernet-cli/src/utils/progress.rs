use layernet::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct PhaseLog {
    current: Option<(&'static str, Instant)>,
    details: Vec<String>,
    lines: Vec<String>,
}

impl PhaseLog {
    fn finish(&mut self) {
        let Some((name, started)) = self.current.take() else {
            return;
        };
        let elapsed = started.elapsed();
        info!(phase = name, elapsed_us = elapsed.as_micros() as u64, "Phase finished.");
        let details = std::mem::take(&mut self.details);
        self.lines.push(finish_line(name, elapsed, &details));
    }
}

fn finish_line(name: &str, elapsed: Duration, details: &[String]) -> String {
    let mut line = format!("✓ {} ({:.1?})", name, elapsed);
    if !details.is_empty() {
        line.push_str(": ");
        line.push_str(&details.join("; "));
    }
    line
}

/// Mirrors workflow progress into the log and keeps one summary line per
/// finished phase.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    log: Arc<Mutex<PhaseLog>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let log = self.log.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut log) = log.lock() else {
                warn!("Progress log mutex was poisoned. Cannot record progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    debug!(phase = name, "Phase started.");
                    log.finish();
                    log.current = Some((name, Instant::now()));
                }
                Progress::PhaseFinish => {
                    log.finish();
                }
                Progress::Message(msg) => {
                    info!("{}", msg);
                    log.details.push(msg);
                }
            }
        })
    }

    /// Summary lines of the phases finished so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.log
            .lock()
            .map(|log| log.lines.clone())
            .unwrap_or_default()
    }
}
