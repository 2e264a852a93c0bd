//! Background completion generation.
//!
//! One dedicated thread runs the configured source off the key-handling
//! path. Every submission bumps an atomic generation; queued work is
//! drained to the latest item and stale generations are dropped both
//! before and after the source runs. `receive_completions` re-validates
//! against the live document, so a response for an outdated cursor state
//! is never rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::warn;

use exprline_core::complete::{Complete, CompletionContext, CompletionResult};
use exprline_core::settings::settings;

struct CompletionWork {
    complete: Arc<dyn Complete>,
    ctx: CompletionContext,
    generation: u64,
}

/// Result of one background request, tagged with the document snapshot it
/// was produced for.
pub struct CompletionOutcome {
    pub text: String,
    pub pos: usize,
    pub result: Option<CompletionResult>,
}

pub struct CompletionWorker {
    tx: mpsc::Sender<CompletionWork>,
    rx: Mutex<mpsc::Receiver<CompletionOutcome>>,
    generation: Arc<AtomicU64>,
}

impl CompletionWorker {
    pub fn new() -> Self {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<CompletionWork>();
        let (result_tx, result_rx) = mpsc::channel::<CompletionOutcome>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("exprline-completions".into())
                .spawn(move || completion_worker(work_rx, result_tx, generation))
                .expect("failed to spawn completion worker");
        }
        Self {
            tx: work_tx,
            rx: Mutex::new(result_rx),
            generation,
        }
    }

    /// Queue a request against the source current at submission time. A
    /// reconfigure while it is in flight does not retract it; the next
    /// keystroke re-requests.
    pub fn submit(&self, complete: Arc<dyn Complete>, ctx: CompletionContext) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.tx.send(CompletionWork {
            complete,
            ctx,
            generation,
        });
    }

    /// Mark all in-flight work stale without queueing anything new.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn try_recv(&self) -> Option<CompletionOutcome> {
        let rx = self.rx.lock().ok()?;
        rx.try_recv().ok()
    }
}

impl Default for CompletionWorker {
    fn default() -> Self {
        Self::new()
    }
}

fn completion_worker(
    rx: mpsc::Receiver<CompletionWork>,
    tx: mpsc::Sender<CompletionOutcome>,
    generation: Arc<AtomicU64>,
) {
    while let Ok(work) = rx.recv() {
        // Drain: if multiple work items queued, skip to latest
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        // Let a burst of keystrokes settle into one request.
        let debounce = settings().completion.debounce_ms;
        if debounce > 0 {
            thread::sleep(Duration::from_millis(debounce));
            while let Ok(newer) = rx.try_recv() {
                latest = newer;
            }
        }

        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }

        let result = match latest.complete.complete(&latest.ctx) {
            Ok(result) => result,
            Err(err) => {
                // No suggestions this time; the next keystroke retries.
                warn!(error = %err, "completion request failed");
                None
            }
        };

        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }

        let _ = tx.send(CompletionOutcome {
            text: latest.ctx.text().to_string(),
            pos: latest.ctx.pos(),
            result,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_outdates_pending_generations() {
        let generation = Arc::new(AtomicU64::new(0));
        assert_eq!(generation.load(Ordering::SeqCst), 0);
        generation.fetch_add(1, Ordering::SeqCst);
        // Work stamped with generation 0 is now stale.
        assert_ne!(0u64, generation.load(Ordering::SeqCst));
    }
}
