use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy)]
pub struct ProgressSettings {
    pub tick: Duration,
    pub step: u8,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        ProgressSettings {
            tick: Duration::from_millis(200),
            step: 10,
        }
    }
}

/// Simulated upload progress, owned by the screen that started it.
///
/// A background task raises the percentage by `step` every `tick` until it
/// reaches 100. Cancelling or dropping the handle stops the task; after that
/// no further value is published.
#[derive(Debug)]
pub struct UploadProgress {
    rx: watch::Receiver<u8>,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl UploadProgress {
    /// Start ticking. Must be called from within a tokio runtime.
    pub fn start(settings: ProgressSettings) -> Self {
        let (tx, rx) = watch::channel(0u8);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let step = settings.step.max(1);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(settings.tick);
            // First tick fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                let next = (*tx.borrow()).saturating_add(step).min(COMPLETE);
                if tx.send(next).is_err() {
                    break;
                }
                debug!(percent = next, "upload progress");
                if next >= COMPLETE {
                    break;
                }
            }
        });

        UploadProgress { rx, cancelled, task }
    }

    pub fn percent(&self) -> u8 {
        *self.rx.borrow()
    }

    pub fn is_complete(&self) -> bool {
        self.percent() >= COMPLETE
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// A receiver that observes every published percentage.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.rx.clone()
    }

    /// Wait until the upload reaches 100 or the task stops.
    pub async fn finished(&self) -> u8 {
        let mut rx = self.rx.clone();
        let reached = rx.wait_for(|p| *p >= COMPLETE).await.map(|p| *p);
        reached.unwrap_or_else(|_| *rx.borrow())
    }

    pub fn cancel(self) {
        // Drop does the work.
    }

    fn stop(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }
}

impl Drop for UploadProgress {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_in_ten_steps() {
        let progress = UploadProgress::start(ProgressSettings::default());
        let mut rx = progress.subscribe();
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let p = *rx.borrow_and_update();
            seen.push(p);
            if p >= COMPLETE {
                break;
            }
        }
        assert_eq!(seen, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(progress.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn finished_waits_for_hundred() {
        let start = tokio::time::Instant::now();
        let progress = UploadProgress::start(ProgressSettings::default());
        assert_eq!(progress.finished().await, 100);
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_updates() {
        let progress = UploadProgress::start(ProgressSettings::default());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(progress.percent(), 20);

        let rx = progress.subscribe();
        progress.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(*rx.borrow(), 20);
        assert!(rx.has_changed().is_err(), "sender should be gone after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn step_is_clamped_at_hundred() {
        let progress = UploadProgress::start(ProgressSettings {
            tick: Duration::from_millis(50),
            step: 30,
        });
        assert_eq!(progress.finished().await, 100);
    }
}
