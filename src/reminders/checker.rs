use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time;

use crate::app::AppEvent;

/// Repeating due-status check. The task only emits ticks; the event loop
/// owns the store and does the actual evaluation, so all state stays on one
/// logical thread.
pub struct DueChecker {
    handle: Option<JoinHandle<()>>,
}

impl DueChecker {
    /// Spawn the ticker. Any previously running ticker is aborted first so
    /// at most one is ever active.
    pub fn start(tx: UnboundedSender<AppEvent>, interval: Duration) -> Self {
        let mut checker = Self { handle: None };
        checker.restart(tx, interval);
        checker
    }

    pub fn restart(&mut self, tx: UnboundedSender<AppEvent>, interval: Duration) {
        self.stop();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // The first tick fires immediately; skip it so startup doesn't
            // double-evaluate what the UI already rendered.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::DueTick).is_err() {
                    break;
                }
            }
        });
        self.handle = Some(handle);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for DueChecker {
    fn drop(&mut self) {
        self.stop();
    }
}
