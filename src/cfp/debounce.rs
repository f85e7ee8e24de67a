use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs only the most recently scheduled job, once `delay` has passed
/// without another `schedule` call. Dropping the debouncer cancels the
/// pending job.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Cancel whatever is pending and schedule `job`. The job may block, so
    /// it runs on the blocking pool. Outside a tokio runtime there is no
    /// timer to wait on, so `job` runs immediately.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        match Handle::try_current() {
            Ok(handle) => {
                let delay = self.delay;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Err(e) = tokio::task::spawn_blocking(job).await {
                        log::error!("Debounced job panicked: {}", e);
                    }
                }));
            }
            Err(_) => {
                log::debug!("No async runtime; running debounced job inline");
                job();
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the pending job, if any, to run.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("Debounced job failed: {}", e);
                }
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
