//! Last-write-wins delay for values that change in bursts.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

/// Forwards a pushed value to `on_settle` once no newer value arrived for `delay`.
///
/// Pushing re-arms the timer and drops the previously pending value. Dropping
/// the debouncer cancels whatever is still pending.
pub struct Debouncer<T> {
    delay: Duration,
    on_settle: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, on_settle: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            on_settle: Arc::new(on_settle),
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let delay = self.delay;
        let on_settle = Arc::clone(&self.on_settle);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_settle(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
