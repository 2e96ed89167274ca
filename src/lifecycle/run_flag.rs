use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative stop signal shared by every role.
///
/// Starts out running and can be stopped exactly once. Loops poll
/// [`is_running`](RunFlag::is_running) at the top of each iteration, so a sleep
/// or transaction already in progress always finishes. Observers that only
/// wait (the dashboard) can await [`stopped`](RunFlag::stopped) instead.
#[derive(Debug, Clone)]
pub struct RunFlag {
    state: Arc<watch::Sender<bool>>,
}

impl RunFlag {
    pub fn new() -> Self {
        let (state, _) = watch::channel(true);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.state.borrow()
    }

    /// Requests shutdown. Returns `true` only for the call that flipped the flag.
    pub fn stop(&self) -> bool {
        self.state.send_if_modified(|running| std::mem::replace(running, false))
    }

    /// Resolves once the flag has been stopped.
    pub async fn stopped(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = receiver.wait_for(|running| !*running).await;
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stop_is_idempotent() {
        let flag = RunFlag::new();
        let observer = flag.clone();
        assert!(observer.is_running());

        assert!(flag.stop());
        assert!(!flag.stop());
        assert!(!observer.is_running());
    }

    #[tokio::test]
    async fn test_stopped_wakes_waiters() {
        let flag = RunFlag::new();
        let waiter = tokio::spawn({
            let flag = flag.clone();
            async move { flag.stopped().await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        flag.stop();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke up")
            .expect("waiter task");
    }

    #[tokio::test]
    async fn test_stopped_returns_immediately_when_already_stopped() {
        let flag = RunFlag::new();
        flag.stop();
        flag.stopped().await;
    }
}
