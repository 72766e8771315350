//! Owned repeating refresh timer

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Work run on every tick
pub type RefreshCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Selectable refresh intervals, in milliseconds; 0 is off
pub const REFRESH_CHOICES: [(u64, &str); 4] = [(0, "Off"), (15_000, "15s"), (30_000, "30s"), (60_000, "60s")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Schedule {
    interval: Duration,
    enabled: bool,
}

impl Schedule {
    fn is_active(&self) -> bool {
        self.enabled && !self.interval.is_zero()
    }
}

/// Invokes the latest callback on a fixed repeating timer.
///
/// Swapping the callback never resets the timer; the timer is only recreated
/// when the interval or the enabled flag change, and stops when dropped.
pub struct AutoRefresh {
    callback: Arc<RwLock<Option<RefreshCallback>>>,
    schedule: Option<Schedule>,
    task: Option<JoinHandle<()>>,
}

impl Default for AutoRefresh {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoRefresh {
    pub fn new() -> Self {
        Self {
            callback: Arc::new(RwLock::new(None)),
            schedule: None,
            task: None,
        }
    }

    pub fn set_callback(&self, callback: RefreshCallback) {
        let mut slot = self.callback.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(callback);
    }

    /// Apply an interval and enabled flag; returns whether the timer restarted
    pub fn configure(&mut self, interval: Duration, enabled: bool) -> bool {
        let next = Schedule { interval, enabled };
        if self.schedule == Some(next) {
            return false;
        }

        self.stop();
        self.schedule = Some(next);

        if next.is_active() {
            self.task = Some(self.spawn_timer(interval));
            debug!("Auto-refresh running every {:?}", interval);
        } else {
            debug!("Auto-refresh disabled");
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.schedule.filter(Schedule::is_active).map(|s| s.interval)
    }

    /// Stop the timer and forget the schedule
    pub fn stop(&mut self) {
        self.schedule = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_timer(&self, period: Duration) -> JoinHandle<()> {
        let callback = self.callback.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let current = callback
                    .read()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                if let Some(current) = current {
                    tokio::spawn(current());
                }
            }
        })
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: Arc<AtomicUsize>, step: usize) -> RefreshCallback {
        Arc::new(move || {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(step, Ordering::SeqCst);
            })
        })
    }

    async fn advance(duration: Duration) {
        tokio::time::advance(duration).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut refresh = AutoRefresh::new();
        refresh.set_callback(counting(counter.clone(), 1));
        assert!(refresh.configure(Duration::from_secs(15), true));

        advance(Duration::from_secs(14)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        advance(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        advance(Duration::from_secs(15)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_swap_keeps_timer() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut refresh = AutoRefresh::new();
        refresh.set_callback(counting(counter.clone(), 1));
        refresh.configure(Duration::from_secs(10), true);

        advance(Duration::from_secs(6)).await;
        refresh.set_callback(counting(counter.clone(), 100));
        assert!(!refresh.configure(Duration::from_secs(10), true));

        advance(Duration::from_secs(4)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_and_drop_stop_timer() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut refresh = AutoRefresh::new();
        refresh.set_callback(counting(counter.clone(), 1));

        refresh.configure(Duration::from_secs(5), true);
        assert!(refresh.is_running());
        refresh.configure(Duration::from_secs(5), false);
        assert!(refresh.interval().is_none());
        advance(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        refresh.configure(Duration::ZERO, true);
        advance(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        refresh.configure(Duration::from_secs(5), true);
        refresh.stop();
        assert!(refresh.interval().is_none());
        assert!(!refresh.is_running());
        advance(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        // A stopped timer starts again with the same schedule
        assert!(refresh.configure(Duration::from_secs(5), true));
        drop(refresh);
        advance(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
