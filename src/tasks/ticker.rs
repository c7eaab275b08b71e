//! Periodic tick task for a running countdown

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Delay before the first tick and between subsequent ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Something that consumes ticks from a ticker of a given generation
pub trait TickTarget: Send + Sync {
    /// Handle one tick. Returns false when this ticker should stop.
    fn on_tick(&self, generation: u64) -> bool;
}

/// Background task that ticks `target` every [`TICK_PERIOD`].
///
/// Ends when the target is dropped or declines a tick.
pub async fn ticker_task<T: TickTarget>(target: Weak<T>, generation: u64) {
    debug!("Starting ticker generation {}", generation);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        interval.tick().await;

        let Some(target) = target.upgrade() else {
            debug!("Tick target dropped, ticker generation {} exiting", generation);
            break;
        };

        if !target.on_tick(generation) {
            debug!("Ticker generation {} finished", generation);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    struct Counter {
        ticks: AtomicU64,
        limit: u64,
    }

    impl TickTarget for Counter {
        fn on_tick(&self, _generation: u64) -> bool {
            self.ticks.fetch_add(1, Ordering::SeqCst) + 1 < self.limit
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let counter = Arc::new(Counter {
            ticks: AtomicU64::new(0),
            limit: u64::MAX,
        });
        let handle = tokio::spawn(ticker_task(Arc::downgrade(&counter), 1));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 3);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_declined() {
        let counter = Arc::new(Counter {
            ticks: AtomicU64::new(0),
            limit: 2,
        });
        let handle = tokio::spawn(ticker_task(Arc::downgrade(&counter), 1));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 2);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_target_dropped() {
        let counter = Arc::new(Counter {
            ticks: AtomicU64::new(0),
            limit: u64::MAX,
        });
        let handle = tokio::spawn(ticker_task(Arc::downgrade(&counter), 1));
        drop(counter);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(handle.is_finished());
    }
}
