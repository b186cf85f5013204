//! Debounce utility for coalescing bursts of writes.
//!
//! The debouncer holds at most one pending value. Every new value replaces
//! the pending one and restarts the timer; when the timer expires with no
//! newer value, the handler runs once with the latest value.
//!
//! # Architecture
//!
//! A background task owns the pending slot and the timer. Callers talk to it
//! over a channel:
//!
//! 1. A scheduled value replaces any pending value and resets the deadline
//! 2. When the deadline passes, the handler runs on the blocking pool
//! 3. A flush request runs the handler immediately and acknowledges once the
//!    handler has returned
//!
//! Dropping the debouncer closes the channel, which flushes the pending value.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use tickler_core::utils::debounce::Debouncer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let written = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&written);
//!     let debouncer = Debouncer::new(Duration::from_millis(100), move |value: u32| {
//!         sink.lock().unwrap().push(value);
//!     });
//!
//!     debouncer.try_send(1);
//!     debouncer.try_send(2);
//!     debouncer.try_send(3);
//!
//!     debouncer.flush().await.unwrap();
//!     assert_eq!(*written.lock().unwrap(), vec![3]);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Error type for debouncer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebouncerError {
    /// The debouncer's background task has stopped.
    ChannelClosed,
}

impl std::fmt::Display for DebouncerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelClosed => write!(f, "debouncer channel closed"),
        }
    }
}

impl std::error::Error for DebouncerError {}

/// Requests sent to the background task.
enum Command<V> {
    /// Replace the pending value and restart the timer.
    Schedule(V),
    /// Run the handler now for any pending value, then acknowledge.
    Flush(oneshot::Sender<()>),
}

/// The single value waiting for its timer to expire.
#[derive(Debug)]
struct PendingValue<V> {
    value: V,
    deadline: Instant,
}

/// A trailing-edge debouncer with one pending slot.
///
/// # Thread Safety
///
/// Scheduling is non-blocking and may be called from synchronous code, but
/// the debouncer must be created inside a Tokio runtime because it spawns its
/// background task there.
#[derive(Debug)]
pub struct Debouncer<V>
where
    V: Send + 'static,
{
    input_tx: mpsc::UnboundedSender<Command<V>>,
    interval: Duration,
}

impl<V> Debouncer<V>
where
    V: Send + 'static,
{
    /// Creates a new debouncer that calls `handler` with the latest value
    /// once `interval` has passed without a newer one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new<F>(interval: Duration, handler: F) -> Self
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let handler = Arc::new(handler);

        // Detached: the loop ends on its own once every sender is dropped
        tokio::spawn(run_debounce_loop(interval, input_rx, handler));

        Self { input_tx, interval }
    }

    /// Returns the debounce interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedules `value`, replacing any pending value and restarting the timer.
    ///
    /// # Returns
    ///
    /// `true` if the value was handed to the background task, `false` if the
    /// task has stopped.
    pub fn try_send(&self, value: V) -> bool {
        self.input_tx.send(Command::Schedule(value)).is_ok()
    }

    /// Runs the handler for the pending value right away, if there is one.
    ///
    /// Returns once the handler has finished, so callers observe the effect
    /// of the write when this resolves.
    ///
    /// # Errors
    ///
    /// Returns `DebouncerError::ChannelClosed` if the background task has
    /// terminated.
    pub async fn flush(&self) -> Result<(), DebouncerError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.input_tx
            .send(Command::Flush(ack_tx))
            .map_err(|_| DebouncerError::ChannelClosed)?;
        ack_rx.await.map_err(|_| DebouncerError::ChannelClosed)
    }
}

/// Runs the debounce loop until the input channel closes.
async fn run_debounce_loop<V, F>(
    interval: Duration,
    mut input_rx: mpsc::UnboundedReceiver<Command<V>>,
    handler: Arc<F>,
) where
    V: Send + 'static,
    F: Fn(V) + Send + Sync + 'static,
{
    let mut pending: Option<PendingValue<V>> = None;

    debug!(interval_ms = interval.as_millis(), "Starting debounce loop");

    loop {
        let next_deadline = pending.as_ref().map(|p| p.deadline);

        tokio::select! {
            command = input_rx.recv() => {
                match command {
                    Some(Command::Schedule(value)) => {
                        if pending.is_some() {
                            trace!("Superseding pending value");
                        }
                        let deadline = Instant::now() + interval;
                        pending = Some(PendingValue { value, deadline });
                    }
                    Some(Command::Flush(ack)) => {
                        trace!(pending = pending.is_some(), "Flush requested");
                        emit(pending.take(), &handler).await;
                        let _ = ack.send(());
                    }
                    None => {
                        debug!("Input channel closed, flushing pending value");
                        emit(pending.take(), &handler).await;
                        break;
                    }
                }
            }

            _ = sleep_until_deadline(next_deadline) => {
                emit(pending.take(), &handler).await;
            }
        }
    }

    debug!("Debounce loop terminated");
}

/// Sleeps until `deadline`, or forever when nothing is pending.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Runs the handler for a pending value on the blocking pool.
async fn emit<V, F>(pending: Option<PendingValue<V>>, handler: &Arc<F>)
where
    V: Send + 'static,
    F: Fn(V) + Send + Sync + 'static,
{
    let Some(PendingValue { value, .. }) = pending else {
        return;
    };

    trace!("Emitting debounced value");
    let handler = Arc::clone(handler);
    if let Err(e) = tokio::task::spawn_blocking(move || handler(value)).await {
        warn!(error = %e, "Debounced handler failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::{sleep, timeout};

    /// Helper to create a debouncer that records every emitted value.
    fn recording_debouncer(interval_ms: u64) -> (Debouncer<i32>, Arc<Mutex<Vec<i32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(Duration::from_millis(interval_ms), move |v| {
            sink.lock().unwrap().push(v);
        });
        (debouncer, seen)
    }

    fn snapshot(seen: &Arc<Mutex<Vec<i32>>>) -> Vec<i32> {
        seen.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_single_value_emitted_after_interval() {
        let (debouncer, seen) = recording_debouncer(50);

        assert!(debouncer.try_send(42));

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![42]);
    }

    #[tokio::test]
    async fn test_burst_coalesced_to_last_value() {
        let (debouncer, seen) = recording_debouncer(50);

        debouncer.try_send(1);
        debouncer.try_send(2);
        debouncer.try_send(3);

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![3], "Should emit only the last value");

        // No more values should come
        sleep(Duration::from_millis(100)).await;
        assert_eq!(snapshot(&seen), vec![3]);
    }

    #[tokio::test]
    async fn test_value_not_emitted_before_interval() {
        let (debouncer, seen) = recording_debouncer(100);

        debouncer.try_send(42);

        sleep(Duration::from_millis(40)).await;
        assert!(snapshot(&seen).is_empty(), "Should not emit before interval");

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![42]);
    }

    #[tokio::test]
    async fn test_timer_reset_on_new_value() {
        let (debouncer, seen) = recording_debouncer(100);

        debouncer.try_send(1);
        sleep(Duration::from_millis(50)).await;

        // Resets the timer
        debouncer.try_send(2);
        sleep(Duration::from_millis(50)).await;

        debouncer.try_send(3);
        sleep(Duration::from_millis(50)).await;

        // 150ms after the first value, but only 50ms after the last
        assert!(snapshot(&seen).is_empty());

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![3]);
    }

    #[tokio::test]
    async fn test_sequential_values_with_delay() {
        let (debouncer, seen) = recording_debouncer(30);

        debouncer.try_send(1);
        sleep(Duration::from_millis(100)).await;

        debouncer.try_send(2);
        sleep(Duration::from_millis(100)).await;

        assert_eq!(snapshot(&seen), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_flush_runs_pending_value_immediately() {
        let (debouncer, seen) = recording_debouncer(10_000);

        debouncer.try_send(7);
        debouncer.try_send(8);

        let flushed = timeout(Duration::from_millis(500), debouncer.flush()).await;
        assert!(matches!(flushed, Ok(Ok(()))));
        assert_eq!(snapshot(&seen), vec![8]);
    }

    #[tokio::test]
    async fn test_flush_with_nothing_pending_is_noop() {
        let (debouncer, seen) = recording_debouncer(50);

        debouncer.flush().await.unwrap();
        assert!(snapshot(&seen).is_empty());
    }

    #[tokio::test]
    async fn test_flush_cancels_timer() {
        let (debouncer, seen) = recording_debouncer(50);

        debouncer.try_send(5);
        debouncer.flush().await.unwrap();

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![5], "Flushed value must not be written twice");
    }

    #[tokio::test]
    async fn test_flush_on_drop() {
        let (debouncer, seen) = recording_debouncer(10_000);

        debouncer.try_send(42);
        drop(debouncer);

        sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshot(&seen), vec![42], "Pending value should be flushed on close");
    }

    #[tokio::test]
    async fn test_high_frequency_values() {
        let (debouncer, seen) = recording_debouncer(50);

        for i in 0..1_000 {
            debouncer.try_send(i);
        }

        sleep(Duration::from_millis(200)).await;
        assert_eq!(snapshot(&seen), vec![999]);
    }

    #[tokio::test]
    async fn test_zero_interval_emits_quickly() {
        let (debouncer, seen) = recording_debouncer(0);

        debouncer.try_send(42);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(snapshot(&seen), vec![42]);
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_stop_loop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(Duration::from_millis(10), move |v: i32| {
            if v == 0 {
                panic!("boom");
            }
            sink.lock().unwrap().push(v);
        });

        debouncer.try_send(0);
        debouncer.flush().await.unwrap();

        debouncer.try_send(1);
        debouncer.flush().await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_debouncer_error_display() {
        let error = DebouncerError::ChannelClosed;
        assert_eq!(error.to_string(), "debouncer channel closed");
    }

    #[test]
    fn test_debouncer_error_is_error_trait() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<DebouncerError>();
    }
}
