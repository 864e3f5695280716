//! Countdown timer controller
//!
//! Independent 1 Hz countdown used for timed presentation segments. Start
//! and stop are the only external transitions; reaching zero stops the
//! timer autonomously.

use crate::errors::SessionError;
use crate::types::TimerState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

struct TimerInner {
    remaining: u32,
    running: bool,
    /// Bumped on every start and stop so a tick task from a previous run
    /// can never mutate state after being superseded.
    epoch: u64,
}

struct Shared {
    inner: Mutex<TimerInner>,
    state_tx: watch::Sender<TimerState>,
}

/// Countdown timer with start/stop semantics
///
/// While running, exactly one decrement per elapsed second until the
/// countdown reaches zero, at which point the timer stops itself.
pub struct CountdownTimer {
    shared: Arc<Shared>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(TimerState::default());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(TimerInner {
                    remaining: 0,
                    running: false,
                    epoch: 0,
                }),
                state_tx,
            }),
        }
    }

    /// Set the countdown duration. Rejected while the timer is running.
    pub fn set_duration(&self, total_secs: u32) -> Result<(), SessionError> {
        let mut inner = self.shared.inner.lock().expect("lock poisoned");
        if inner.running {
            return Err(SessionError::InvalidState(
                "cannot set duration while timer is running".to_string(),
            ));
        }
        inner.remaining = total_secs;
        let _ = self.shared.state_tx.send(TimerState::stopped(total_secs));
        Ok(())
    }

    /// Start the countdown and spawn the 1 Hz tick task.
    ///
    /// Fails when the countdown is at zero or already running.
    pub fn start(&self) -> Result<(), SessionError> {
        let mut inner = self.shared.inner.lock().expect("lock poisoned");
        if inner.running {
            return Err(SessionError::InvalidState(
                "timer is already running".to_string(),
            ));
        }
        if inner.remaining == 0 {
            return Err(SessionError::InvalidState(
                "cannot start a timer with no time remaining".to_string(),
            ));
        }

        inner.running = true;
        inner.epoch += 1;
        let my_epoch = inner.epoch;
        let _ = self.shared.state_tx.send(TimerState {
            remaining_secs: inner.remaining,
            running: true,
        });
        log::info!("Timer started with {} seconds remaining", inner.remaining);
        drop(inner);

        let shared = self.shared.clone();
        tokio::spawn(async move {
            tick_loop(shared, my_epoch).await;
        });
        Ok(())
    }

    /// Stop the countdown. Idempotent; stopping a stopped timer is a no-op.
    pub fn stop(&self) {
        let mut inner = self.shared.inner.lock().expect("lock poisoned");
        if !inner.running {
            return;
        }
        inner.running = false;
        inner.epoch += 1;
        let _ = self.shared.state_tx.send(TimerState::stopped(inner.remaining));
        log::info!("Timer stopped with {} seconds remaining", inner.remaining);
    }

    pub fn state(&self) -> TimerState {
        let inner = self.shared.inner.lock().expect("lock poisoned");
        TimerState {
            remaining_secs: inner.remaining,
            running: inner.running,
        }
    }

    /// Subscribe to state changes. The rendering layer is a pure consumer.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

async fn tick_loop(shared: Arc<Shared>, my_epoch: u64) {
    // First tick a full second after start; tokio's default interval would
    // fire immediately.
    let start = tokio::time::Instant::now() + Duration::from_secs(1);
    let mut interval = tokio::time::interval_at(start, Duration::from_secs(1));

    loop {
        interval.tick().await;

        let mut inner = shared.inner.lock().expect("lock poisoned");
        if !inner.running || inner.epoch != my_epoch {
            break;
        }

        inner.remaining = inner.remaining.saturating_sub(1);
        if inner.remaining == 0 {
            // The only self-initiated transition.
            inner.running = false;
            log::info!("Timer reached zero");
        }
        let _ = shared.state_tx.send(TimerState {
            remaining_secs: inner.remaining,
            running: inner.running,
        });
        if !inner.running {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_at_zero_fails() {
        let timer = CountdownTimer::new();
        timer.set_duration(0).unwrap();
        let result = timer.start();
        assert!(matches!(result, Err(SessionError::InvalidState(_))));
        assert!(!timer.state().running);
    }

    #[tokio::test]
    async fn test_set_duration_while_running_fails() {
        let timer = CountdownTimer::new();
        timer.set_duration(60).unwrap();
        timer.start().unwrap();

        let result = timer.set_duration(10);
        assert!(matches!(result, Err(SessionError::InvalidState(_))));
        assert_eq!(timer.state().remaining_secs, 60);
    }

    #[tokio::test]
    async fn test_double_start_fails() {
        let timer = CountdownTimer::new();
        timer.set_duration(60).unwrap();
        timer.start().unwrap();
        assert!(matches!(
            timer.start(),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let timer = CountdownTimer::new();
        timer.set_duration(60).unwrap();
        timer.stop();
        timer.start().unwrap();
        timer.stop();
        timer.stop();
        assert!(!timer.state().running);
        assert_eq!(timer.state().remaining_secs, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_decrements_once_per_second() {
        let timer = CountdownTimer::new();
        timer.set_duration(5).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let state = timer.state();
        assert_eq!(state.remaining_secs, 3);
        assert!(state.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reaches_zero_and_stops() {
        let timer = CountdownTimer::new();
        timer.set_duration(5).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(5500)).await;
        let state = timer.state();
        assert_eq!(state.remaining_secs, 0);
        assert!(!state.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_countdown() {
        let timer = CountdownTimer::new();
        timer.set_duration(5).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        timer.stop();
        assert_eq!(timer.state().remaining_secs, 3);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(timer.state().remaining_secs, 3);
        assert!(!timer.state().running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop_ticks_once_per_second() {
        let timer = CountdownTimer::new();
        timer.set_duration(5).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        timer.stop();
        assert_eq!(timer.state().remaining_secs, 4);

        // A stale tick task from the first run must not double-fire here.
        timer.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(timer.state().remaining_secs, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_after_completion_fails_until_reset() {
        let timer = CountdownTimer::new();
        timer.set_duration(1).unwrap();
        timer.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(matches!(
            timer.start(),
            Err(SessionError::InvalidState(_))
        ));

        timer.set_duration(2).unwrap();
        timer.start().unwrap();
        assert!(timer.state().running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_observes_final_state() {
        let timer = CountdownTimer::new();
        let rx = timer.subscribe();
        timer.set_duration(2).unwrap();
        timer.start().unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let state = *rx.borrow();
        assert_eq!(state.remaining_secs, 0);
        assert!(!state.running);
    }
}
