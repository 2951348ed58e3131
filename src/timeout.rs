//! Response timeout for a signed request.
//!
//! The transport calls [`RequestTimer::start`] when it begins waiting for a
//! response, awaits the returned [`TimeoutWait`] alongside the response, and
//! calls [`RequestTimer::stop`] once the response arrives. A zero duration
//! disables the timer.

use std::time::Duration;
use tokio::sync::oneshot;

/// Start/stop countdown owned by the caller of the transport.
#[derive(Debug, Default)]
pub struct RequestTimer {
    duration: Duration,
    cancel: Option<oneshot::Sender<()>>,
}

/// What ended a [`TimeoutWait`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The countdown ran out.
    TimedOut,
    /// The timer was stopped first.
    Cancelled,
}

/// Future side of a running countdown.
#[derive(Debug)]
pub struct TimeoutWait {
    duration: Duration,
    cancelled: oneshot::Receiver<()>,
}

impl RequestTimer {
    /// Creates a stopped timer.
    pub fn new(duration: Duration) -> Self {
        RequestTimer {
            duration,
            cancel: None,
        }
    }

    /// Configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    /// Starts the countdown. Returns `None` when the duration is zero.
    ///
    /// Starting again cancels the previous countdown.
    pub fn start(&mut self) -> Option<TimeoutWait> {
        if self.duration.is_zero() {
            return None;
        }
        self.stop();
        let (tx, rx) = oneshot::channel();
        self.cancel = Some(tx);
        Some(TimeoutWait {
            duration: self.duration,
            cancelled: rx,
        })
    }

    /// Cancels the running countdown, if any.
    pub fn stop(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl TimeoutWait {
    /// Resolves when the countdown expires or the timer is stopped.
    pub async fn wait(self) -> TimerOutcome {
        let TimeoutWait {
            duration,
            cancelled,
        } = self;
        tokio::select! {
            _ = tokio::time::sleep(duration) => TimerOutcome::TimedOut,
            _ = cancelled => TimerOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_disables_timer() {
        let mut timer = RequestTimer::new(Duration::ZERO);
        assert!(timer.start().is_none());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn expires_without_response() {
        let mut timer = RequestTimer::new(Duration::from_secs(5));
        let wait = timer.start().unwrap();
        assert!(timer.is_running());
        assert_eq!(wait.wait().await, TimerOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_countdown() {
        let mut timer = RequestTimer::new(Duration::from_secs(5));
        let wait = timer.start().unwrap();
        let handle = tokio::spawn(wait.wait());
        tokio::time::sleep(Duration::from_secs(1)).await;
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(handle.await.unwrap(), TimerOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_cancels_previous_wait() {
        let mut timer = RequestTimer::new(Duration::from_millis(100));
        let first = timer.start().unwrap();
        let second = timer.start().unwrap();
        assert_eq!(first.wait().await, TimerOutcome::Cancelled);
        assert_eq!(second.wait().await, TimerOutcome::TimedOut);
    }
}
