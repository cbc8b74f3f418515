// Run completion polling. A run is polled one status request at a time
// until the service reports a terminal status; between requests the
// process sleeps. The default policy is a fixed one second delay with no
// deadline.

use crate::api::AssistantService;
use crate::error::SessionError;
use crate::types::{Run, RunStatus, ThreadMessage};
use std::time::Duration;

/// Where a run stands from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Succeeded,
    Failed,
}

impl RunStatus {
    /// `cancelled`, `expired` and `incomplete` are terminal on the hosted
    /// service, so they count as failures here. Unknown values keep polling.
    pub fn state(&self) -> RunState {
        match self {
            RunStatus::Completed | RunStatus::Succeeded => RunState::Succeeded,
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired | RunStatus::Incomplete => {
                RunState::Failed
            }
            RunStatus::Queued
            | RunStatus::InProgress
            | RunStatus::RequiresAction
            | RunStatus::Cancelling
            | RunStatus::Unknown(_) => RunState::Pending,
        }
    }
}

/// How long to wait between status requests, and for how long overall.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Multiplier applied to the delay after every pending status. `1.0`
    /// keeps the interval fixed.
    pub backoff: f64,
    pub max_interval: Duration,
    /// Upper bound on the summed delays. `None` waits for as long as the
    /// service keeps the run pending.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            interval: Duration::from_secs(1),
            backoff: 1.0,
            max_interval: Duration::from_secs(30),
            max_wait: None,
        }
    }
}

impl PollPolicy {
    /// Delay to use after `delay`, grown by the backoff factor and capped.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        if self.backoff.is_nan() || self.backoff <= 1.0 {
            return delay;
        }
        let cap = self.max_interval.max(self.interval);
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff)
            .map(|next| next.min(cap))
            .unwrap_or(cap)
    }
}

/// Suspends the caller between polls.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Terminal result of polling one run.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The run finished; holds the thread's messages fetched once afterwards.
    Succeeded(Vec<ThreadMessage>),
    /// The run ended in a failed status; nothing else was fetched.
    Failed(Run),
}

pub struct Poller<S: Sleeper> {
    policy: PollPolicy,
    sleeper: S,
}

impl<S: Sleeper> Poller<S> {
    pub fn new(policy: PollPolicy, sleeper: S) -> Self {
        Poller { policy, sleeper }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Poll `run_id` until it reaches a terminal state. `on_wait` is called
    /// with the cumulative delay before every sleep.
    pub fn wait_for_run<A, F>(
        &mut self,
        service: &A,
        thread_id: &str,
        run_id: &str,
        mut on_wait: F,
    ) -> Result<PollOutcome, SessionError>
    where
        A: AssistantService + ?Sized,
        F: FnMut(Duration),
    {
        let mut delay = self.policy.interval;
        let mut waited = Duration::ZERO;

        loop {
            let run = service.get_run(thread_id, run_id)?;
            tracing::debug!(thread_id, run_id, status = %run.status, "polled run");

            match run.status.state() {
                RunState::Succeeded => {
                    let messages = service.list_messages(thread_id)?;
                    return Ok(PollOutcome::Succeeded(messages));
                }
                RunState::Failed => return Ok(PollOutcome::Failed(run)),
                RunState::Pending => {}
            }

            if let Some(limit) = self.policy.max_wait {
                if waited + delay > limit {
                    tracing::warn!(thread_id, run_id, ?waited, "run did not finish in time");
                    return Err(SessionError::PollTimeout { waited });
                }
            }

            on_wait(waited);
            self.sleeper.sleep(delay);
            waited += delay;
            delay = self.policy.next_delay(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(RunStatus::Completed.state(), RunState::Succeeded);
        assert_eq!(RunStatus::Succeeded.state(), RunState::Succeeded);
        assert_eq!(RunStatus::Failed.state(), RunState::Failed);
        assert_eq!(RunStatus::Expired.state(), RunState::Failed);
        assert_eq!(RunStatus::InProgress.state(), RunState::Pending);
        assert_eq!(RunStatus::Unknown("paused".into()).state(), RunState::Pending);
    }

    #[test]
    fn default_policy_keeps_a_fixed_interval() {
        let policy = PollPolicy::default();
        let d = policy.next_delay(policy.interval);
        assert_eq!(d, Duration::from_secs(1));
        assert_eq!(policy.next_delay(d), Duration::from_secs(1));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = PollPolicy {
            interval: Duration::from_millis(500),
            backoff: 2.0,
            max_interval: Duration::from_millis(1500),
            max_wait: None,
        };
        let d1 = policy.next_delay(policy.interval);
        assert_eq!(d1, Duration::from_millis(1000));
        let d2 = policy.next_delay(d1);
        assert_eq!(d2, Duration::from_millis(1500));
        assert_eq!(policy.next_delay(d2), Duration::from_millis(1500));
    }

    #[test]
    fn out_of_range_backoff_does_not_panic() {
        let mut policy = PollPolicy {
            backoff: f64::INFINITY,
            ..PollPolicy::default()
        };
        assert_eq!(policy.next_delay(Duration::from_secs(1)), policy.max_interval);

        policy.backoff = 1e300;
        assert_eq!(policy.next_delay(Duration::from_secs(1)), policy.max_interval);

        policy.backoff = f64::NAN;
        assert_eq!(policy.next_delay(Duration::from_secs(1)), Duration::from_secs(1));
    }
}
