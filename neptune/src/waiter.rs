//! Polling until a resource reaches a target status

use crate::api::ApiError;
use std::future::Future;
use std::time::Duration;
use tfplug::context::Context;
use thiserror::Error;
use tokio::time::{self, Instant};

const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Consecutive not-found refreshes tolerated while a target status is expected
pub const DEFAULT_NOT_FOUND_CHECKS: usize = 20;

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timeout while waiting for state to become '{target}' (last state: '{last_state}', timeout: {timeout:?})")]
    Timeout {
        last_state: String,
        target: String,
        timeout: Duration,
    },

    #[error("unexpected state '{state}', wanted target '{target}'")]
    UnexpectedState { state: String, target: String },

    #[error("couldn't find resource ({checks} retries)")]
    NotFound { checks: usize },

    #[error("cancelled while waiting for state to become '{target}'")]
    Cancelled { target: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WaitError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            WaitError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Describes a wait for a status transition
///
/// The refresh function returns the current object and its status, or
/// `None` when the object does not exist. With an empty `target` a missing
/// object ends the wait successfully.
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    pub pending: &'static [&'static str],
    pub target: &'static [&'static str],
    pub timeout: Duration,
    /// Sleep before the first refresh
    pub delay: Duration,
    /// Fixed interval between refreshes; exponential backoff when unset
    pub poll_interval: Option<Duration>,
    /// Lower bound for the backoff interval
    pub min_timeout: Duration,
    pub not_found_checks: usize,
}

impl Default for StateChangeConf {
    fn default() -> Self {
        Self {
            pending: &[],
            target: &[],
            timeout: Duration::from_secs(20 * 60),
            delay: Duration::ZERO,
            poll_interval: None,
            min_timeout: Duration::ZERO,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
        }
    }
}

impl StateChangeConf {
    pub async fn wait_for_state<T, F, Fut>(
        &self,
        ctx: &Context,
        mut refresh: F,
    ) -> Result<Option<T>, WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(Option<T>, String), ApiError>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last_state = String::new();
        let mut not_found = 0;
        let mut backoff = INITIAL_POLL_INTERVAL;
        let mut sleep = self.delay;

        loop {
            if !sleep.is_zero() {
                tokio::select! {
                    _ = time::sleep(sleep) => {}
                    _ = time::sleep_until(deadline) => return Err(self.timeout_error(last_state)),
                    _ = ctx.cancelled() => return Err(self.cancelled_error()),
                }
            }

            let (value, state) = tokio::select! {
                result = refresh() => result?,
                _ = time::sleep_until(deadline) => return Err(self.timeout_error(last_state)),
                _ = ctx.cancelled() => return Err(self.cancelled_error()),
            };

            match value {
                None if self.target.is_empty() => return Ok(None),
                None => {
                    not_found += 1;
                    if not_found > self.not_found_checks {
                        return Err(WaitError::NotFound { checks: not_found });
                    }
                }
                Some(value) => {
                    not_found = 0;
                    if self.target.contains(&state.as_str()) {
                        return Ok(Some(value));
                    }
                    if !self.pending.contains(&state.as_str()) {
                        return Err(WaitError::UnexpectedState {
                            state,
                            target: self.target.join(", "),
                        });
                    }
                }
            }

            tracing::trace!(state = %state, target = ?self.target, "waiting for state change");
            last_state = state;

            sleep = match self.poll_interval {
                Some(interval) => interval,
                None => {
                    let wait = backoff.max(self.min_timeout).min(MAX_POLL_INTERVAL);
                    backoff = wait * 2;
                    wait
                }
            };
        }
    }

    fn timeout_error(&self, last_state: String) -> WaitError {
        WaitError::Timeout {
            last_state,
            target: self.target.join(", "),
            timeout: self.timeout,
        }
    }

    fn cancelled_error(&self) -> WaitError {
        WaitError::Cancelled {
            target: self.target.join(", "),
        }
    }
}
