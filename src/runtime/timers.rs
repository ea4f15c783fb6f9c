use crate::error::{Error, Result};
use std::future::Future;
use std::time::{Duration, Instant};

/// Lifecycle of a request observed by [`PendingRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Settled,
    Expired,
}

/// An in-flight request with an optional one-shot deadline.
///
/// The timer races the request: whichever finishes first settles the result.
/// Expiry only stops the wait; the request future is dropped, not cancelled
/// on the wire.
#[derive(Debug)]
pub struct PendingRequest {
    started: Instant,
    timeout: Option<Duration>,
    state: RequestState,
}

impl PendingRequest {
    /// Capture the start time and arm the timer. A missing or zero timeout
    /// disables it.
    pub fn start(timeout: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            timeout: timeout.filter(|t| !t.is_zero()),
            state: RequestState::Pending,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Drive `request` to completion or until the deadline, whichever is first.
    /// Afterwards [`PendingRequest::state`] reports how it ended.
    pub async fn settle<F, T>(&mut self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(timeout) = self.timeout else {
            let result = request.await;
            self.state = RequestState::Settled;
            return result;
        };

        let outcome = tokio::select! {
            biased;
            result = request => Some(result),
            _ = tokio::time::sleep(timeout) => None,
        };

        match outcome {
            None => {
                self.state = RequestState::Expired;
                log::debug!("Request expired after {}ms", timeout.as_millis());
                Err(Error::Timeout(timeout))
            }
            // A response landing right at the deadline still counts as expired;
            // late errors keep their own cause
            Some(Ok(_)) if self.elapsed() >= timeout => {
                self.state = RequestState::Expired;
                log::debug!(
                    "Request settled after its {}ms deadline ({}ms)",
                    timeout.as_millis(),
                    self.elapsed().as_millis()
                );
                Err(Error::Timeout(timeout))
            }
            Some(result) => {
                self.state = RequestState::Settled;
                result
            }
        }
    }
}
