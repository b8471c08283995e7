//! Suspension points and bounded polling
//!
//! Every wait the harness performs goes through a [`Clock`], so the same
//! scenarios can run against real time in a browser or native binary and
//! against virtual time in tests.

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::{HarnessError, HarnessResult};

#[async_trait(?Send)]
pub trait Clock {
    /// Suspend the current run for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Wall-clock milliseconds since the Unix epoch, used to build unique tokens.
    fn wall_millis(&self) -> u64;
}

/// Sleep for `duration`, clamped to the per-wait timeout.
pub async fn wait(clock: &dyn Clock, duration: Duration, max_wait: Duration) -> Duration {
    let effective = duration.min(max_wait);
    trace!(requested_ms = duration.as_millis() as u64, "waiting {} ms", effective.as_millis());
    clock.sleep(effective).await;
    effective
}

/// Spacing and budget for [`await_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Converged { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn converged(&self) -> bool {
        matches!(self, PollOutcome::Converged { .. })
    }

    /// Map exhaustion to [`HarnessError::ConvergenceTimeout`] describing `what`
    /// never became true.
    pub fn into_result(self, what: &str, policy: PollPolicy) -> HarnessResult<u32> {
        match self {
            PollOutcome::Converged { attempts } => Ok(attempts),
            PollOutcome::Exhausted { attempts } => Err(HarnessError::ConvergenceTimeout {
                what: what.to_string(),
                attempts,
                interval_ms: policy.interval.as_millis() as u64,
            }),
        }
    }
}

/// Wait `policy.interval`, then evaluate `predicate`, up to
/// `policy.max_attempts` times. The predicate is never evaluated before the
/// first interval has elapsed.
pub async fn await_until<F>(clock: &dyn Clock, policy: PollPolicy, mut predicate: F) -> PollOutcome
where
    F: FnMut() -> bool,
{
    let mut attempts = 0;
    while attempts < policy.max_attempts {
        clock.sleep(policy.interval).await;
        attempts += 1;
        if predicate() {
            debug!(attempts, "condition converged");
            return PollOutcome::Converged { attempts };
        }
    }
    debug!(attempts, "condition did not converge");
    PollOutcome::Exhausted { attempts }
}

/// Deterministic clock where sleeping advances time instantly.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Cell<Duration>,
    epoch_millis: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual clock whose wall time starts at `epoch_millis`.
    pub fn starting_at(epoch_millis: u64) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            epoch_millis,
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

#[async_trait(?Send)]
impl Clock for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn elapsed(&self) -> Duration {
        self.now.get()
    }

    fn wall_millis(&self) -> u64 {
        self.epoch_millis + self.now.get().as_millis() as u64
    }
}

#[async_trait(?Send)]
impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }

    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }

    fn wall_millis(&self) -> u64 {
        (**self).wall_millis()
    }
}

/// Real-time clock backed by the tokio timer.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}
