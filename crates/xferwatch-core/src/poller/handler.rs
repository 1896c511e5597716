use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::XferError;
use crate::poller::types::{PollOutcome, PollState, PollTiming, ReloadTrigger, StopReason};
use crate::status::{StatusSource, TransferStatus};

struct Shared {
    state: PollState,
    last_status: Option<TransferStatus>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Polls a status source while a transfer is in progress.
///
/// The first check runs one interval after [`start`](Self::start). Checks are
/// strictly sequential: a slow request delays the next tick instead of
/// overlapping it. When the source reports `active: false` the timer is
/// cancelled and the reload trigger fires once after the reload delay. When a
/// check fails the timer is cancelled and no reload happens.
///
/// Must be created inside a tokio runtime. Dropping the poller stops it.
pub struct StatusPoller<S, R> {
    source: Arc<S>,
    reload: Arc<R>,
    timing: PollTiming,
    shared: Arc<Mutex<Shared>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<PollOutcome>>,
}

/// Cloneable handle that can stop a poller from another task.
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Mutex<Shared>>,
    cancel: CancellationToken,
}

impl StopHandle {
    /// Cancel the repeating check and any pending reload.
    ///
    /// Calling this on an idle or already stopped poller is a no-op.
    pub fn stop(&self) {
        let previous = {
            let mut shared = lock(&self.shared);
            let previous = shared.state;
            if previous == PollState::Polling {
                shared.state = PollState::Stopped;
            }
            previous
        };

        match previous {
            PollState::Idle => {
                debug!(event = "core.poller.stop_noop", state = %previous);
            }
            PollState::Polling => {
                self.cancel.cancel();
                info!(event = "core.poller.stopped");
            }
            PollState::Stopped => {
                // May still abort a reload waiting out its delay.
                self.cancel.cancel();
                debug!(event = "core.poller.stop_noop", state = %previous);
            }
        }
    }
}

impl<S, R> StatusPoller<S, R>
where
    S: StatusSource,
    R: ReloadTrigger,
{
    pub fn new(source: Arc<S>, reload: Arc<R>, timing: PollTiming) -> Self {
        Self {
            source,
            reload,
            timing,
            shared: Arc::new(Mutex::new(Shared {
                state: PollState::Idle,
                last_status: None,
            })),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Begin polling if a transfer is in progress.
    ///
    /// With `indicator_present == false` nothing is scheduled. Only an idle
    /// poller can start: a second call while polling, or any call after the
    /// poller stopped, is ignored.
    pub fn start(&mut self, indicator_present: bool) {
        {
            let mut shared = lock(&self.shared);
            if shared.state != PollState::Idle {
                warn!(
                    event = "core.poller.start_ignored",
                    state = %shared.state,
                );
                return;
            }
            if !indicator_present {
                debug!(event = "core.poller.no_transfer_in_progress");
                return;
            }
            shared.state = PollState::Polling;
        }

        let task = PollTask {
            first_tick: Instant::now() + self.timing.interval,
            source: Arc::clone(&self.source),
            reload: Arc::clone(&self.reload),
            timing: self.timing,
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
        };
        self.task = Some(tokio::spawn(task.run()));

        info!(
            event = "core.poller.started",
            interval_ms = self.timing.interval.as_millis() as u64,
            reload_delay_ms = self.timing.reload_delay.as_millis() as u64,
        );
    }

    /// Cancel any pending check. Idempotent.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
        }
    }

    pub fn state(&self) -> PollState {
        lock(&self.shared).state
    }

    /// Most recent status returned by a successful check.
    pub fn last_status(&self) -> Option<TransferStatus> {
        lock(&self.shared).last_status.clone()
    }

    /// Wait for the polling task to end.
    ///
    /// Returns `None` if polling never started or the outcome was already taken.
    pub async fn wait(&mut self) -> Option<PollOutcome> {
        let task = self.task.take()?;
        match task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(event = "core.poller.task_join_failed", error = %e);
                None
            }
        }
    }
}

impl<S, R> Drop for StatusPoller<S, R> {
    fn drop(&mut self) {
        StopHandle {
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
        }
        .stop();
    }
}

struct PollTask<S, R> {
    first_tick: Instant,
    source: Arc<S>,
    reload: Arc<R>,
    timing: PollTiming,
    shared: Arc<Mutex<Shared>>,
    cancel: CancellationToken,
}

impl<S, R> PollTask<S, R>
where
    S: StatusSource,
    R: ReloadTrigger,
{
    async fn run(self) -> PollOutcome {
        let mut ticker = tokio::time::interval_at(self.first_tick, self.timing.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks: u32 = 0;

        let finished = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return cancelled(ticks),
                _ = ticker.tick() => {}
            }

            ticks += 1;
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return cancelled(ticks),
                result = self.source.fetch_status() => result,
            };

            match result {
                Ok(status) if status.active => {
                    debug!(
                        event = "core.poller.tick_completed",
                        tick = ticks,
                        progress = status.progress,
                        message = %status.message,
                    );
                    lock(&self.shared).last_status = Some(status);
                }
                Ok(status) => {
                    {
                        let mut shared = lock(&self.shared);
                        shared.state = PollState::Stopped;
                        shared.last_status = Some(status.clone());
                    }
                    info!(
                        event = "core.poller.transfer_finished",
                        tick = ticks,
                        message = %status.message,
                        transfer_failed = status.is_failed(),
                    );
                    break status;
                }
                Err(e) => {
                    lock(&self.shared).state = PollState::Stopped;
                    warn!(
                        event = "core.poller.poll_failed",
                        tick = ticks,
                        error = %e,
                        error_code = e.error_code(),
                    );
                    return PollOutcome {
                        reason: StopReason::Failed(e),
                        ticks,
                        reloaded: false,
                    };
                }
            }
        };
        drop(ticker);

        let reloaded = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(event = "core.poller.reload_cancelled", tick = ticks);
                false
            }
            _ = tokio::time::sleep(self.timing.reload_delay) => {
                info!(event = "core.poller.reload_triggered", tick = ticks);
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        debug!(event = "core.poller.reload_cancelled", tick = ticks);
                        false
                    }
                    _ = self.reload.reload() => true,
                }
            }
        };

        PollOutcome {
            reason: StopReason::Completed(finished),
            ticks,
            reloaded,
        }
    }
}

fn cancelled(ticks: u32) -> PollOutcome {
    debug!(event = "core.poller.task_cancelled", ticks = ticks);
    PollOutcome {
        reason: StopReason::Cancelled,
        ticks,
        reloaded: false,
    }
}
