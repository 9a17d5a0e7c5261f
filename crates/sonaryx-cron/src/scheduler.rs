// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two independent recurring triggers over [`ReleaseJobs`].
//!
//! Each trigger owns a running flag. A fire that finds its flag already set
//! is logged and dropped, never queued. The primary and fallback triggers do
//! not exclude each other. Stopping cancels the trigger loops; a run already
//! in flight is left to finish, and [`CheckScheduler::drain`] waits for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use sonaryx_config::model::ScheduleConfig;
use sonaryx_release::RunKind;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::jobs::ReleaseJobs;
use crate::schedule::Schedule;

/// Result of asking a trigger to fire.
#[derive(Debug)]
pub enum Fire {
    /// A run was spawned.
    Started(JoinHandle<()>),
    /// The previous run of this trigger is still going.
    Skipped,
}

/// Clears a running flag when the run ends, even if it panicked, and wakes
/// anyone draining.
struct RunGuard {
    flag: Arc<AtomicBool>,
    finished: Arc<Notify>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.finished.notify_waiters();
    }
}

/// Drives the daily and fallback checks on their cron schedules.
#[derive(Clone)]
pub struct CheckScheduler {
    jobs: Arc<ReleaseJobs>,
    config: ScheduleConfig,
    daily_running: Arc<AtomicBool>,
    fallback_running: Arc<AtomicBool>,
    run_finished: Arc<Notify>,
    cancel: CancellationToken,
    loops: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl CheckScheduler {
    pub fn new(jobs: Arc<ReleaseJobs>, config: ScheduleConfig) -> Self {
        Self::with_cancellation(jobs, config, CancellationToken::new())
    }

    /// Use an existing token, e.g. the process shutdown token.
    pub fn with_cancellation(
        jobs: Arc<ReleaseJobs>,
        config: ScheduleConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            jobs,
            config,
            daily_running: Arc::new(AtomicBool::new(false)),
            fallback_running: Arc::new(AtomicBool::new(false)),
            run_finished: Arc::new(Notify::new()),
            cancel,
            loops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn flag(&self, kind: RunKind) -> &Arc<AtomicBool> {
        match kind {
            RunKind::Daily => &self.daily_running,
            RunKind::Fallback => &self.fallback_running,
        }
    }

    fn expression(&self, kind: RunKind) -> &str {
        match kind {
            RunKind::Daily => &self.config.daily_cron,
            RunKind::Fallback => &self.config.fallback_cron,
        }
    }

    pub fn is_running(&self, kind: RunKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    /// Start a run of `kind` unless one is already in flight.
    pub fn fire(&self, kind: RunKind) -> Fire {
        let flag = self.flag(kind);
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(trigger = %kind, "skipping run: previous run still in progress");
            return Fire::Skipped;
        }

        let guard = RunGuard {
            flag: flag.clone(),
            finished: self.run_finished.clone(),
        };
        let jobs = self.jobs.clone();
        Fire::Started(tokio::spawn(async move {
            let _guard = guard;
            let started = Utc::now();
            info!(trigger = %kind, at = %started, "release check fired");
            jobs.execute(kind, started).await;
            info!(trigger = %kind, elapsed_ms = (Utc::now() - started).num_milliseconds(), "release check finished");
        }))
    }

    /// Install both triggers and the optional startup run.
    ///
    /// Returns the triggers that were installed. An invalid expression is
    /// logged and leaves only that trigger out.
    pub fn start(&self) -> Vec<RunKind> {
        let tz = self.jobs.window().timezone();
        let mut installed = Vec::new();

        for kind in [RunKind::Daily, RunKind::Fallback] {
            let expression = self.expression(kind);
            match Schedule::parse(expression, tz) {
                Ok(schedule) => {
                    info!(trigger = %kind, cron = %schedule.expression(), %tz, "scheduling release check");
                    let handle = tokio::spawn(self.clone().trigger_loop(kind, schedule));
                    self.track(handle);
                    installed.push(kind);
                }
                Err(e) => {
                    error!(trigger = %kind, cron = %expression, error = %e, "invalid schedule, trigger not started");
                }
            }
        }

        if self.config.run_on_start {
            let delay = Duration::from_secs(self.config.startup_delay_secs);
            let handle = tokio::spawn(self.clone().startup_run(delay));
            self.track(handle);
        }

        installed
    }

    /// Stop accepting fires. In-flight runs are not interrupted.
    pub fn stop(&self) {
        self.cancel.cancel();
        info!("release checkers stopped");
    }

    /// Wait for the trigger loops to exit after [`stop`](Self::stop).
    pub async fn join(&self) {
        let handles: Vec<_> = self
            .loops
            .lock()
            .map(|mut loops| loops.drain(..).collect())
            .unwrap_or_default();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "trigger task ended abnormally");
            }
        }
    }

    /// Wait up to `timeout` for in-flight runs to finish.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let busy = || self.is_running(RunKind::Daily) || self.is_running(RunKind::Fallback);
        if !busy() {
            return true;
        }

        info!("waiting for in-flight release check to finish");
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            // Register before re-checking so a run ending in between is not missed.
            let finished = self.run_finished.notified();
            tokio::pin!(finished);
            finished.as_mut().enable();
            if !busy() {
                return true;
            }
            if tokio::time::timeout_at(deadline, finished).await.is_err() {
                warn!("timeout reached, release check still running");
                return false;
            }
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut loops) = self.loops.lock() {
            loops.push(handle);
        }
    }

    async fn trigger_loop(self, kind: RunKind, schedule: Schedule) {
        let mut last_fire = None;
        loop {
            let now = Utc::now();
            // Never fire the same slot twice if the clock lags the timer.
            let from = last_fire.map_or(now, |last| now.max(last));
            let Some(next) = schedule.next_after(from) else {
                warn!(trigger = %kind, cron = %schedule.expression(), "schedule has no upcoming fire time");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(trigger = %kind, next = %next, "next release check scheduled");

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(trigger = %kind, "trigger cancelled");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            last_fire = Some(next);
            self.fire(kind);
        }
    }

    async fn startup_run(self, delay: Duration) {
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        info!(delay_secs = delay.as_secs(), "running startup release check");
        self.fire(RunKind::Daily);
    }
}
