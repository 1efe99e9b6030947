//! Once-a-day trigger for background jobs.
//!
//! The scheduler is an explicit component: it is started with the job to run
//! and returns a handle whose `stop` ends the loop and joins the task. A job
//! already running when `stop` is called finishes first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use super::ReferenceZone;

/// Work triggered by the scheduler.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Execute one run. Failures are the job's to record; the scheduler keeps
    /// firing regardless.
    async fn run(&self, now: DateTime<Utc>);
}

/// Errors raised by the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The wall-clock time could not be parsed.
    #[error("run time must be HH:MM, got {raw:?}")]
    InvalidRunTime {
        /// Rejected input.
        raw: String,
    },
    /// The scheduler task panicked or was aborted.
    #[error("scheduler task failed: {message}")]
    Join {
        /// Join error description.
        message: String,
    },
}

/// A fixed wall-clock time each day in the reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    run_at: NaiveTime,
    zone: ReferenceZone,
}

impl DailySchedule {
    pub fn new(run_at: NaiveTime, zone: ReferenceZone) -> Self {
        Self { run_at, zone }
    }

    /// Parse an `HH:MM` run time.
    ///
    /// # Examples
    /// ```
    /// use immunisation::domain::{DailySchedule, ReferenceZone};
    ///
    /// assert!(DailySchedule::parse("09:00", ReferenceZone::utc()).is_ok());
    /// assert!(DailySchedule::parse("9am", ReferenceZone::utc()).is_err());
    /// ```
    pub fn parse(raw: &str, zone: ReferenceZone) -> Result<Self, SchedulerError> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map(|run_at| Self::new(run_at, zone))
            .map_err(|_| SchedulerError::InvalidRunTime {
                raw: raw.to_owned(),
            })
    }

    pub fn run_at(&self) -> NaiveTime {
        self.run_at
    }

    pub fn zone(&self) -> ReferenceZone {
        self.zone
    }

    /// The first fire instant strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.zone.today(now);
        let candidate = self.zone.instant_at(today, self.run_at);
        if candidate > now {
            candidate
        } else {
            self.zone
                .instant_at(ReferenceZone::add_days(today, 1), self.run_at)
        }
    }
}

/// Drives a [`ScheduledJob`] on a [`DailySchedule`].
pub struct DailyScheduler {
    schedule: DailySchedule,
    clock: Arc<dyn Clock>,
}

impl DailyScheduler {
    pub fn new(schedule: DailySchedule, clock: Arc<dyn Clock>) -> Self {
        Self { schedule, clock }
    }

    /// Spawn the scheduling loop on the current Tokio runtime.
    pub fn start(self, job: Arc<dyn ScheduledJob>) -> SchedulerHandle {
        let (shutdown, mut signal) = watch::channel(false);
        let Self { schedule, clock } = self;

        let task = tokio::spawn(async move {
            let mut last_fire: Option<DateTime<Utc>> = None;
            loop {
                let now = clock.utc();
                let reference = last_fire.map_or(now, |fired| fired.max(now));
                let next = schedule.next_run_after(reference);
                let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                info!(job = job.name(), next_run = %next, "scheduled next run");

                tokio::select! {
                    () = tokio::time::sleep(wait) => {
                        job.run(clock.utc()).await;
                        last_fire = Some(next);
                    }
                    _ = signal.changed() => break,
                }
            }
            info!(job = job.name(), "scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(self) -> Result<(), SchedulerError> {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(true);
        self.task.await.map_err(|err| SchedulerError::Join {
            message: err.to_string(),
        })
    }
}
