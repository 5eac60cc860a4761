//! Recurring background jobs.
//!
//! Every registered job gets its own interval loop, firing at once or after
//! its first full interval depending on `run_on_start`. A job never overlaps
//! itself: a tick (or manual trigger) that arrives while the previous run is
//! still going is skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub type JobResult = anyhow::Result<()>;

#[async_trait]
pub trait SchedulerJob: Send + Sync {
    fn name(&self) -> &'static str;

    fn interval(&self) -> Duration;

    /// Whether the first run happens at startup or one interval later.
    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> JobResult;
}

struct JobSlot {
    job: Arc<dyn SchedulerJob>,
    running: Arc<AtomicBool>,
}

/// Clears the running flag when a run ends, including by panic.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Default)]
pub struct Scheduler {
    jobs: Vec<JobSlot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job<J: SchedulerJob + 'static>(self, job: J) -> Self {
        self.with_arc_job(Arc::new(job))
    }

    pub fn with_arc_job(mut self, job: Arc<dyn SchedulerJob>) -> Self {
        self.jobs.push(JobSlot { job, running: Arc::new(AtomicBool::new(false)) });
        self
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Spawn one interval loop per job.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        self.jobs
            .iter()
            .map(|slot| {
                let job = Arc::clone(&slot.job);
                let running = Arc::clone(&slot.running);
                tokio::spawn(async move { Self::run_job_loop(job, running).await })
            })
            .collect()
    }

    /// Run the named job now, outside its schedule. `None` if no job has
    /// that name or it is already running.
    pub fn trigger(&self, name: &str) -> Option<JoinHandle<()>> {
        let slot = self.jobs.iter().find(|s| s.job.name() == name)?;
        Self::launch(&slot.job, &slot.running)
    }

    async fn run_job_loop(job: Arc<dyn SchedulerJob>, running: Arc<AtomicBool>) {
        let period = job.interval();
        let mut timer = if job.run_on_start() {
            tokio::time::interval(period)
        } else {
            tokio::time::interval_at(Instant::now() + period, period)
        };
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Job '{}' scheduled every {:?}", job.name(), job.interval());
        loop {
            timer.tick().await;
            Self::launch(&job, &running);
        }
    }

    fn launch(job: &Arc<dyn SchedulerJob>, running: &Arc<AtomicBool>) -> Option<JoinHandle<()>> {
        if running.swap(true, Ordering::AcqRel) {
            tracing::warn!("Job '{}' still running, skipping this run", job.name());
            return None;
        }

        let guard = RunGuard(Arc::clone(running));
        let job = Arc::clone(job);
        Some(tokio::spawn(async move {
            let _guard = guard;
            let name = job.name();
            match job.execute().await {
                Ok(()) => tracing::debug!("Job '{}' completed successfully", name),
                Err(e) => tracing::error!("Job '{}' failed: {:#}", name, e),
            }
        }))
    }
}
