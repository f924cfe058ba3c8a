//! Cron-based scheduler for recurring forecast lookups
//!
//! Each `[[schedule]]` entry becomes one job on a `tokio-cron-scheduler`
//! instance. Jobs are not coordinated with each other or with message
//! handling; overlapping runs share the state store as last-write-wins.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info, instrument};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// A task with this name is already scheduled
    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Statistics for a scheduled task
#[derive(Debug, Clone)]
pub struct TaskStats {
    /// Task name
    pub name: String,
    /// Cron expression
    pub cron_expression: String,
    /// Number of successful executions
    pub success_count: u64,
    /// Number of failed executions
    pub failure_count: u64,
    /// Last execution time
    pub last_run: Option<DateTime<Utc>>,
    /// Last error message
    pub last_error: Option<String>,
    /// Next tick according to the cron expression
    pub next_run: Option<DateTime<Utc>>,
    /// Average execution duration in milliseconds
    pub avg_duration_ms: u64,
}

struct TaskMetadata {
    name: String,
    schedule: cron::Schedule,
    cron_expression: String,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    total_duration_ms: AtomicU64,
}

impl TaskMetadata {
    #[allow(clippy::missing_const_for_fn)] // RwLock::new is not const in parking_lot
    fn new(name: String, cron_expression: String, schedule: cron::Schedule) -> Self {
        Self {
            name,
            schedule,
            cron_expression,
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_error: RwLock::new(None),
            total_duration_ms: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> TaskStats {
        let success = self.success_count.load(Ordering::Relaxed);
        let failure = self.failure_count.load(Ordering::Relaxed);
        let runs = success + failure;
        let avg_duration_ms = if runs > 0 {
            self.total_duration_ms.load(Ordering::Relaxed) / runs
        } else {
            0
        };

        TaskStats {
            name: self.name.clone(),
            cron_expression: self.cron_expression.clone(),
            success_count: success,
            failure_count: failure,
            last_run: *self.last_run.read(),
            last_error: self.last_error.read().clone(),
            next_run: self.schedule.upcoming(Utc).next(),
            avg_duration_ms,
        }
    }

    fn record(&self, outcome: &Result<(), String>, duration_ms: u64) {
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.last_run.write() = Some(Utc::now());
        match outcome {
            Ok(()) => {
                self.success_count.fetch_add(1, Ordering::Relaxed);
            },
            Err(e) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                *self.last_error.write() = Some(e.clone());
            },
        }
    }
}

/// Emitted after every task execution
#[derive(Debug, Clone)]
pub struct TaskEvent {
    /// Task name
    pub task_name: String,
    /// Error message if the run failed
    pub error: Option<String>,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
    /// When the task completed
    pub completed_at: DateTime<Utc>,
}

impl TaskEvent {
    /// Whether the run succeeded
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Start ticking as soon as the scheduler is created
    pub auto_start: bool,
    /// Capacity of the task event channel; events are dropped when full
    pub event_buffer_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            event_buffer_size: 100,
        }
    }
}

/// Validate a six-field cron expression
///
/// # Errors
///
/// Returns `InvalidCronExpression` if the expression does not parse.
pub fn parse_cron(expression: &str) -> Result<cron::Schedule, SchedulerError> {
    cron::Schedule::from_str(expression)
        .map_err(|e| SchedulerError::InvalidCronExpression(format!("{expression}: {e}")))
}

/// Runs named async tasks on cron schedules
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>,
    running: AtomicBool,
    event_tx: mpsc::Sender<TaskEvent>,
    event_rx: RwLock<Option<mpsc::Receiver<TaskEvent>>>,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a new task scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer_size);

        let instance = Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: AtomicBool::new(false),
            event_tx,
            event_rx: RwLock::new(Some(event_rx)),
        };

        if config.auto_start {
            instance.start().await?;
        }
        Ok(instance)
    }

    /// Start ticking
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        self.scheduler.lock().await.start().await?;
        info!("Scheduler started");
        Ok(())
    }

    /// Stop ticking; a stopped scheduler cannot be restarted
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.swap(false, Ordering::Relaxed) {
            return Ok(());
        }
        self.scheduler.lock().await.shutdown().await?;
        info!("Scheduler stopped");
        Ok(())
    }

    /// Whether the scheduler is ticking
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Take the task event receiver (only once)
    pub fn take_event_receiver(&self) -> Option<mpsc::Receiver<TaskEvent>> {
        self.event_rx.write().take()
    }

    /// Schedule `task` under a unique `name`
    ///
    /// `task` is called once per tick to produce that tick's future.
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        let schedule = parse_cron(cron_expression)?;
        if self.tasks.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let task_name = name.to_string();
        let tasks = Arc::clone(&self.tasks);
        let event_tx = self.event_tx.clone();

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let name = task_name.clone();
            let metadata = tasks.read().get(&name).cloned();
            let event_tx = event_tx.clone();
            let run = task();

            Box::pin(async move {
                let start = std::time::Instant::now();
                let outcome = run.await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                if let Some(metadata) = &metadata {
                    metadata.record(&outcome, duration_ms);
                }
                match &outcome {
                    Ok(()) => info!(task = %name, duration_ms, "Task completed"),
                    Err(e) => error!(task = %name, error = %e, duration_ms, "Task failed"),
                }

                let _ = event_tx.try_send(TaskEvent {
                    task_name: name,
                    error: outcome.err(),
                    duration_ms,
                    completed_at: Utc::now(),
                });
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        // Register before the job can tick so its first run is recorded
        self.tasks.write().insert(
            name.to_string(),
            Arc::new(TaskMetadata::new(
                name.to_string(),
                cron_expression.to_string(),
                schedule,
            )),
        );
        if let Err(e) = self.scheduler.lock().await.add(job).await {
            self.tasks.write().remove(name);
            return Err(e.into());
        }

        info!(task = %name, cron = %cron_expression, "Task scheduled");
        Ok(())
    }

    /// Statistics for all tasks, sorted by name
    #[must_use]
    pub fn get_all_stats(&self) -> Vec<TaskStats> {
        let mut stats: Vec<TaskStats> = self.tasks.read().values().map(|m| m.to_stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Number of scheduled tasks
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }
}
