use thiserror::Error;

use crate::scheduler::SchedulerError;

/// Errors that can occur while applying a crontab to the Task Scheduler.
#[derive(Error, Debug)]
pub enum CrontaskError {
    /// Reading or writing the crontab file failed
    #[error("crontab io error: {0}")]
    Io(#[from] std::io::Error),

    /// The scheduling backend rejected an operation
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// A Result type alias for CrontaskError.
pub type Result<T> = core::result::Result<T, CrontaskError>;
