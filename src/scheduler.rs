use std::future::Future;

use crontask_schedule::{ScheduleDescriptor, ScheduleKind};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while},
    character::complete::char,
    sequence::delimited,
    IResult,
};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// The scheduling backend executable.
pub const SCHTASKS_EXE: &str = "schtasks.exe";

/// Errors from the scheduling backend.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Spawning schtasks failed
    #[error("error while running schtasks: {0}")]
    Io(#[from] std::io::Error),

    /// schtasks ran but reported failure
    #[error("schtasks runtime error\n  args: {args:?}\n  output: {output}")]
    Backend { args: Vec<String>, output: String },
}

/// The capability a normalized schedule is handed to.
///
/// The production implementation is [`Schtasks`]; tests drive the line
/// driver through [`mock::MockScheduler`].
pub trait Scheduler: Send + Sync {
    /// Register `task` with the backend, replacing any task of the same name.
    fn register(
        &self,
        task: &ScheduleDescriptor,
    ) -> impl Future<Output = Result<(), SchedulerError>> + Send;

    /// Remove the task with the given name.
    fn unregister(&self, task_name: &str)
        -> impl Future<Output = Result<(), SchedulerError>> + Send;

    /// Names of registered tasks starting with `prefix` (case-insensitive).
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, SchedulerError>> + Send;
}

/// The Windows Task Scheduler, driven through `schtasks.exe`.
#[derive(Clone, Copy, Default)]
pub struct Schtasks;

impl Scheduler for Schtasks {
    async fn register(&self, task: &ScheduleDescriptor) -> Result<(), SchedulerError> {
        run_schtasks(create_args(task)).await
    }

    async fn unregister(&self, task_name: &str) -> Result<(), SchedulerError> {
        let args = ["/delete", "/f", "/tn", task_name];
        run_schtasks(args.iter().map(|s| s.to_string()).collect()).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, SchedulerError> {
        let args = ["/query", "/fo", "csv", "/nh"];
        let output = Command::new(SCHTASKS_EXE).args(args).output().await?;
        if !output.status.success() {
            return Err(SchedulerError::Backend {
                args: args.iter().map(|s| s.to_string()).collect(),
                output: combined_output(&output),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let prefix = prefix.to_lowercase();
        Ok(text
            .lines()
            .filter_map(first_csv_field)
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .map(str::to_string)
            .collect())
    }
}

async fn run_schtasks(args: Vec<String>) -> Result<(), SchedulerError> {
    let output = Command::new(SCHTASKS_EXE).args(&args).output().await?;
    if !output.status.success() {
        return Err(SchedulerError::Backend {
            output: combined_output(&output),
            args,
        });
    }
    debug!(?args, "schtasks succeeded");
    Ok(())
}

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

/// Render a descriptor into `schtasks /create` arguments.
fn create_args(task: &ScheduleDescriptor) -> Vec<String> {
    let mut args = vec![
        "/create".to_string(),
        "/f".to_string(),
        "/tn".to_string(),
        task.task_name.clone(),
        "/tr".to_string(),
        task.command.clone(),
        "/sc".to_string(),
        task.kind.to_string(),
    ];

    args.push("/st".into());
    args.push(task.start_time.format("%H:%M").to_string());

    if let Some(interval) = task.interval {
        args.push("/mo".into());
        args.push(interval.to_string());
    }

    match task.kind {
        ScheduleKind::Weekly => {
            args.push("/d".into());
            args.push(join(task.days_of_week.iter().map(|d| d.abbrev().to_string())));
        }
        ScheduleKind::Monthly => {
            args.push("/d".into());
            args.push(join(task.days_of_month.iter().map(u32::to_string)));
            if !task.months.is_empty() {
                args.push("/m".into());
                args.push(join(task.months.iter().map(|m| m.abbrev().to_string())));
            }
        }
        _ => {}
    }

    args
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

/// First column of one `schtasks /query /fo csv` row.
fn first_csv_field(line: &str) -> Option<&str> {
    fn field(input: &str) -> IResult<&str, &str> {
        alt((
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            take_till(|c: char| c == ','),
        ))(input)
    }
    match field(line) {
        Ok((_, name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}

pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// In-memory scheduler for driver tests.
    ///
    /// Records every registration and removal; `list` serves the names of
    /// currently registered tasks, including any seeded with
    /// [`MockScheduler::with_existing`].
    #[derive(Default)]
    pub struct MockScheduler {
        registered: Mutex<Vec<ScheduleDescriptor>>,
        names: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    impl MockScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        /// A scheduler that already has tasks registered under it.
        pub fn with_existing<I, S>(names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let mock = Self::new();
            *mock.names.lock().unwrap() = names.into_iter().map(Into::into).collect();
            mock
        }

        /// Every descriptor registered so far, in order.
        pub fn registered(&self) -> Vec<ScheduleDescriptor> {
            self.registered.lock().unwrap().clone()
        }

        /// Every task name unregistered so far, in order.
        pub fn removed(&self) -> Vec<String> {
            self.removed.lock().unwrap().clone()
        }
    }

    impl Scheduler for MockScheduler {
        async fn register(&self, task: &ScheduleDescriptor) -> Result<(), SchedulerError> {
            self.names.lock().unwrap().push(task.task_name.clone());
            self.registered.lock().unwrap().push(task.clone());
            Ok(())
        }

        async fn unregister(&self, task_name: &str) -> Result<(), SchedulerError> {
            self.names.lock().unwrap().retain(|n| n != task_name);
            self.removed.lock().unwrap().push(task_name.to_string());
            Ok(())
        }

        async fn list(&self, prefix: &str) -> Result<Vec<String>, SchedulerError> {
            let prefix = prefix.to_lowercase();
            Ok(self
                .names
                .lock()
                .unwrap()
                .iter()
                .filter(|name| name.to_lowercase().starts_with(&prefix))
                .cloned()
                .collect())
        }
    }
}
