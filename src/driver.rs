use std::path::Path;

use crontask_parser::{classify_line, parse_schedule_line, CrontabLine};
use tracing::{info, warn};

use crate::errors::Result;
use crate::scheduler::Scheduler;

/// Register every entry of a crontab document, naming tasks under `prefix`.
///
/// Entry lines are numbered `task-001`, `task-002`, ... in document order; a
/// preceding `# tn: NAME` comment replaces the generated name for the next
/// entry only (the entry still consumes a number). A line that fails to
/// parse is reported with its line number and skipped; a backend failure
/// aborts the batch.
pub async fn register_all<S: Scheduler>(scheduler: &S, input: &str, prefix: &str) -> Result<()> {
    let mut entry_no = 1;
    let mut override_name: Option<String> = None;

    for (line_no, line) in input.lines().enumerate() {
        let line_no = line_no + 1;
        match classify_line(line) {
            CrontabLine::Blank | CrontabLine::Comment => {}
            CrontabLine::NameOverride(name) => override_name = Some(name.to_string()),
            CrontabLine::Entry(entry) => {
                let task_name = match override_name.take() {
                    Some(name) => format!("{prefix}{name}"),
                    None => format!("{prefix}task-{entry_no:03}"),
                };
                entry_no += 1;
                match parse_schedule_line(task_name, entry) {
                    Ok(descriptor) => {
                        scheduler.register(&descriptor).await?;
                        info!(task = %descriptor.task_name, "registered");
                    }
                    Err(error) => {
                        warn!(line = line_no, %error, "skipping schedule line");
                    }
                }
            }
        }
    }
    Ok(())
}

/// Remove every registered task whose name starts with `prefix`.
pub async fn unregister_all<S: Scheduler>(scheduler: &S, prefix: &str) -> Result<()> {
    for name in scheduler.list(prefix).await? {
        scheduler.unregister(&name).await?;
        info!(task = %name, "unregistered");
    }
    Ok(())
}

/// Read a crontab file and replace every owned task with its entries.
pub async fn apply_file<S: Scheduler>(scheduler: &S, path: &Path, prefix: &str) -> Result<()> {
    let input = tokio::fs::read_to_string(path).await?;
    unregister_all(scheduler, prefix).await?;
    register_all(scheduler, &input, prefix).await
}
