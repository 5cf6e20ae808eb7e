//! crontask keeps the Windows Task Scheduler in sync with a crontab file.
//!
//! A crontab document is parsed line by line into [`ScheduleDescriptor`]s
//! (see [`crontask_parser`]) and handed to a [`Scheduler`] backend; the
//! production backend shells out to `schtasks.exe`. All tasks are registered
//! under a per-user name prefix so they can be enumerated and removed
//! without touching anything else on the machine.

pub mod config;
pub mod driver;
pub mod errors;
pub mod scheduler;

pub use crontask_parser::{parse_schedule_line, FieldKind, ScheduleError};
pub use crontask_schedule::{Month, ScheduleDescriptor, ScheduleKind, Weekday};
pub use driver::{apply_file, register_all, unregister_all};
pub use errors::{CrontaskError, Result};
pub use scheduler::{Scheduler, SchedulerError, Schtasks};
