use crontask_schedule::ScheduleDescriptor;
use thiserror::Error;

use classify::LineFields;

mod classify;
mod field;
mod line;
mod rules;

pub use field::{parse_field, FieldError, FieldSpec, FieldValues};
pub use line::{classify_line, CrontabLine};
pub use rules::FieldKind;

/// An error scoped to a single schedule line.
///
/// Every failure names the field it occurred in, so the caller can emit a
/// human-readable diagnostic. A failing line never affects other lines; the
/// driver reports it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The line is missing time fields or a command.
    #[error("too few fields")]
    TooFewFields,
    /// A field's text failed to parse.
    #[error("{field} has {source}")]
    Field {
        field: FieldKind,
        source: FieldError,
    },
    #[error("{field} must be single")]
    MustBeSingle { field: FieldKind },
    #[error("{field} is out of range")]
    OutOfRange { field: FieldKind },
    #[error("{field} interval is out of range")]
    IntervalOutOfRange { field: FieldKind },
}

/// Parse one crontab entry line into a normalized schedule descriptor.
///
/// The first five whitespace-separated tokens are time fields; everything
/// after them is the command, rejoined with single spaces:
///
/// ```crontab
/// ┌───────────── minute (0 - 59)
/// │ ┌───────────── hour (0 - 23)
/// │ │ ┌───────────── day of the month (1 - 31)
/// │ │ │ ┌───────────── month (1 - 12, or JAN - DEC)
/// │ │ │ │ ┌───────────── day of the week (0 - 7, or SUN - SAT; 0 and 7 are Sunday)
/// │ │ │ │ │
/// * * * * * command [args...]
/// ```
///
/// Each field is a comma-separated list of values and inclusive ranges,
/// optionally followed by one `/step`, and `*` alone means "every". The
/// coarsest applicable recurrence wins: a wildcard minute is a MINUTE
/// schedule, else a wildcard hour is HOURLY, else a constrained day of week
/// is WEEKLY, else a wildcard day of month is DAILY, and everything that
/// remains is MONTHLY. Because the backend supports one trigger time per
/// task, the minute and hour fields must hold a single value when
/// constrained; the trigger time defaults unconstrained components to 0.
///
/// ```rust
/// use crontask_parser::parse_schedule_line;
/// use crontask_schedule::{ScheduleKind, Weekday};
///
/// let descriptor = parse_schedule_line("task-001", "0 12 * * 1 run.sh arg").unwrap();
/// assert_eq!(ScheduleKind::Weekly, descriptor.kind);
/// assert_eq!(vec![Weekday::Mon], descriptor.days_of_week);
/// assert_eq!("12:00", descriptor.start_time.format("%H:%M").to_string());
/// assert_eq!("run.sh arg", descriptor.command);
/// ```
pub fn parse_schedule_line(
    task_name: impl Into<String>,
    line: &str,
) -> Result<ScheduleDescriptor, ScheduleError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return Err(ScheduleError::TooFewFields);
    }
    let command = tokens[5..].join(" ");

    let fields = LineFields {
        minute: parse_and_check(tokens[0], FieldKind::Minute)?,
        hour: parse_and_check(tokens[1], FieldKind::Hour)?,
        day_of_month: parse_and_check(tokens[2], FieldKind::DayOfMonth)?,
        month: parse_and_check(tokens[3], FieldKind::Month)?,
        day_of_week: parse_and_check(tokens[4], FieldKind::DayOfWeek)?,
    };

    Ok(classify::build_descriptor(task_name.into(), command, fields))
}

fn parse_and_check(input: &str, kind: FieldKind) -> Result<FieldSpec, ScheduleError> {
    let spec = parse_field(input, kind).map_err(|source| ScheduleError::Field {
        field: kind,
        source,
    })?;
    kind.validate(&spec)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use crontask_schedule::{Month, ScheduleKind, Weekday};

    fn parse(line: &str) -> ScheduleDescriptor {
        parse_schedule_line("test", line).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn weekly_line() {
        let d = parse("0 12 * * 1 run.sh arg");
        assert_eq!(ScheduleKind::Weekly, d.kind);
        assert_eq!(None, d.interval);
        assert_eq!(vec![Weekday::Mon], d.days_of_week);
        assert!(d.days_of_month.is_empty());
        assert!(d.months.is_empty());
        assert_eq!(at(12, 0), d.start_time);
        assert_eq!("run.sh arg", d.command);
    }

    #[test]
    fn minute_line_with_interval() {
        let d = parse("*/15 * * * * echo hi");
        assert_eq!(ScheduleKind::Minute, d.kind);
        assert_eq!(Some(15), d.interval);
        assert_eq!(at(0, 0), d.start_time);
        assert_eq!("echo hi", d.command);
    }

    #[test]
    fn monthly_line_with_month_constraint() {
        let d = parse("0 0 1 jan,jun * backup.sh");
        assert_eq!(ScheduleKind::Monthly, d.kind);
        assert_eq!(vec![1], d.days_of_month);
        assert_eq!(vec![Month::Jan, Month::Jun], d.months);
        assert!(d.days_of_week.is_empty());
        assert_eq!(at(0, 0), d.start_time);
    }

    #[test]
    fn monthly_line_without_month_constraint() {
        let d = parse("0 0 1,15 * * rotate.sh");
        assert_eq!(ScheduleKind::Monthly, d.kind);
        assert_eq!(vec![1, 15], d.days_of_month);
        assert!(d.months.is_empty());
    }

    #[test]
    fn hourly_line() {
        let d = parse("15 * * * * poll.sh");
        assert_eq!(ScheduleKind::Hourly, d.kind);
        assert_eq!(None, d.interval);
        assert_eq!(at(0, 15), d.start_time);
    }

    #[test]
    fn hourly_line_with_interval() {
        let d = parse("0 */4 * * * rollup");
        assert_eq!(ScheduleKind::Hourly, d.kind);
        assert_eq!(Some(4), d.interval);
    }

    #[test]
    fn daily_line() {
        let d = parse("30 6 * * * brew.sh");
        assert_eq!(ScheduleKind::Daily, d.kind);
        assert_eq!(at(6, 30), d.start_time);
        assert!(d.days_of_week.is_empty());
        assert!(d.days_of_month.is_empty());
    }

    #[test]
    fn weekly_wins_over_monthly() {
        // both day fields constrained: day of week takes priority and the
        // day-of-month constraint is dropped from the output
        let d = parse("0 12 15 * 1 run.sh");
        assert_eq!(ScheduleKind::Weekly, d.kind);
        assert_eq!(vec![Weekday::Mon], d.days_of_week);
        assert!(d.days_of_month.is_empty());
        assert!(d.months.is_empty());
    }

    #[test]
    fn weekly_with_interval_and_symbolic_range() {
        let d = parse("0 8 * * mon-fri/2 standup");
        assert_eq!(ScheduleKind::Weekly, d.kind);
        assert_eq!(Some(2), d.interval);
        assert_eq!(
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ],
            d.days_of_week
        );
    }

    #[test]
    fn weekday_zero_and_seven_collapse_to_one_sunday() {
        let d = parse("0 0 * * 0-7 weekly.sh");
        assert_eq!(ScheduleKind::Weekly, d.kind);
        assert_eq!(7, d.days_of_week.len());
        assert_eq!(Weekday::Sun, d.days_of_week[0]);
        assert_eq!(
            1,
            d.days_of_week
                .iter()
                .filter(|day| **day == Weekday::Sun)
                .count()
        );
    }

    #[test]
    fn command_is_rejoined_with_single_spaces() {
        let d = parse("0 12 * * 1   run.sh    a   b");
        assert_eq!("run.sh a b", d.command);
    }

    #[test]
    fn parsing_is_deterministic() {
        let line = "0 12 3,5-7 jan * run.sh arg";
        assert_eq!(parse(line), parse(line));
        // a line rebuilt from the normalized command parses identically
        let d = parse(line);
        let rebuilt = format!("0 12 3,5-7 jan * {}", d.command);
        assert_eq!(d, parse(&rebuilt));
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            Err(ScheduleError::TooFewFields),
            parse_schedule_line("test", "a b")
        );
        assert_eq!(
            Err(ScheduleError::TooFewFields),
            parse_schedule_line("test", "* * * * *")
        );
    }

    #[test]
    fn field_errors_name_the_field() {
        let err = parse_schedule_line("test", "1x 0 * * * cmd").unwrap_err();
        assert_eq!("minute has invalid literal", err.to_string());

        let err = parse_schedule_line("test", "0 0 1 foo * cmd").unwrap_err();
        assert_eq!("month has invalid literal", err.to_string());

        let err = parse_schedule_line("test", "0 0 * * 1/2/3 cmd").unwrap_err();
        assert_eq!("day of week has too many slashes", err.to_string());
    }

    #[test]
    fn range_errors_name_the_field() {
        let err = parse_schedule_line("test", "61 0 * * * cmd").unwrap_err();
        assert_eq!(
            ScheduleError::OutOfRange {
                field: FieldKind::Minute
            },
            err
        );
        assert_eq!("minute is out of range", err.to_string());

        let err = parse_schedule_line("test", "1,2 0 * * * cmd").unwrap_err();
        assert_eq!("minute must be single", err.to_string());

        let err = parse_schedule_line("test", "0 0 * */13 * cmd").unwrap_err();
        assert_eq!("month interval is out of range", err.to_string());
    }

    #[test]
    fn validation_covers_fields_the_kind_ignores() {
        // day of month is out of range even though day of week would win
        let err = parse_schedule_line("test", "0 12 32 * 1 cmd").unwrap_err();
        assert_eq!("day of month is out of range", err.to_string());
    }

    #[test]
    fn fields_fail_in_crontab_order() {
        let err = parse_schedule_line("test", "61 24 * * * cmd").unwrap_err();
        assert_eq!("minute is out of range", err.to_string());
    }
}
