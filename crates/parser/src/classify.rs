use chrono::NaiveTime;
use crontask_schedule::{Month, ScheduleDescriptor, ScheduleKind, Weekday};

use crate::field::{FieldSpec, FieldValues};

/// The five validated fields of one schedule line, in crontab order.
pub(crate) struct LineFields {
    pub minute: FieldSpec,
    pub hour: FieldSpec,
    pub day_of_month: FieldSpec,
    pub month: FieldSpec,
    pub day_of_week: FieldSpec,
}

/// Collapse five validated fields into one schedule kind and its derived
/// sub-parameters.
///
/// Precedence, first match wins: minute wildcard → MINUTE; hour wildcard →
/// HOURLY; day of week constrained → WEEKLY; day of month wildcard → DAILY;
/// otherwise MONTHLY. A constrained day of month on a WEEKLY line has
/// already been validated but is dropped here; the day-of-week constraint
/// wins.
pub(crate) fn build_descriptor(
    task_name: String,
    command: String,
    fields: LineFields,
) -> ScheduleDescriptor {
    let interval_of = |step: i64| (step > 0).then_some(step as u32);

    let (kind, interval) = if fields.minute.values.is_every() {
        (ScheduleKind::Minute, interval_of(fields.minute.step))
    } else if fields.hour.values.is_every() {
        (ScheduleKind::Hourly, interval_of(fields.hour.step))
    } else if !fields.day_of_week.values.is_every() {
        (ScheduleKind::Weekly, interval_of(fields.day_of_week.step))
    } else if fields.day_of_month.values.is_every() {
        (ScheduleKind::Daily, interval_of(fields.day_of_month.step))
    } else {
        (ScheduleKind::Monthly, interval_of(fields.month.step))
    };

    let mut days_of_week = Vec::new();
    let mut days_of_month = Vec::new();
    let mut months = Vec::new();
    match kind {
        ScheduleKind::Weekly => {
            if let FieldValues::List(values) = &fields.day_of_week.values {
                // 0 and 7 are both Sunday; keep the symbol list a set
                for v in values {
                    let day = Weekday::from_number(*v).unwrap();
                    if !days_of_week.contains(&day) {
                        days_of_week.push(day);
                    }
                }
            }
        }
        ScheduleKind::Monthly => {
            if let FieldValues::List(values) = &fields.day_of_month.values {
                days_of_month = values.iter().map(|v| *v as u32).collect();
            }
            if let FieldValues::List(values) = &fields.month.values {
                months = values
                    .iter()
                    .map(|v| Month::from_number(*v).unwrap())
                    .collect();
            }
        }
        _ => {}
    }

    let hour = fields.hour.values.first_or(0) as u32;
    let minute = fields.minute.values.first_or(0) as u32;
    let start_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();

    ScheduleDescriptor {
        task_name,
        command,
        kind,
        interval,
        days_of_week,
        days_of_month,
        months,
        start_time,
    }
}
