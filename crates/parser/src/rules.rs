use std::fmt;

use crontask_schedule::{Month, Weekday};

use crate::field::{FieldSpec, FieldValues};
use crate::ScheduleError;

/// One of the five time fields of a schedule line, in crontab order.
///
/// Each field carries its own validation rules: value bounds, the largest
/// accepted step interval, whether the backend supports more than one trigger
/// value, and which symbolic names resolve in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    /// Inclusive value bounds for the field.
    ///
    /// Day of week accepts 0 through 7; both ends are Sunday.
    pub fn bounds(self) -> (i32, i32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 7),
        }
    }

    /// Largest step interval the backend accepts for this field.
    pub fn max_step(self) -> i64 {
        match self {
            FieldKind::Minute => 1439,
            FieldKind::Hour => 23,
            FieldKind::DayOfMonth => 365,
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 52,
        }
    }

    /// Whether the backend supports only a single trigger value here.
    pub fn singular(self) -> bool {
        matches!(self, FieldKind::Minute | FieldKind::Hour)
    }

    /// Resolve a symbolic token against this field's own symbol category.
    ///
    /// Month names resolve only in the month field and weekday names only in
    /// the day-of-week field; the remaining fields take integers alone.
    pub fn resolve_symbol(self, token: &str) -> Option<i32> {
        match self {
            FieldKind::Month => Month::from_token(token).map(|m| m.number() as i32),
            FieldKind::DayOfWeek => Weekday::from_token(token).map(|d| d.number() as i32),
            _ => None,
        }
    }

    /// Apply this field's range and cardinality rules to a parsed spec.
    ///
    /// A wildcard passes the value check regardless of bounds. Check order
    /// is cardinality, then value range, then step range.
    pub fn validate(self, spec: &FieldSpec) -> Result<(), ScheduleError> {
        if let FieldValues::List(values) = &spec.values {
            if self.singular() && values.len() > 1 {
                return Err(ScheduleError::MustBeSingle { field: self });
            }
            let (min, max) = self.bounds();
            if values.iter().any(|v| *v < min || *v > max) {
                return Err(ScheduleError::OutOfRange { field: self });
            }
        }
        if spec.step < 0 || spec.step > self.max_step() {
            return Err(ScheduleError::IntervalOutOfRange { field: self });
        }
        Ok(())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day of month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day of week",
        };
        write!(f, "{s}")
    }
}
