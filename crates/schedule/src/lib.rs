use std::fmt;

use chrono::NaiveTime;
use getset::Getters;
use serde::{Deserialize, Serialize};

/// Recurrence type of a schedule, from finest to coarsest.
///
/// The variants map one-to-one onto the Task Scheduler's `/sc` values and are
/// mutually exclusive: a descriptor has exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleKind {
    Minute,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScheduleKind::Minute => "MINUTE",
            ScheduleKind::Hourly => "HOURLY",
            ScheduleKind::Daily => "DAILY",
            ScheduleKind::Weekly => "WEEKLY",
            ScheduleKind::Monthly => "MONTHLY",
        };
        write!(f, "{s}")
    }
}

/// A month of the year, numbered 1 (JAN) through 12 (DEC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Look up a month from its 1-based number.
    pub fn from_number(n: i32) -> Option<Month> {
        match n {
            1..=12 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// Look up a month from its case-insensitive three-letter abbreviation.
    ///
    /// ```rust
    /// use crontask_schedule::Month;
    ///
    /// assert_eq!(Some(Month::Jan), Month::from_token("jan"));
    /// assert_eq!(Some(Month::Dec), Month::from_token("DEC"));
    /// assert_eq!(None, Month::from_token("mon"));
    /// ```
    pub fn from_token(token: &str) -> Option<Month> {
        Self::ALL
            .iter()
            .find(|m| m.abbrev().eq_ignore_ascii_case(token))
            .copied()
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Canonical three-letter abbreviation, as the Task Scheduler spells it.
    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

/// A day of the week, numbered 0 (SUN) through 6 (SAT).
///
/// On input, 7 is a synonym for Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Look up a weekday from its number; both 0 and 7 map to Sunday.
    ///
    /// ```rust
    /// use crontask_schedule::Weekday;
    ///
    /// assert_eq!(Some(Weekday::Sun), Weekday::from_number(0));
    /// assert_eq!(Some(Weekday::Sun), Weekday::from_number(7));
    /// assert_eq!(Some(Weekday::Sat), Weekday::from_number(6));
    /// assert_eq!(None, Weekday::from_number(8));
    /// ```
    pub fn from_number(n: i32) -> Option<Weekday> {
        match n {
            0..=6 => Some(Self::ALL[n as usize]),
            7 => Some(Weekday::Sun),
            _ => None,
        }
    }

    /// Look up a weekday from its case-insensitive three-letter abbreviation.
    pub fn from_token(token: &str) -> Option<Weekday> {
        Self::ALL
            .iter()
            .find(|d| d.abbrev().eq_ignore_ascii_case(token))
            .copied()
    }

    /// Weekday number, 0 (SUN) through 6 (SAT).
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Canonical three-letter abbreviation, as the Task Scheduler spells it.
    pub fn abbrev(self) -> &'static str {
        match self {
            Weekday::Sun => "SUN",
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

/// The normalized, backend-agnostic representation of one task's recurrence
/// schedule.
///
/// Built once per crontab line and immutable thereafter. Exactly one of
/// `days_of_week` / `days_of_month` is non-empty, and only when `kind`
/// matches (Weekly resp. Monthly); `months` is non-empty only for Monthly
/// schedules that carry a month constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDescriptor {
    /// Caller-supplied task identifier.
    pub task_name: String,
    /// The command line to run, normalized to single spaces between tokens.
    pub command: String,
    pub kind: ScheduleKind,
    /// Repeat-every-N for the chosen kind, when a step interval was given.
    pub interval: Option<u32>,
    pub days_of_week: Vec<Weekday>,
    pub days_of_month: Vec<u32>,
    pub months: Vec<Month>,
    /// First trigger time of day; unconstrained components default to 0.
    pub start_time: NaiveTime,
}
