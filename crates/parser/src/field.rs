use indexmap::IndexSet;
use thiserror::Error;

use crate::rules::FieldKind;

/// Reasons a single time field can fail to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("too many slashes")]
    TooManySlashes,
    #[error("too many hyphens")]
    TooManyHyphens,
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("min value greater than max")]
    MinGreaterThanMax,
    #[error("invalid step number")]
    InvalidStepNumber,
    #[error("no value")]
    NoValue,
}

/// Resolved values of one field: the wildcard, or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValues {
    /// `*` — the field imposes no constraint.
    Every,
    /// Distinct resolved integers in first-seen order.
    List(Vec<i32>),
}

impl FieldValues {
    pub fn is_every(&self) -> bool {
        matches!(self, FieldValues::Every)
    }

    /// First resolved value, or `default` for the wildcard.
    pub fn first_or(&self, default: i32) -> i32 {
        match self {
            FieldValues::Every => default,
            FieldValues::List(values) => values[0],
        }
    }
}

/// Result of parsing one crontab field, before range validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub values: FieldValues,
    /// Requested `/N` repeat interval; 0 when absent.
    pub step: i64,
}

/// Parse one crontab field: a comma-separated list of values and ranges,
/// optionally followed by a single `/step` suffix.
///
/// Tokens are decimal integers or, in the month and day-of-week fields, the
/// case-insensitive three-letter name of a month or weekday. A `*` denotes
/// "every" and is only accepted as the field's sole content. Ranges expand
/// inclusively and ascending; duplicates are silently dropped, keeping
/// first-seen order.
///
/// Range and cardinality checks are a separate step, see
/// [`FieldKind::validate`](crate::FieldKind::validate).
pub fn parse_field(input: &str, kind: FieldKind) -> Result<FieldSpec, FieldError> {
    if input.is_empty() {
        return Err(FieldError::NoValue);
    }
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() > 2 {
        return Err(FieldError::TooManySlashes);
    }

    let values = if parts[0] == "*" {
        FieldValues::Every
    } else {
        let mut seen: IndexSet<i32> = IndexSet::new();
        for item in parts[0].split(',') {
            let endpoints: Vec<&str> = item.split('-').collect();
            match endpoints[..] {
                [token] => {
                    seen.insert(resolve(kind, token)?);
                }
                [low, high] => {
                    let low = resolve(kind, low)?;
                    let high = resolve(kind, high)?;
                    if low > high {
                        return Err(FieldError::MinGreaterThanMax);
                    }
                    seen.extend(low..=high);
                }
                _ => return Err(FieldError::TooManyHyphens),
            }
        }
        FieldValues::List(seen.into_iter().collect())
    };

    let step = match parts.get(1) {
        Some(raw) => raw.parse().map_err(|_| FieldError::InvalidStepNumber)?,
        None => 0,
    };

    Ok(FieldSpec { values, step })
}

fn resolve(kind: FieldKind, token: &str) -> Result<i32, FieldError> {
    if let Ok(n) = token.parse() {
        return Ok(n);
    }
    kind.resolve_symbol(token).ok_or(FieldError::InvalidLiteral)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(values: FieldValues, step: i64) -> FieldSpec {
        FieldSpec { values, step }
    }

    #[test]
    fn wildcard() {
        assert_eq!(
            Ok(spec(FieldValues::Every, 0)),
            parse_field("*", FieldKind::Minute)
        );
    }

    #[test]
    fn wildcard_with_step() {
        assert_eq!(
            Ok(spec(FieldValues::Every, 5)),
            parse_field("*/5", FieldKind::Minute)
        );
    }

    #[test]
    fn wildcard_only_as_sole_item() {
        assert_eq!(
            Err(FieldError::InvalidLiteral),
            parse_field("*,5", FieldKind::Minute)
        );
        assert_eq!(
            Err(FieldError::InvalidLiteral),
            parse_field("5,*", FieldKind::Minute)
        );
    }

    #[test]
    fn range_expands_ascending() {
        assert_eq!(
            Ok(spec(FieldValues::List(vec![6, 7, 8, 9, 10]), 0)),
            parse_field("6-10", FieldKind::Minute)
        );
    }

    #[test]
    fn month_name_resolves() {
        assert_eq!(
            Ok(spec(FieldValues::List(vec![1]), 0)),
            parse_field("jan", FieldKind::Month)
        );
    }

    #[test]
    fn weekday_range_resolves() {
        assert_eq!(
            Ok(spec(FieldValues::List(vec![1, 2, 3, 4, 5]), 0)),
            parse_field("mon-fri", FieldKind::DayOfWeek)
        );
    }

    #[test]
    fn symbols_do_not_cross_fields() {
        assert_eq!(
            Err(FieldError::InvalidLiteral),
            parse_field("jan", FieldKind::DayOfWeek)
        );
        assert_eq!(
            Err(FieldError::InvalidLiteral),
            parse_field("mon", FieldKind::Minute)
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            Err(FieldError::MinGreaterThanMax),
            parse_field("5-3", FieldKind::Minute)
        );
        // FRI=5, SUN=0: a week wrapping over Sunday is not a valid range
        assert_eq!(
            Err(FieldError::MinGreaterThanMax),
            parse_field("fri-sun", FieldKind::DayOfWeek)
        );
    }

    #[test]
    fn empty_field_has_no_value() {
        assert_eq!(Err(FieldError::NoValue), parse_field("", FieldKind::Hour));
    }

    #[test]
    fn too_many_slashes() {
        assert_eq!(
            Err(FieldError::TooManySlashes),
            parse_field("1/2/3", FieldKind::Minute)
        );
    }

    #[test]
    fn too_many_hyphens() {
        assert_eq!(
            Err(FieldError::TooManyHyphens),
            parse_field("1-2-3", FieldKind::Minute)
        );
    }

    #[test]
    fn bad_step_literal() {
        assert_eq!(
            Err(FieldError::InvalidStepNumber),
            parse_field("*/x", FieldKind::Minute)
        );
    }

    #[test]
    fn negative_step_parses_for_later_range_check() {
        assert_eq!(
            Ok(spec(FieldValues::Every, -5)),
            parse_field("*/-5", FieldKind::Minute)
        );
    }

    #[test]
    fn duplicates_dropped_first_seen_order_kept() {
        assert_eq!(
            Ok(spec(FieldValues::List(vec![5, 3, 4]), 0)),
            parse_field("5,3,4,5,3", FieldKind::DayOfWeek)
        );
        assert_eq!(
            Ok(spec(FieldValues::List(vec![10, 11, 12, 2]), 0)),
            parse_field("10-12,2,11", FieldKind::DayOfMonth)
        );
    }

    #[test]
    fn list_mixing_values_and_ranges() {
        assert_eq!(
            Ok(spec(FieldValues::List(vec![1, 6, 7, 8, 12]), 3)),
            parse_field("jan,6-8,dec/3", FieldKind::Month)
        );
    }

    #[test]
    fn value_errors_take_precedence_over_step_errors() {
        assert_eq!(
            Err(FieldError::InvalidLiteral),
            parse_field("x/y", FieldKind::Minute)
        );
    }
}
