use nom::{
    bytes::complete::tag,
    character::complete::{char, space0},
    combinator::rest,
    sequence::preceded,
    IResult,
};

/// Classification of one raw crontab line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrontabLine<'a> {
    Blank,
    /// A `#` comment with no effect on later lines.
    Comment,
    /// A `# tn: NAME` comment naming the next entry line.
    NameOverride(&'a str),
    /// A candidate schedule entry, already trimmed.
    Entry(&'a str),
}

fn name_override(input: &str) -> IResult<&str, &str> {
    let (input, _) = char('#')(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag("tn:")(input)?;
    let (input, name) = preceded(space0, rest)(input)?;
    Ok((input, name.trim_end()))
}

/// Decide what a raw crontab line is before any field parsing happens.
pub fn classify_line(line: &str) -> CrontabLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return CrontabLine::Blank;
    }
    if trimmed.starts_with('#') {
        return match name_override(trimmed) {
            Ok((_, name)) if !name.is_empty() => CrontabLine::NameOverride(name),
            _ => CrontabLine::Comment,
        };
    }
    CrontabLine::Entry(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_whitespace_lines() {
        assert_eq!(CrontabLine::Blank, classify_line(""));
        assert_eq!(CrontabLine::Blank, classify_line("   \t"));
    }

    #[test]
    fn plain_comments() {
        assert_eq!(CrontabLine::Comment, classify_line("# just a note"));
        assert_eq!(CrontabLine::Comment, classify_line("   #indented"));
    }

    #[test]
    fn name_overrides() {
        assert_eq!(
            CrontabLine::NameOverride("nightly-backup"),
            classify_line("# tn: nightly-backup")
        );
        assert_eq!(
            CrontabLine::NameOverride("x"),
            classify_line("#tn:x")
        );
        assert_eq!(
            CrontabLine::NameOverride("spaced out"),
            classify_line("  #   tn:   spaced out  ")
        );
    }

    #[test]
    fn empty_override_is_just_a_comment() {
        assert_eq!(CrontabLine::Comment, classify_line("# tn:"));
        assert_eq!(CrontabLine::Comment, classify_line("# tn:   "));
    }

    #[test]
    fn double_hash_does_not_override() {
        assert_eq!(CrontabLine::Comment, classify_line("## tn: nope"));
    }

    #[test]
    fn entries_are_trimmed() {
        assert_eq!(
            CrontabLine::Entry("0 12 * * 1 run.sh"),
            classify_line("  0 12 * * 1 run.sh  ")
        );
    }
}
