//! Cell field parsing
//!
//! Classifies a grid cell's text as a working-hours range, a special-duty
//! code (closing shift, day off), or opaque text. The time-range match is
//! always attempted first; special-duty tokens are only consulted when it
//! fails, so a cell like "CL" that superficially resembles a range fragment
//! still classifies as special duty.

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default special-duty tokens: closing, day off, and locale equivalents
pub const DEFAULT_SPECIAL_TOKENS: &[&str] = &["CL", "X", "마감", "휴무"];

/// "H1-H2.MM": start at the top of H1, end at H2:MM
static DOTTED_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*[-./~]\s*(\d{1,2})\.(\d{2})").unwrap());

/// "H1[:MM] - H2[:MM]" with any of the range delimiters
static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*[-./~]\s*(\d{1,2})(?::(\d{2}))?").unwrap()
});

/// Classification of one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellField {
    /// Working-hours range
    TimeRange { start: NaiveTime, end: NaiveTime },
    /// Non-time-range shift code, e.g. closing or day off
    SpecialDuty { token: String },
    /// No temporal meaning
    Text,
}

/// Classify a cell's text.
pub fn parse_cell(text: &str, special_tokens: &[String]) -> CellField {
    if let Some((start, end)) = parse_time_range(text) {
        return CellField::TimeRange { start, end };
    }
    if let Some(token) = find_special_token(text, special_tokens) {
        return CellField::SpecialDuty { token };
    }
    CellField::Text
}

/// Parse a time range like "13-17", "11:30~15", or "12-15.30".
///
/// Returns `None` when no range is present or an hour/minute token is out
/// of range; callers treat that as "not a time range", never as an error.
pub fn parse_time_range(text: &str) -> Option<(NaiveTime, NaiveTime)> {
    if text.is_empty() {
        return None;
    }

    // The dotted-minutes form must win over the plain match, which would
    // otherwise read "12-15.30" as 12:00-15:00. A dotted match with an
    // out-of-range field falls through to the plain form rather than
    // rejecting the cell; it can latch onto a minutes fragment in text
    // like "12:30-15.30".
    if let Some(range) = DOTTED_RANGE.captures(text).and_then(|caps| dotted_range(&caps)) {
        return Some(range);
    }

    let caps = TIME_RANGE.captures(text)?;
    let h1: u32 = caps[1].parse().ok()?;
    let m1: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let h2: u32 = caps[3].parse().ok()?;
    let m2: u32 = caps.get(4).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let start = NaiveTime::from_hms_opt(h1, m1, 0)?;
    let end = NaiveTime::from_hms_opt(h2, m2, 0)?;
    Some((start, end))
}

fn dotted_range(caps: &regex::Captures) -> Option<(NaiveTime, NaiveTime)> {
    let h1: u32 = caps[1].parse().ok()?;
    let h2: u32 = caps[2].parse().ok()?;
    let m2: u32 = caps[3].parse().ok()?;
    let start = NaiveTime::from_hms_opt(h1, 0, 0)?;
    let end = NaiveTime::from_hms_opt(h2, m2, 0)?;
    Some((start, end))
}

/// First special-duty token occurring anywhere in the text
fn find_special_token(text: &str, tokens: &[String]) -> Option<String> {
    tokens
        .iter()
        .find(|token| !token.is_empty() && text.contains(token.as_str()))
        .cloned()
}

/// Owned copy of the default special-duty token set
pub fn default_special_tokens() -> Vec<String> {
    DEFAULT_SPECIAL_TOKENS.iter().map(|s| s.to_string()).collect()
}

/// Zero-padded "HH:MM" rendering for the output contract
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_plain_hour_range() {
        assert_eq!(parse_time_range("13-17"), Some((hm(13, 0), hm(17, 0))));
        assert_eq!(parse_time_range("9-13"), Some((hm(9, 0), hm(13, 0))));
    }

    #[test]
    fn test_all_range_delimiters() {
        for text in ["11-15", "11.15", "11/15", "11~15"] {
            assert_eq!(parse_time_range(text), Some((hm(11, 0), hm(15, 0))), "{}", text);
        }
    }

    #[test]
    fn test_colon_minutes() {
        assert_eq!(parse_time_range("11:30-15"), Some((hm(11, 30), hm(15, 0))));
        assert_eq!(parse_time_range("9-13:45"), Some((hm(9, 0), hm(13, 45))));
        assert_eq!(parse_time_range("10:15~18:30"), Some((hm(10, 15), hm(18, 30))));
    }

    #[test]
    fn test_dotted_minutes_form() {
        assert_eq!(parse_time_range("12-15.30"), Some((hm(12, 0), hm(15, 30))));
    }

    #[test]
    fn test_bad_dotted_match_falls_back_to_plain_form() {
        // The dotted form only sees "30-15.30" here; 30 is not an hour, so
        // the plain reading 12:30-15:00 must still come through
        assert_eq!(parse_time_range("12:30-15.30"), Some((hm(12, 30), hm(15, 0))));
    }

    #[test]
    fn test_range_embedded_in_noise() {
        assert_eq!(parse_time_range("근무 13-17 !"), Some((hm(13, 0), hm(17, 0))));
    }

    #[test]
    fn test_non_ranges_return_none() {
        assert_eq!(parse_time_range("CL"), None);
        assert_eq!(parse_time_range(""), None);
        assert_eq!(parse_time_range("김서정"), None);
        assert_eq!(parse_time_range("13"), None);
    }

    #[test]
    fn test_out_of_range_hours_rejected() {
        assert_eq!(parse_time_range("25-30"), None);
        assert_eq!(parse_time_range("12:75-15"), None);
    }

    #[test]
    fn test_cell_priority_time_range_first() {
        let tokens = default_special_tokens();
        // "X 13-17" holds both a special token and a range; the range wins
        assert_eq!(
            parse_cell("X 13-17", &tokens),
            CellField::TimeRange { start: hm(13, 0), end: hm(17, 0) }
        );
    }

    #[test]
    fn test_special_duty_tokens() {
        let tokens = default_special_tokens();
        assert_eq!(parse_cell("CL", &tokens), CellField::SpecialDuty { token: "CL".into() });
        assert_eq!(parse_cell("X", &tokens), CellField::SpecialDuty { token: "X".into() });
        assert_eq!(parse_cell("휴무", &tokens), CellField::SpecialDuty { token: "휴무".into() });
        assert_eq!(
            parse_cell("마감조", &tokens),
            CellField::SpecialDuty { token: "마감".into() }
        );
    }

    #[test]
    fn test_opaque_text() {
        let tokens = default_special_tokens();
        assert_eq!(parse_cell("비고", &tokens), CellField::Text);
        assert_eq!(parse_cell("", &tokens), CellField::Text);
    }

    #[test]
    fn test_format_time_zero_pads() {
        assert_eq!(format_time(hm(9, 5)), "09:05");
        assert_eq!(format_time(hm(13, 0)), "13:00");
    }
}
