//! Header interpretation
//!
//! Designated grid rows carry per-column metadata instead of per-staff
//! data: a date row (day-of-month tokens or delimited dates), an optional
//! position row, and an optional time-slot row. Position and time rows can
//! be pinned to fixed indices or located by keyword.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::Grid;

/// "M/D", "M-D", "YYYY.M.D" and friends; a 4-digit first group is a year
static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,4})[./-](\d{1,2})(?:[./-](\d{1,2}))?").unwrap());

/// Korean marker form: "13시", "13시 30분"
static MARKER_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*시(?:\s*(\d{1,2})\s*분)?").unwrap());

/// Bare "H" or "H:MM"
static PLAIN_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})(?::(\d{2}))?").unwrap());

/// Where to find header rows and how to recognize them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Row holding date tokens
    pub date_row: usize,
    /// Row holding position labels; `None` means locate it by keyword
    pub position_row: Option<usize>,
    /// Row holding time slots; `None` means locate it by keyword
    pub time_row: Option<usize>,
    /// Keywords marking a position row (matched in its first cell)
    pub position_keywords: Vec<String>,
    /// Keywords marking a time-slot row (matched anywhere in the row)
    pub time_keywords: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            date_row: 0,
            position_row: None,
            time_row: None,
            position_keywords: vec!["포지션".into(), "직책".into(), "position".into()],
            time_keywords: vec!["시간".into(), "time".into()],
        }
    }
}

/// Per-column metadata read from the header rows
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    /// Resolved date per column; impossible dates stay `None`
    pub dates: Vec<Option<NaiveDate>>,
    /// Position label per column
    pub positions: Vec<Option<String>>,
    /// Time slot per column
    pub time_slots: Vec<Option<NaiveTime>>,
    /// Rows consumed as headers; the resolver skips these as data rows
    pub header_rows: Vec<usize>,
}

impl HeaderMap {
    /// Date for a column, if one resolved
    pub fn date(&self, col: usize) -> Option<NaiveDate> {
        self.dates.get(col).copied().flatten()
    }

    /// Position label for a column
    pub fn position(&self, col: usize) -> Option<&str> {
        self.positions.get(col).and_then(|p| p.as_deref())
    }

    /// Time slot for a column
    pub fn time_slot(&self, col: usize) -> Option<NaiveTime> {
        self.time_slots.get(col).copied().flatten()
    }
}

/// Read header metadata from a grid.
///
/// `base_year`/`base_month` seed the carried year/month used by day-only
/// date tokens until a delimited token resolves them.
pub fn interpret_headers(
    grid: &Grid,
    config: &HeaderConfig,
    base_year: i32,
    base_month: u32,
) -> HeaderMap {
    interpret_headers_at(grid, config, base_year, base_month, 0)
}

/// Same as [`interpret_headers`], with header row indices shifted by
/// `band_start`. Multi-week sheets repeat their header rows every band;
/// callers interpret each band separately.
pub fn interpret_headers_at(
    grid: &Grid,
    config: &HeaderConfig,
    base_year: i32,
    base_month: u32,
    band_start: usize,
) -> HeaderMap {
    if grid.is_empty() {
        return HeaderMap::default();
    }

    let date_row = band_start + config.date_row;
    let mut header_rows = vec![date_row];
    let dates = extract_dates(&grid.row_texts(date_row), base_year, base_month);

    let position_row = config
        .position_row
        .map(|r| band_start + r)
        .or_else(|| detect_position_row(grid, &config.position_keywords));
    let positions = match position_row {
        Some(row) => {
            header_rows.push(row);
            grid.row_texts(row).iter().map(|t| position_label(t)).collect()
        }
        None => vec![None; grid.n_cols()],
    };

    let time_row = config
        .time_row
        .map(|r| band_start + r)
        .or_else(|| detect_time_row(grid, &config.time_keywords));
    let time_slots = match time_row {
        Some(row) => {
            header_rows.push(row);
            grid.row_texts(row).iter().map(|t| parse_time_slot(t)).collect()
        }
        None => vec![None; grid.n_cols()],
    };

    header_rows.sort_unstable();
    header_rows.dedup();

    debug!(
        "headers: date row {}, position row {:?}, time row {:?}",
        date_row, position_row, time_row
    );

    HeaderMap { dates, positions, time_slots, header_rows }
}

/// Resolve date tokens for one header row.
///
/// A pure-digit cell is a day-of-month under the carried year/month; a
/// delimited token updates the carried values. An impossible calendar date
/// yields `None` for that column and the walk continues.
pub fn extract_dates(
    row_texts: &[String],
    base_year: i32,
    base_month: u32,
) -> Vec<Option<NaiveDate>> {
    let mut year = base_year;
    let mut month = base_month;
    let mut dates = Vec::with_capacity(row_texts.len());

    for text in row_texts {
        let text = text.trim();
        if text.is_empty() {
            dates.push(None);
            continue;
        }

        if text.chars().all(|c| c.is_ascii_digit()) {
            let date = text
                .parse::<u32>()
                .ok()
                .and_then(|day| NaiveDate::from_ymd_opt(year, month, day));
            dates.push(date);
            continue;
        }

        let Some(caps) = DATE_TOKEN.captures(text) else {
            dates.push(None);
            continue;
        };

        let first = &caps[1];
        let second: u32 = caps[2].parse().unwrap_or(0);
        let day = match (first.len(), caps.get(3)) {
            // "YYYY.M.D"
            (4, Some(d)) => {
                year = first.parse().unwrap_or(year);
                month = second;
                d.as_str().parse().unwrap_or(0)
            }
            // "M.D" or "M.D.x" with a short first group: month/day
            _ => {
                month = first.parse().unwrap_or(0);
                second
            }
        };
        dates.push(NaiveDate::from_ymd_opt(year, month, day));
    }
    dates
}

/// Position label for a cell; `''`, `-`, and `X` mean absent
fn position_label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    match trimmed {
        "" | "-" | "X" => None,
        _ => Some(trimmed.to_string()),
    }
}

/// Parse a time-slot cell: "13", "13:30", "13시", "13시 30분"
pub fn parse_time_slot(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = MARKER_TIME.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    let caps = PLAIN_TIME.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// First row whose name-column cell carries a position keyword
fn detect_position_row(grid: &Grid, keywords: &[String]) -> Option<usize> {
    (0..grid.n_rows()).find(|&row| {
        let first = grid.cell(row, 0).to_lowercase();
        keywords.iter().any(|k| first.contains(&k.to_lowercase()))
    })
}

/// First row whose joined text carries a time keyword
fn detect_time_row(grid: &Grid, keywords: &[String]) -> Option<usize> {
    (0..grid.n_rows()).find(|&row| {
        let joined = grid.row_texts(row).join(" ").to_lowercase();
        keywords.iter().any(|k| joined.contains(&k.to_lowercase()))
    })
}
