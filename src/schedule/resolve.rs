//! Schedule resolution
//!
//! Scans grid rows for a target staff identifier and pairs each matched
//! row's non-empty cells with the per-column header metadata. OCR noise in
//! short Korean names motivates the permissive match modes; strictness is
//! a tunable, not a fixed behavior. Multiple matching rows all emit
//! records; no deduplication is performed.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;
use tracing::debug;

use super::cell::{parse_cell, CellField};
use super::header::HeaderMap;
use crate::table::Grid;

/// How a name cell is matched against the staff identifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchMode {
    /// The cell contains the full identifier as a substring
    Exact,
    /// At least `min_chars` distinct characters of the identifier occur in
    /// the cell; `min_chars = 1` tolerates single-character OCR
    /// substitutions in short names at the cost of false positives
    CharOverlap { min_chars: usize },
    /// Normalized Levenshtein similarity against the trimmed cell
    Similarity { threshold: f64 },
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Exact
    }
}

impl MatchMode {
    /// Does `cell` match the staff identifier under this mode?
    pub fn matches(&self, cell: &str, staff_id: &str) -> bool {
        if cell.trim().is_empty() || staff_id.is_empty() {
            return false;
        }
        match *self {
            MatchMode::Exact => cell.contains(staff_id),
            MatchMode::CharOverlap { min_chars } => {
                let mut seen = Vec::new();
                for c in staff_id.chars() {
                    if !seen.contains(&c) && cell.contains(c) {
                        seen.push(c);
                    }
                }
                seen.len() >= min_chars.max(1)
            }
            MatchMode::Similarity { threshold } => {
                normalized_levenshtein(cell.trim(), staff_id) >= threshold
            }
        }
    }
}

/// Resolution parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Column holding staff names
    pub name_col: usize,
    /// Match strictness
    pub match_mode: MatchMode,
    /// Special-duty tokens for cell classification
    pub special_tokens: Vec<String>,
    /// Restrict scanning to an inclusive row range (band), if set
    pub row_range: Option<(usize, usize)>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            name_col: 0,
            match_mode: MatchMode::default(),
            special_tokens: super::cell::default_special_tokens(),
            row_range: None,
        }
    }
}

/// One staff/date/duty tuple extracted from the grid
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    /// Staff identifier the row matched
    pub staff_id: String,
    /// Date from the column's header, when it resolved
    pub date: Option<NaiveDate>,
    /// Shift start, for time-range cells
    pub start: Option<NaiveTime>,
    /// Shift end, for time-range cells
    pub end: Option<NaiveTime>,
    /// Cell held a special-duty code instead of a time range
    pub is_special_duty: bool,
    /// Position label from the column's header
    pub position: Option<String>,
    /// Raw cell text
    pub raw_text: String,
    /// Grid address the record came from
    pub source_row: usize,
    pub source_col: usize,
}

/// Extract shift records for one staff identifier.
///
/// A record is emitted for every non-empty cell of every matched row,
/// whether or not the column's date resolved; dateless records are the
/// serializer's problem to drop.
pub fn resolve_shifts(
    grid: &Grid,
    headers: &HeaderMap,
    staff_id: &str,
    options: &ResolveOptions,
) -> Vec<ShiftRecord> {
    let mut records = Vec::new();
    let (first_row, last_row) = options
        .row_range
        .unwrap_or((0, grid.n_rows().saturating_sub(1)));

    for row in first_row..=last_row.min(grid.n_rows().saturating_sub(1)) {
        if headers.header_rows.contains(&row) {
            continue;
        }
        let name_cell = grid.cell(row, options.name_col);
        if !options.match_mode.matches(name_cell, staff_id) {
            continue;
        }
        debug!("row {} name cell '{}' matches '{}'", row, name_cell, staff_id);

        for col in 0..grid.n_cols() {
            if col == options.name_col {
                continue;
            }
            let text = grid.cell(row, col);
            if text.is_empty() {
                continue;
            }

            let (start, end, special) = match parse_cell(text, &options.special_tokens) {
                CellField::TimeRange { start, end } => (Some(start), Some(end), false),
                CellField::SpecialDuty { .. } => (None, None, true),
                CellField::Text => (None, None, false),
            };

            records.push(ShiftRecord {
                staff_id: staff_id.to_string(),
                date: headers.date(col),
                start,
                end,
                is_special_duty: special,
                position: headers.position(col).map(str::to_string),
                raw_text: text.to_string(),
                source_row: row,
                source_col: col,
            });
        }
    }
    records
}
