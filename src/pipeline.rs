//! End-to-end schedule extraction pipeline
//!
//! Ties the stages together: detections -> grid -> headers -> shift
//! records -> calendar events. Each run is a pure function over its
//! inputs, so independent sheets or staff queries can be processed
//! concurrently without coordination.

use tracing::info;

use crate::config::ParserConfig;
use crate::detection::Detection;
use crate::schedule::{
    events_from_records, interpret_headers_at, resolve_shifts, CalendarEvent, HeaderMap,
    ResolveOptions, ShiftRecord,
};
use crate::table::Grid;

/// Band index of a grid row when the header block repeats every
/// `rows_per_band` rows
pub fn band_of(row: usize, rows_per_band: usize) -> usize {
    assert!(rows_per_band > 0, "band height must be positive");
    row / rows_per_band
}

/// A sheet after spatial reconstruction and header interpretation
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    /// The reconstructed grid, exposed for diagnostics
    pub grid: Grid,
    /// Per-column header metadata
    pub headers: HeaderMap,
    /// Inclusive row range this sheet covers; `None` means the whole grid
    pub band: Option<(usize, usize)>,
}

/// Schedule extraction pipeline
#[derive(Debug, Clone, Default)]
pub struct ScheduleParser {
    config: ParserConfig,
}

impl ScheduleParser {
    /// Create a parser with default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reconstruct the grid and read its headers.
    pub fn parse(&self, detections: &[Detection]) -> ParsedSheet {
        let grid = Grid::assemble(detections, self.config.row_eps, self.config.col_eps);
        let headers = interpret_headers_at(
            &grid,
            &self.config.header,
            self.config.base_year,
            self.config.base_month,
            0,
        );
        info!(
            "parsed sheet: {} rows x {} cols, {} header rows",
            grid.n_rows(),
            grid.n_cols(),
            headers.header_rows.len()
        );
        ParsedSheet { grid, headers, band: None }
    }

    /// Parse one band of a multi-week sheet.
    ///
    /// Multi-week sheets repeat the header block per band: header rows are
    /// read at the band's starting row and later resolution is restricted
    /// to the band's rows, so other weeks' rows never pick up this band's
    /// dates. [`band_of`] maps a row back to its band index.
    pub fn parse_band(&self, detections: &[Detection], band: (usize, usize)) -> ParsedSheet {
        let grid = Grid::assemble(detections, self.config.row_eps, self.config.col_eps);
        let headers = interpret_headers_at(
            &grid,
            &self.config.header,
            self.config.base_year,
            self.config.base_month,
            band.0,
        );
        info!(
            "parsed band rows {}-{}: {} cols, {} header rows",
            band.0,
            band.1,
            grid.n_cols(),
            headers.header_rows.len()
        );
        ParsedSheet { grid, headers, band: Some(band) }
    }

    /// Parse a batch of independent detection lists.
    ///
    /// Each sheet is processed in isolation; an input that yields nothing
    /// (for example, all boxes malformed) produces an empty sheet without
    /// disturbing the rest of the batch.
    pub fn parse_batch(&self, inputs: &[Vec<Detection>]) -> Vec<ParsedSheet> {
        inputs.iter().map(|input| self.parse(input)).collect()
    }

    /// Shift records for one staff identifier
    pub fn shifts_for(&self, sheet: &ParsedSheet, staff_id: &str) -> Vec<ShiftRecord> {
        resolve_shifts(&sheet.grid, &sheet.headers, staff_id, &self.resolve_options(sheet))
    }

    /// Calendar events for one staff identifier
    pub fn events_for(&self, sheet: &ParsedSheet, staff_id: &str) -> Vec<CalendarEvent> {
        let records = self.shifts_for(sheet, staff_id);
        events_from_records(&records, &self.config.time_zone)
    }

    fn resolve_options(&self, sheet: &ParsedSheet) -> ResolveOptions {
        ResolveOptions {
            name_col: self.config.name_col,
            match_mode: self.config.match_mode,
            special_tokens: self.config.special_duty_tokens.clone(),
            row_range: sheet.band,
        }
    }
}
