//! Sparse table reconstruction
//!
//! Assembles detections into a row/column grid: row bands come from
//! clustering vertical centers across the whole sheet, column bands from
//! clustering horizontal centers independently inside each row band.
//! Cells are immutable after assembly; looking up an address that holds
//! no detections returns an empty string and never materializes an entry.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::cluster::cluster_1d;
use crate::detection::Detection;

const EMPTY_CELL: &str = "";

/// The reconstructed table: a sparse `(row, col) -> text` mapping
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: BTreeMap<(usize, usize), String>,
    n_rows: usize,
    n_cols: usize,
}

impl Grid {
    /// Build a grid from OCR detections.
    ///
    /// Detections without a usable bounding box are excluded and logged;
    /// the rest each land in exactly one cell. Cell text is the space-join
    /// of member detections ordered left to right, trimmed.
    pub fn assemble(detections: &[Detection], row_eps: f32, col_eps: f32) -> Self {
        struct Item<'a> {
            text: &'a str,
            cx: f32,
            cy: f32,
        }

        let mut items = Vec::with_capacity(detections.len());
        for (i, det) in detections.iter().enumerate() {
            match det.center() {
                Some((cx, cy)) => items.push(Item { text: &det.text, cx, cy }),
                None => warn!("detection {} ({:?}) has no usable bounding box", i, det.text),
            }
        }

        if items.is_empty() {
            return Self::default();
        }

        let ys: Vec<f32> = items.iter().map(|it| it.cy).collect();
        let row_of = cluster_1d(&ys, row_eps);
        let n_rows = row_of.iter().max().map_or(0, |&r| r + 1);

        // Column clustering runs independently inside each row band
        let mut members: BTreeMap<(usize, usize), Vec<(f32, &str)>> = BTreeMap::new();
        let mut n_cols = 0;
        for row in 0..n_rows {
            let row_items: Vec<&Item> = items
                .iter()
                .zip(&row_of)
                .filter(|(_, &r)| r == row)
                .map(|(it, _)| it)
                .collect();
            if row_items.is_empty() {
                continue;
            }
            let xs: Vec<f32> = row_items.iter().map(|it| it.cx).collect();
            let col_of = cluster_1d(&xs, col_eps);
            n_cols = n_cols.max(col_of.iter().max().map_or(0, |&c| c + 1));
            for (item, &col) in row_items.iter().zip(&col_of) {
                members
                    .entry((row, col))
                    .or_default()
                    .push((item.cx, item.text));
            }
        }

        let mut cells = BTreeMap::new();
        for ((row, col), mut texts) in members {
            texts.sort_by(|a, b| a.0.total_cmp(&b.0));
            let joined = texts
                .iter()
                .map(|(_, t)| *t)
                .collect::<Vec<_>>()
                .join(" ");
            cells.insert((row, col), joined.trim().to_string());
        }

        debug!("assembled grid: {} rows x {} cols, {} cells", n_rows, n_cols, cells.len());

        Self { cells, n_rows, n_cols }
    }

    /// Build a grid from already-addressed rows of cell text.
    ///
    /// Useful for fixtures and for re-ingesting a dumped grid; empty cells
    /// are not materialized, matching [`Grid::assemble`].
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cells = BTreeMap::new();
        let mut n_rows = 0;
        let mut n_cols = 0;
        for (row, texts) in rows.into_iter().enumerate() {
            for (col, text) in texts.into_iter().enumerate() {
                let text = text.as_ref().trim();
                n_rows = n_rows.max(row + 1);
                n_cols = n_cols.max(col + 1);
                if !text.is_empty() {
                    cells.insert((row, col), text.to_string());
                }
            }
        }
        Self { cells, n_rows, n_cols }
    }

    /// Cell text at `(row, col)`; empty string for an unoccupied address
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(&(row, col))
            .map_or(EMPTY_CELL, String::as_str)
    }

    /// Number of row bands
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of column bands (widest row)
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// True when no detections were assembled
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// One row as a dense list of cell texts
    pub fn row_texts(&self, row: usize) -> Vec<String> {
        (0..self.n_cols)
            .map(|col| self.cell(row, col).to_string())
            .collect()
    }

    /// The whole grid as dense rows, for diagnostics
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        (0..self.n_rows).map(|row| self.row_texts(row)).collect()
    }

    /// Iterate occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.cells
            .iter()
            .map(|(&(row, col), text)| (row, col, text.as_str()))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "grid: {} rows x {} cols", self.n_rows, self.n_cols)?;
        for row in 0..self.n_rows {
            let texts: Vec<String> = (0..self.n_cols)
                .map(|col| format!("'{}'", self.cell(row, col)))
                .collect();
            writeln!(f, "  row {}: [{}]", row, texts.join(", "))?;
        }
        Ok(())
    }
}
