//! Spatial table reconstruction
//!
//! Turns an unordered set of OCR detections into a sparse row/column grid.
//! Rows and columns are inferred from coordinate clustering, not from ruled
//! table lines.

pub mod cluster;
pub mod grid;

pub use cluster::{cluster_1d, DEFAULT_EPS};
pub use grid::Grid;
