//! shiftgrid - tabular shift-schedule reconstruction from OCR detections
//!
//! Takes the unordered text detections an OCR engine produces for a
//! photographed staff schedule and rebuilds the table: detections cluster
//! into rows and columns, header rows become per-column date/position/time
//! metadata, and matched staff rows become shift records and calendar
//! events. The OCR engine itself is an external collaborator; only its
//! output is consumed here.

pub mod config;
pub mod detection;
pub mod pipeline;
pub mod schedule;
pub mod table;

pub use config::ParserConfig;
pub use detection::{parse_detections, BoundingBox, Detection, InputError};
pub use pipeline::{band_of, ParsedSheet, ScheduleParser};
pub use schedule::{
    CalendarEvent, CellField, HeaderConfig, HeaderMap, MatchMode, ShiftRecord,
};
pub use table::Grid;
