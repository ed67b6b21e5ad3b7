//! Schedule interpretation layer
//!
//! Reads meaning out of the reconstructed grid: header rows become
//! per-column date/position/time metadata, cells classify as time ranges
//! or special-duty codes, matched rows become shift records, and records
//! serialize into calendar events.

pub mod calendar;
pub mod cell;
pub mod header;
pub mod resolve;

pub use calendar::{events_from_records, CalendarEvent, EventTime, DEFAULT_TIME_ZONE};
pub use cell::{parse_cell, parse_time_range, CellField};
pub use header::{interpret_headers, interpret_headers_at, HeaderConfig, HeaderMap};
pub use resolve::{resolve_shifts, MatchMode, ResolveOptions, ShiftRecord};
