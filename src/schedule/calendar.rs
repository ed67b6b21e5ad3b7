//! Calendar event serialization
//!
//! Converts shift records into the calendar-API event shape: `summary`,
//! `description`, and `start`/`end` objects holding a local `dateTime`
//! string plus a timezone label. Records that cannot resolve (no date, or
//! neither times nor a special-duty flag) are dropped, never errors.

use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolve::ShiftRecord;

/// Default timezone label for serialized events
pub const DEFAULT_TIME_ZONE: &str = "Asia/Seoul";

/// One side of an event: local datetime plus timezone label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// A calendar-ready event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// Serialize shift records into calendar events.
///
/// An event is emitted only when the record's date resolved and either
/// both times are present or the special-duty flag is set. When the end
/// hour is numerically below the start hour the shift wraps past midnight
/// and the end date advances one day.
pub fn events_from_records(records: &[ShiftRecord], time_zone: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for record in records {
        let Some(date) = record.date else {
            debug!(
                "dropping record at ({}, {}): no date resolved",
                record.source_row, record.source_col
            );
            continue;
        };

        let event = match (record.start, record.end, record.is_special_duty) {
            (Some(start), Some(end), _) => {
                let end_date = if end.hour() < start.hour() {
                    date + Days::new(1)
                } else {
                    date
                };
                CalendarEvent {
                    summary: shift_summary(record),
                    description: record.raw_text.clone(),
                    start: EventTime {
                        date_time: local_datetime(date, start),
                        time_zone: time_zone.to_string(),
                    },
                    end: EventTime {
                        date_time: local_datetime(end_date, end),
                        time_zone: time_zone.to_string(),
                    },
                }
            }
            (_, _, true) => {
                // Special duty has no hours; emit a midnight marker so the
                // code still lands on the right day.
                let midnight = local_datetime(date, NaiveTime::MIN);
                CalendarEvent {
                    summary: format!("{} {}", record.staff_id, record.raw_text),
                    description: record.raw_text.clone(),
                    start: EventTime {
                        date_time: midnight.clone(),
                        time_zone: time_zone.to_string(),
                    },
                    end: EventTime {
                        date_time: midnight,
                        time_zone: time_zone.to_string(),
                    },
                }
            }
            _ => {
                debug!(
                    "dropping record at ({}, {}): no times and not special duty",
                    record.source_row, record.source_col
                );
                continue;
            }
        };
        events.push(event);
    }
    events
}

fn shift_summary(record: &ShiftRecord) -> String {
    match &record.position {
        Some(position) => format!("{} {}", record.staff_id, position),
        None => format!("{} 근무", record.staff_id),
    }
}

fn local_datetime(date: NaiveDate, time: NaiveTime) -> String {
    format!("{}T{}:00", date.format("%Y-%m-%d"), time.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        date: Option<(i32, u32, u32)>,
        start: Option<(u32, u32)>,
        end: Option<(u32, u32)>,
        special: bool,
    ) -> ShiftRecord {
        ShiftRecord {
            staff_id: "김서정".to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            start: start.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            end: end.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            is_special_duty: special,
            position: None,
            raw_text: if special { "CL".to_string() } else { "13-17".to_string() },
            source_row: 1,
            source_col: 1,
        }
    }

    #[test]
    fn test_time_range_event() {
        let records = [record(Some((2025, 1, 3)), Some((13, 0)), Some((17, 0)), false)];
        let events = events_from_records(&records, DEFAULT_TIME_ZONE);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.date_time, "2025-01-03T13:00:00");
        assert_eq!(events[0].end.date_time, "2025-01-03T17:00:00");
        assert_eq!(events[0].start.time_zone, "Asia/Seoul");
        assert_eq!(events[0].summary, "김서정 근무");
    }

    #[test]
    fn test_overnight_shift_wraps_end_date() {
        let records = [record(Some((2025, 1, 31)), Some((22, 0)), Some((2, 0)), false)];
        let events = events_from_records(&records, DEFAULT_TIME_ZONE);
        assert_eq!(events[0].start.date_time, "2025-01-31T22:00:00");
        assert_eq!(events[0].end.date_time, "2025-02-01T02:00:00");
    }

    #[test]
    fn test_special_duty_event() {
        let records = [record(Some((2025, 1, 4)), None, None, true)];
        let events = events_from_records(&records, DEFAULT_TIME_ZONE);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "김서정 CL");
        assert_eq!(events[0].start.date_time, "2025-01-04T00:00:00");
        assert_eq!(events[0].end.date_time, "2025-01-04T00:00:00");
    }

    #[test]
    fn test_dateless_record_is_dropped() {
        let records = [record(None, Some((13, 0)), Some((17, 0)), false)];
        assert!(events_from_records(&records, DEFAULT_TIME_ZONE).is_empty());
    }

    #[test]
    fn test_opaque_record_is_dropped() {
        let records = [record(Some((2025, 1, 3)), None, None, false)];
        assert!(events_from_records(&records, DEFAULT_TIME_ZONE).is_empty());
    }

    #[test]
    fn test_position_appears_in_summary() {
        let mut rec = record(Some((2025, 1, 3)), Some((13, 0)), Some((17, 0)), false);
        rec.position = Some("오픈".to_string());
        let events = events_from_records(&[rec], DEFAULT_TIME_ZONE);
        assert_eq!(events[0].summary, "김서정 오픈");
    }

    #[test]
    fn test_wire_field_names() {
        let records = [record(Some((2025, 1, 3)), Some((13, 0)), Some((17, 0)), false)];
        let events = events_from_records(&records, DEFAULT_TIME_ZONE);
        let json = serde_json::to_string(&events[0]).unwrap();
        assert!(json.contains("\"dateTime\""));
        assert!(json.contains("\"timeZone\""));
    }
}
