//! Recurring-shift expansion and conflict detection.
//!
//! A bulk shift request carries one week's worth of wall-clock templates, an
//! inclusive end date and a recurrence rule. Everything in this module is
//! pure: expansion and validation never touch I/O, so the batch protocol in
//! the API layer can run them inside its own transaction scope.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::{VollyError, VollyResult};
use crate::models::shift::{BulkShiftRequest, RecurrenceInterval, TimeBlock, TimeBlockTemplate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

impl RecurrenceInterval {
    /// Fixed step between occurrences. `Monthly` is a literal 4-week (28 day)
    /// step, not calendar-month arithmetic; callers rely on that.
    pub fn step(&self) -> Option<Duration> {
        match self {
            RecurrenceInterval::None => None,
            RecurrenceInterval::Weekly => Some(Duration::weeks(1)),
            RecurrenceInterval::Biweekly => Some(Duration::weeks(2)),
            RecurrenceInterval::Monthly => Some(Duration::weeks(4)),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("invalid date {value:?}, expected YYYY-MM-DD"))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| format!("invalid time {value:?}, expected HH:mm"))
}

/// Validates a set of recurrence templates as a whole. Failures here abort
/// the entire bulk request before any expansion or writes happen.
///
/// The per-template start/end ordering is deliberately *not* checked here:
/// a template whose end precedes its start produces occurrences that are
/// rejected one by one during batch selection, so one bad template does not
/// sink its siblings.
pub fn validate_templates(templates: &[TimeBlockTemplate]) -> Result<(), String> {
    if templates.is_empty() {
        return Err("at least one time block is required".to_string());
    }

    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    for (index, template) in templates.iter().enumerate() {
        let date =
            parse_date(&template.date).map_err(|reason| format!("time block {index}: {reason}"))?;
        parse_time(&template.start_time)
            .map_err(|reason| format!("time block {index}: {reason}"))?;
        parse_time(&template.end_time)
            .map_err(|reason| format!("time block {index}: {reason}"))?;

        earliest = Some(earliest.map_or(date, |d| d.min(date)));
        latest = Some(latest.map_or(date, |d| d.max(date)));
    }

    // Both are Some because the list is non-empty.
    if let (Some(first), Some(last)) = (earliest, latest) {
        if (last - first).num_days() >= 7 {
            return Err(format!(
                "time blocks must fall within a single week, but they span {} to {}",
                first, last
            ));
        }
    }

    Ok(())
}

/// Validates one concrete occurrence: the end must follow the start and both
/// must fall on the same calendar day.
pub fn validate_time_block(block: &TimeBlock) -> Result<(), String> {
    if block.end_time <= block.start_time {
        return Err(format!(
            "shift end {} is not after start {}",
            block.end_time, block.start_time
        ));
    }
    if block.start_time.date_naive() != block.end_time.date_naive() {
        return Err("shift must start and end on the same day".to_string());
    }
    Ok(())
}

/// Strictly parses single-shift start/end strings (`YYYY-MM-DD HH:mm`) into a
/// time block, applying the same occurrence-level checks as the batch path.
pub fn parse_shift_times(start: &str, end: &str) -> Result<TimeBlock, String> {
    let start_time = NaiveDateTime::parse_from_str(start, DATETIME_FORMAT)
        .map_err(|_| format!("invalid start time {start:?}, expected YYYY-MM-DD HH:mm"))?
        .and_utc();
    let end_time = NaiveDateTime::parse_from_str(end, DATETIME_FORMAT)
        .map_err(|_| format!("invalid end time {end:?}, expected YYYY-MM-DD HH:mm"))?
        .and_utc();

    let block = TimeBlock {
        start_time,
        end_time,
    };
    validate_time_block(&block)?;
    Ok(block)
}

/// Expands a bulk request into concrete time blocks.
///
/// Each template yields its first occurrence on the template's own date. With
/// no recurrence that single occurrence is emitted unconditionally; with a
/// recurrence rule, occurrences are emitted while their start is strictly
/// before `end_date + 1 day`, which makes the end date itself inclusive.
/// Template order is preserved, then occurrence order within each template.
pub fn expand_time_blocks(request: &BulkShiftRequest) -> VollyResult<Vec<TimeBlock>> {
    let end_date = parse_date(&request.end_date).map_err(VollyError::Validation)?;
    let bound = (end_date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();

    let mut blocks = Vec::new();
    for template in &request.times {
        let date = parse_date(&template.date).map_err(VollyError::Validation)?;
        let start = parse_time(&template.start_time).map_err(VollyError::Validation)?;
        let end = parse_time(&template.end_time).map_err(VollyError::Validation)?;

        let mut start_time = date.and_time(start).and_utc();
        let mut end_time = date.and_time(end).and_utc();

        match request.recurrence_interval.step() {
            None => blocks.push(TimeBlock {
                start_time,
                end_time,
            }),
            Some(step) => {
                while start_time < bound {
                    blocks.push(TimeBlock {
                        start_time,
                        end_time,
                    });
                    start_time += step;
                    end_time += step;
                }
            }
        }
    }

    Ok(blocks)
}

/// Minute-granularity timestamp equality; seconds and finer are ignored.
pub fn same_minute(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.timestamp().div_euclid(60) == b.timestamp().div_euclid(60)
}

/// Two shifts conflict when both endpoints match to the minute.
pub fn is_duplicate(existing: &TimeBlock, candidate: &TimeBlock) -> bool {
    same_minute(existing.start_time, candidate.start_time)
        && same_minute(existing.end_time, candidate.end_time)
}

/// Outcome of the sequential candidate fold for one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSelection {
    pub accepted: Vec<TimeBlock>,
    pub skipped: Vec<(TimeBlock, String)>,
}

/// Folds candidates in order, skipping (never aborting on) any candidate that
/// fails occurrence validation or duplicates an already-persisted shift or an
/// earlier-accepted sibling in the same batch. Order matters: each step must
/// observe the candidates accepted before it.
pub fn select_time_blocks(existing: &[TimeBlock], candidates: Vec<TimeBlock>) -> BatchSelection {
    let mut selection = BatchSelection::default();

    for candidate in candidates {
        if let Err(reason) = validate_time_block(&candidate) {
            selection.skipped.push((candidate, reason));
            continue;
        }

        let conflict = existing
            .iter()
            .chain(selection.accepted.iter())
            .any(|block| is_duplicate(block, &candidate));
        if conflict {
            selection.skipped.push((
                candidate,
                format!(
                    "duplicate shift from {} to {}",
                    candidate.start_time, candidate.end_time
                ),
            ));
            continue;
        }

        selection.accepted.push(candidate);
    }

    selection
}
