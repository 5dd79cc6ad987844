use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repetition rule applied to a time block template when expanding a bulk
/// shift request into concrete occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceInterval {
    None,
    Weekly,
    Biweekly,
    Monthly,
}

/// One wall-clock recurrence seed supplied by the caller. Strings are parsed
/// strictly as `YYYY-MM-DD` / `HH:mm`; templates are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlockTemplate {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// A concrete shift occurrence produced by recurrence expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Bulk shift-creation request: one week's worth of recurring patterns for a
/// posting, repeated up to and including `end_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkShiftRequest {
    pub posting_id: i32,
    pub times: Vec<TimeBlockTemplate>,
    pub end_date: String,
    pub recurrence_interval: RecurrenceInterval,
}

/// Single-shift update with wall-clock strings, parsed strictly as
/// `YYYY-MM-DD HH:mm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShiftRequest {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftResponse {
    pub id: i32,
    pub posting_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
