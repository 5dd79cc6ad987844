use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use volly_core::models::shift::{
    BulkShiftRequest, RecurrenceInterval, TimeBlock, TimeBlockTemplate,
};
use volly_core::scheduling::{
    expand_time_blocks, is_duplicate, parse_shift_times, same_minute, select_time_blocks,
    validate_templates, validate_time_block,
};

fn template(date: &str, start: &str, end: &str) -> TimeBlockTemplate {
    TimeBlockTemplate {
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn block(start: &str, end: &str) -> TimeBlock {
    TimeBlock {
        start_time: ts(start),
        end_time: ts(end),
    }
}

fn ts(value: &str) -> DateTime<Utc> {
    let naive = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .expect("bad timestamp in test");
    Utc.from_utc_datetime(&naive)
}

fn bulk_request(
    times: Vec<TimeBlockTemplate>,
    end_date: &str,
    recurrence_interval: RecurrenceInterval,
) -> BulkShiftRequest {
    BulkShiftRequest {
        posting_id: 1,
        times,
        end_date: end_date.to_string(),
        recurrence_interval,
    }
}

#[test]
fn test_validate_templates_rejects_empty_list() {
    let err = validate_templates(&[]).unwrap_err();
    assert!(err.contains("at least one time block"));
}

#[rstest]
#[case("2024-13-01", "09:00", "17:00")]
#[case("01/06/2024", "09:00", "17:00")]
#[case("2024-06-03", "9am", "17:00")]
#[case("2024-06-03", "09:00", "5pm")]
#[case("2024-06-03", "09:00:00", "17:00")]
fn test_validate_templates_rejects_malformed_fields(
    #[case] date: &str,
    #[case] start: &str,
    #[case] end: &str,
) {
    let result = validate_templates(&[template(date, start, end)]);
    assert!(result.is_err());
}

#[test]
fn test_validate_templates_accepts_six_day_span() {
    let templates = vec![
        template("2024-06-03", "09:00", "12:00"),
        template("2024-06-09", "09:00", "12:00"),
    ];
    assert!(validate_templates(&templates).is_ok());
}

#[test]
fn test_validate_templates_rejects_eight_day_span() {
    let templates = vec![
        template("2024-06-03", "09:00", "12:00"),
        template("2024-06-11", "09:00", "12:00"),
    ];
    let err = validate_templates(&templates).unwrap_err();
    assert!(err.contains("single week"));
}

#[test]
fn test_validate_templates_week_window_is_order_independent() {
    let templates = vec![
        template("2024-06-11", "09:00", "12:00"),
        template("2024-06-03", "09:00", "12:00"),
    ];
    assert!(validate_templates(&templates).is_err());
}

#[test]
fn test_validate_templates_allows_end_before_start() {
    // Per-occurrence ordering is enforced during batch selection instead, so
    // one inverted template cannot abort a whole bulk request.
    let templates = vec![template("2024-06-03", "17:00", "09:00")];
    assert!(validate_templates(&templates).is_ok());
}

#[test]
fn test_validate_time_block_rejects_inverted_range() {
    let inverted = block("2024-06-03 17:00:00", "2024-06-03 09:00:00");
    assert!(validate_time_block(&inverted).is_err());
}

#[test]
fn test_validate_time_block_rejects_zero_length() {
    let empty = block("2024-06-03 09:00:00", "2024-06-03 09:00:00");
    assert!(validate_time_block(&empty).is_err());
}

#[test]
fn test_validate_time_block_rejects_cross_midnight() {
    let overnight = block("2024-06-03 22:00:00", "2024-06-04 02:00:00");
    let err = validate_time_block(&overnight).unwrap_err();
    assert!(err.contains("same day"));
}

#[test]
fn test_expand_none_emits_one_block_per_template() {
    let request = bulk_request(
        vec![
            template("2024-06-03", "09:00", "12:00"),
            template("2024-06-05", "13:00", "17:00"),
        ],
        "2024-12-31",
        RecurrenceInterval::None,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], block("2024-06-03 09:00:00", "2024-06-03 12:00:00"));
    assert_eq!(blocks[1], block("2024-06-05 13:00:00", "2024-06-05 17:00:00"));
}

#[test]
fn test_expand_none_ignores_end_date() {
    // A non-recurring template past the end date is still emitted once.
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "2024-01-01",
        RecurrenceInterval::None,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    assert_eq!(blocks.len(), 1);
}

#[test]
fn test_expand_weekly_steps_by_seven_days() {
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "2024-06-24",
        RecurrenceInterval::Weekly,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    let starts: Vec<_> = blocks.iter().map(|b| b.start_time).collect();
    assert_eq!(
        starts,
        vec![
            ts("2024-06-03 09:00:00"),
            ts("2024-06-10 09:00:00"),
            ts("2024-06-17 09:00:00"),
            ts("2024-06-24 09:00:00"),
        ]
    );
}

#[test]
fn test_expand_end_date_is_inclusive() {
    // End date falls exactly on an occurrence; it must be included.
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "2024-06-10",
        RecurrenceInterval::Weekly,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].start_time, ts("2024-06-10 09:00:00"));
}

#[test]
fn test_expand_biweekly_steps_by_fourteen_days() {
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "2024-07-01",
        RecurrenceInterval::Biweekly,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    let starts: Vec<_> = blocks.iter().map(|b| b.start_time).collect();
    assert_eq!(
        starts,
        vec![
            ts("2024-06-03 09:00:00"),
            ts("2024-06-17 09:00:00"),
            ts("2024-07-01 09:00:00"),
        ]
    );
}

#[test]
fn test_expand_monthly_is_a_fixed_28_day_step() {
    // Monthly recurrence is four weeks, not calendar months: starting
    // Jan 1 the next occurrences land on Jan 29 and Feb 26, never Feb 1.
    let request = bulk_request(
        vec![template("2024-01-01", "10:00", "14:00")],
        "2024-03-01",
        RecurrenceInterval::Monthly,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    let starts: Vec<_> = blocks.iter().map(|b| b.start_time).collect();
    assert_eq!(
        starts,
        vec![
            ts("2024-01-01 10:00:00"),
            ts("2024-01-29 10:00:00"),
            ts("2024-02-26 10:00:00"),
        ]
    );
}

#[test]
fn test_expand_preserves_template_order() {
    let request = bulk_request(
        vec![
            template("2024-06-05", "09:00", "12:00"),
            template("2024-06-03", "09:00", "12:00"),
        ],
        "2024-06-12",
        RecurrenceInterval::Weekly,
    );

    let blocks = expand_time_blocks(&request).unwrap();
    // All occurrences of the first template come before any of the second,
    // even though the second template's date is earlier.
    assert_eq!(blocks[0].start_time, ts("2024-06-05 09:00:00"));
    assert_eq!(blocks[1].start_time, ts("2024-06-12 09:00:00"));
    assert_eq!(blocks[2].start_time, ts("2024-06-03 09:00:00"));
    assert_eq!(blocks[3].start_time, ts("2024-06-10 09:00:00"));
}

#[test]
fn test_expand_rejects_malformed_end_date() {
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "June 30",
        RecurrenceInterval::Weekly,
    );
    assert!(expand_time_blocks(&request).is_err());
}

#[rstest]
#[case("2024-06-03 09:00:00", "2024-06-03 09:00:30", true)]
#[case("2024-06-03 09:00:59", "2024-06-03 09:00:00", true)]
#[case("2024-06-03 09:00:59", "2024-06-03 09:01:00", false)]
#[case("2024-06-03 09:00:00", "2024-06-03 08:59:59", false)]
fn test_same_minute_truncates_seconds(
    #[case] a: &str,
    #[case] b: &str,
    #[case] expected: bool,
) {
    assert_eq!(same_minute(ts(a), ts(b)), expected);
}

#[test]
fn test_is_duplicate_requires_both_endpoints_to_match() {
    let existing = block("2024-06-03 09:00:00", "2024-06-03 12:00:00");

    let same_start_only = block("2024-06-03 09:00:00", "2024-06-03 13:00:00");
    assert!(!is_duplicate(&existing, &same_start_only));

    let same_end_only = block("2024-06-03 10:00:00", "2024-06-03 12:00:00");
    assert!(!is_duplicate(&existing, &same_end_only));

    let seconds_differ = block("2024-06-03 09:00:30", "2024-06-03 12:00:45");
    assert!(is_duplicate(&existing, &seconds_differ));
}

#[test]
fn test_select_skips_duplicates_of_existing_shifts() {
    let existing = vec![block("2024-06-03 09:00:00", "2024-06-03 12:00:00")];
    let candidates = vec![
        block("2024-06-03 09:00:00", "2024-06-03 12:00:00"),
        block("2024-06-10 09:00:00", "2024-06-10 12:00:00"),
    ];

    let selection = select_time_blocks(&existing, candidates);
    assert_eq!(selection.accepted.len(), 1);
    assert_eq!(selection.accepted[0].start_time, ts("2024-06-10 09:00:00"));
    assert_eq!(selection.skipped.len(), 1);
    assert!(selection.skipped[0].1.contains("duplicate"));
}

#[test]
fn test_select_detects_duplicates_within_the_batch() {
    let candidates = vec![
        block("2024-06-03 09:00:00", "2024-06-03 12:00:00"),
        block("2024-06-03 09:00:00", "2024-06-03 12:00:00"),
    ];

    let selection = select_time_blocks(&[], candidates);
    assert_eq!(selection.accepted.len(), 1);
    assert_eq!(selection.skipped.len(), 1);
}

#[test]
fn test_select_skips_invalid_occurrences_without_aborting() {
    // One inverted candidate among five valid ones: the other four survive.
    let candidates = vec![
        block("2024-06-03 09:00:00", "2024-06-03 12:00:00"),
        block("2024-06-04 09:00:00", "2024-06-04 12:00:00"),
        block("2024-06-05 17:00:00", "2024-06-05 09:00:00"),
        block("2024-06-06 09:00:00", "2024-06-06 12:00:00"),
        block("2024-06-07 09:00:00", "2024-06-07 12:00:00"),
    ];

    let selection = select_time_blocks(&[], candidates);
    assert_eq!(selection.accepted.len(), 4);
    assert_eq!(selection.skipped.len(), 1);
    assert_eq!(selection.skipped[0].0.start_time, ts("2024-06-05 17:00:00"));
}

#[test]
fn test_select_is_idempotent_against_prior_batch() {
    // Re-running the same request against the shifts it created accepts
    // nothing new.
    let request = bulk_request(
        vec![template("2024-06-03", "09:00", "12:00")],
        "2024-06-17",
        RecurrenceInterval::Weekly,
    );
    let first = select_time_blocks(&[], expand_time_blocks(&request).unwrap());
    assert_eq!(first.accepted.len(), 3);

    let second = select_time_blocks(&first.accepted, expand_time_blocks(&request).unwrap());
    assert!(second.accepted.is_empty());
    assert_eq!(second.skipped.len(), 3);
}

#[test]
fn test_parse_shift_times_round_trip() {
    let block = parse_shift_times("2024-06-03 09:00", "2024-06-03 12:30").unwrap();
    assert_eq!(block.start_time, ts("2024-06-03 09:00:00"));
    assert_eq!(block.end_time, ts("2024-06-03 12:30:00"));
}

#[rstest]
#[case("2024-06-03T09:00", "2024-06-03 12:00")]
#[case("2024-06-03 09:00", "2024-06-03 08:00")]
#[case("2024-06-03 09:00", "2024-06-04 12:00")]
#[case("2024-06-03 09:00:00", "2024-06-03 12:00:00")]
fn test_parse_shift_times_rejects_bad_input(#[case] start: &str, #[case] end: &str) {
    assert!(parse_shift_times(start, end).is_err());
}
