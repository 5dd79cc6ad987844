use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_string, to_value};
use volly_core::models::{
    posting::{PostingStatus, PostingType},
    shift::{BulkShiftRequest, RecurrenceInterval, TimeBlockTemplate},
    signup::{CreateSignupRequest, SignupStatus},
    user::{CreateUserRequest, CreateVolunteerRequest, Role, UserResponse},
};

#[rstest]
#[case(Role::Volunteer, "volunteer")]
#[case(Role::Employee, "employee")]
#[case(Role::Admin, "admin")]
fn test_role_string_round_trip(#[case] role: Role, #[case] text: &str) {
    assert_eq!(role.as_str(), text);
    assert_eq!(Role::parse(text), Some(role));
    assert_eq!(role.to_string(), text);
}

#[test]
fn test_role_parse_rejects_unknown_values() {
    assert_eq!(Role::parse("VOLUNTEER"), None);
    assert_eq!(Role::parse("manager"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn test_role_serializes_lowercase() {
    assert_eq!(to_value(Role::Volunteer).unwrap(), json!("volunteer"));
    assert_eq!(to_value(Role::Admin).unwrap(), json!("admin"));
}

#[rstest]
#[case(RecurrenceInterval::None, "NONE")]
#[case(RecurrenceInterval::Weekly, "WEEKLY")]
#[case(RecurrenceInterval::Biweekly, "BIWEEKLY")]
#[case(RecurrenceInterval::Monthly, "MONTHLY")]
fn test_recurrence_interval_serializes_screaming(
    #[case] interval: RecurrenceInterval,
    #[case] text: &str,
) {
    assert_eq!(to_value(interval).unwrap(), json!(text));
    let parsed: RecurrenceInterval = from_str(&format!("\"{text}\"")).unwrap();
    assert_eq!(parsed, interval);
}

#[test]
fn test_bulk_shift_request_deserialization() {
    let payload = json!({
        "posting_id": 7,
        "times": [
            {"date": "2024-06-03", "start_time": "09:00", "end_time": "12:00"}
        ],
        "end_date": "2024-06-24",
        "recurrence_interval": "WEEKLY"
    });

    let request: BulkShiftRequest = serde_json::from_value(payload).unwrap();
    assert_eq!(request.posting_id, 7);
    assert_eq!(
        request.times,
        vec![TimeBlockTemplate {
            date: "2024-06-03".to_string(),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
        }]
    );
    assert_eq!(request.end_date, "2024-06-24");
    assert_eq!(request.recurrence_interval, RecurrenceInterval::Weekly);
}

#[test]
fn test_create_user_request_serialization() {
    let request = CreateUserRequest {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@example.org".to_string(),
        password: Some("hunter2hunter2".to_string()),
        auth_id: None,
        role: Role::Volunteer,
        phone_number: Some("555-0100".to_string()),
    };

    let json = to_string(&request).expect("Failed to serialize user request");
    let deserialized: CreateUserRequest = from_str(&json).expect("Failed to deserialize");

    assert_eq!(deserialized.first_name, request.first_name);
    assert_eq!(deserialized.last_name, request.last_name);
    assert_eq!(deserialized.email, request.email);
    assert_eq!(deserialized.password, request.password);
    assert_eq!(deserialized.auth_id, request.auth_id);
    assert_eq!(deserialized.role, request.role);
    assert_eq!(deserialized.phone_number, request.phone_number);
}

#[test]
fn test_create_volunteer_request_defaults_relations_to_empty() {
    let payload = json!({
        "first_name": "Dana",
        "last_name": "Reyes",
        "email": "dana@example.org",
        "password": "hunter2hunter2",
        "auth_id": null,
        "phone_number": null,
        "hire_date": "2024-05-01",
        "date_of_birth": null,
        "pronouns": null
    });

    let request: CreateVolunteerRequest = serde_json::from_value(payload).unwrap();
    assert_eq!(request.hire_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert!(request.skill_ids.is_empty());
    assert!(request.branch_ids.is_empty());
}

#[test]
fn test_user_response_serialization() {
    let response = UserResponse {
        id: 12,
        auth_id: "dir_abc123".to_string(),
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@example.org".to_string(),
        role: Role::Employee,
        phone_number: None,
    };

    let json = to_string(&response).expect("Failed to serialize user response");
    let deserialized: UserResponse = from_str(&json).expect("Failed to deserialize");

    assert_eq!(deserialized.id, response.id);
    assert_eq!(deserialized.auth_id, response.auth_id);
    assert_eq!(deserialized.email, response.email);
    assert_eq!(deserialized.role, response.role);
}

#[rstest]
#[case(PostingType::Individual, "INDIVIDUAL")]
#[case(PostingType::Group, "GROUP")]
fn test_posting_type_round_trip(#[case] posting_type: PostingType, #[case] text: &str) {
    assert_eq!(posting_type.as_str(), text);
    assert_eq!(PostingType::parse(text), Some(posting_type));
}

#[rstest]
#[case(PostingStatus::Draft, "DRAFT")]
#[case(PostingStatus::Published, "PUBLISHED")]
fn test_posting_status_round_trip(#[case] status: PostingStatus, #[case] text: &str) {
    assert_eq!(status.as_str(), text);
    assert_eq!(PostingStatus::parse(text), Some(status));
}

#[rstest]
#[case(SignupStatus::Pending, "PENDING")]
#[case(SignupStatus::Confirmed, "CONFIRMED")]
#[case(SignupStatus::Canceled, "CANCELED")]
#[case(SignupStatus::Published, "PUBLISHED")]
fn test_signup_status_round_trip(#[case] status: SignupStatus, #[case] text: &str) {
    assert_eq!(status.as_str(), text);
    assert_eq!(SignupStatus::parse(text), Some(status));
}

#[test]
fn test_signup_status_parse_rejects_lowercase() {
    assert_eq!(SignupStatus::parse("pending"), None);
}

#[test]
fn test_create_signup_request_deserialization() {
    let payload = json!({
        "shift_id": 3,
        "user_id": 9,
        "num_volunteers": 2,
        "note": "bringing a friend"
    });

    let request: CreateSignupRequest = serde_json::from_value(payload).unwrap();
    assert_eq!(request.shift_id, 3);
    assert_eq!(request.user_id, 9);
    assert_eq!(request.num_volunteers, 2);
    assert_eq!(request.note.as_deref(), Some("bringing a friend"));
}
