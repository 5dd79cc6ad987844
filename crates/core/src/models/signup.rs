use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignupStatus {
    Pending,
    Confirmed,
    Canceled,
    Published,
}

impl SignupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupStatus::Pending => "PENDING",
            SignupStatus::Confirmed => "CONFIRMED",
            SignupStatus::Canceled => "CANCELED",
            SignupStatus::Published => "PUBLISHED",
        }
    }

    pub fn parse(value: &str) -> Option<SignupStatus> {
        match value {
            "PENDING" => Some(SignupStatus::Pending),
            "CONFIRMED" => Some(SignupStatus::Confirmed),
            "CANCELED" => Some(SignupStatus::Canceled),
            "PUBLISHED" => Some(SignupStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSignupRequest {
    pub shift_id: i32,
    pub user_id: i32,
    pub num_volunteers: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSignupRequest {
    pub num_volunteers: Option<i32>,
    pub note: Option<String>,
    pub status: Option<SignupStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub shift_id: i32,
    pub user_id: i32,
    pub num_volunteers: i32,
    pub note: Option<String>,
    pub status: SignupStatus,
}
