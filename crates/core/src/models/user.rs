use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{branch::BranchResponse, skill::SkillResponse};

/// Role of a user account. The role decides which profile record, if any,
/// may exist alongside the base user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "volunteer" => Some(Role::Volunteer),
            "employee" => Some(Role::Employee),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create a base user account.
///
/// Either `password` (directory-originated signup) or `auth_id` (an identity
/// that already exists in the directory, e.g. an OAuth signup) must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub auth_id: Option<String>,
    pub role: Role,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

/// A user merged from its two backing systems: the relational row plus the
/// directory-sourced email. Email is never stored relationally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub auth_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVolunteerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub auth_id: Option<String>,
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub pronouns: Option<String>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
    #[serde(default)]
    pub branch_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVolunteerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub pronouns: Option<String>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
    #[serde(default)]
    pub branch_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerResponse {
    pub id: i32,
    pub auth_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub pronouns: Option<String>,
    pub skills: Vec<SkillResponse>,
    pub branches: Vec<BranchResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub auth_id: Option<String>,
    pub phone_number: Option<String>,
    pub branch_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub branch_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: i32,
    pub auth_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub branch_id: i32,
}
