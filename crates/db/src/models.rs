use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i32,
    pub auth_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVolunteer {
    pub user_id: i32,
    pub hire_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub pronouns: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub user_id: i32,
    pub branch_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBranch {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSkill {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPosting {
    pub id: i32,
    pub branch_id: i32,
    pub title: String,
    pub posting_type: String,
    pub status: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_volunteers: i32,
    pub auto_closing_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShift {
    pub id: i32,
    pub posting_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSignup {
    pub shift_id: i32,
    pub user_id: i32,
    pub num_volunteers: i32,
    pub note: Option<String>,
    pub status: String,
}
