use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{branch::BranchResponse, skill::SkillResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingType {
    Individual,
    Group,
}

impl PostingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingType::Individual => "INDIVIDUAL",
            PostingType::Group => "GROUP",
        }
    }

    pub fn parse(value: &str) -> Option<PostingType> {
        match value {
            "INDIVIDUAL" => Some(PostingType::Individual),
            "GROUP" => Some(PostingType::Group),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingStatus {
    Draft,
    Published,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Draft => "DRAFT",
            PostingStatus::Published => "PUBLISHED",
        }
    }

    pub fn parse(value: &str) -> Option<PostingStatus> {
        match value {
            "DRAFT" => Some(PostingStatus::Draft),
            "PUBLISHED" => Some(PostingStatus::Published),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostingRequest {
    pub branch_id: i32,
    pub title: String,
    pub posting_type: PostingType,
    pub status: PostingStatus,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_volunteers: i32,
    pub auto_closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostingRequest {
    pub branch_id: i32,
    pub title: String,
    pub posting_type: PostingType,
    pub status: PostingStatus,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_volunteers: i32,
    pub auto_closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingResponse {
    pub id: i32,
    pub branch: BranchResponse,
    pub title: String,
    pub posting_type: PostingType,
    pub status: PostingStatus,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_volunteers: i32,
    pub auto_closing_date: Option<NaiveDate>,
    pub skills: Vec<SkillResponse>,
}
