use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::NoticeAudience;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub audience: NoticeAudience,
    pub department_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A department or employee id is required when the audience names one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub audience: Option<NoticeAudience>,
    pub department_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeUpdate {
    pub notice_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience: Option<NoticeAudience>,
    pub department_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}
