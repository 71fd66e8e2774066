use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::LeaveStatus;

pub const DEFAULT_LEAVE_TITLE: &str = "Leave Application";
/// Longest span, in calendar days, a single leave may cover.
pub const MAX_LEAVE_DAYS: i64 = 366;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub title: String,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub status: LeaveStatus,
    pub approved_by: Option<Uuid>,
    pub hr_comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
    pub title: Option<String>,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveUpdate {
    pub leave_id: Uuid,
    pub title: Option<String>,
    pub reason: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDecision {
    #[serde(alias = "leaveID")]
    pub leave_id: Uuid,
    pub status: LeaveStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveFilter {
    pub status: Option<LeaveStatus>,
}
