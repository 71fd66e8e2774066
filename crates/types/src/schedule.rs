use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    enums::{ScheduleStatus, ShiftType},
    time_format::{hhmm, hhmm_opt},
};

pub const DEFAULT_LOCATION: &str = "Office";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub shift: ShiftType,
    pub location: String,
    pub notes: String,
    pub status: ScheduleStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub shift: Option<ShiftType>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChanges {
    pub employee_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub shift: Option<ShiftType>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ScheduleStatus>,
}

/// Body of the date-range query. Both bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employee_id: Option<Uuid>,
}
