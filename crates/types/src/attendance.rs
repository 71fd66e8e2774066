use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{enums::AttendanceStatus, time_format::hhmm_opt};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, with = "hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    pub work_hours: f64,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockStatus {
    pub is_clocked_in: bool,
    pub has_clocked_out: bool,
    pub today: Option<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub status: Option<AttendanceStatus>,
    #[serde(default, with = "hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceChanges {
    pub status: Option<AttendanceStatus>,
    #[serde(default, with = "hhmm_opt")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub check_out: Option<NaiveTime>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
