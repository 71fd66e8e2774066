use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{Portal, RequestPriority, RequestStatus, RequestType};

/// Internal ticket raised by or on behalf of an employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub department_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub request_type: RequestType,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub created_by: Portal,
    pub approved_by: Option<Uuid>,
    pub hr_comments: Option<String>,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub title: String,
    pub content: String,
    pub request_type: Option<RequestType>,
    pub priority: Option<RequestPriority>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequestByHr {
    pub employee_id: Uuid,
    pub title: String,
    pub content: String,
    pub request_type: Option<RequestType>,
    pub priority: Option<RequestPriority>,
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContentUpdate {
    pub request_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusUpdate {
    pub request_id: Uuid,
    pub status: RequestStatus,
    pub hr_comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPriorityUpdate {
    pub request_id: Uuid,
    pub priority: RequestPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestClose {
    pub request_id: Uuid,
    pub hr_comments: Option<String>,
}
