use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DASHBOARD_REFRESH: &str = "dashboard:refresh";
pub const HR_DASHBOARD_REFRESH: &str = "hr:dashboard:refresh";
pub const LEAVE_UPDATED: &str = "leave:updated";
pub const REQUEST_UPDATED: &str = "request:updated";
pub const SALARY_CREATED: &str = "salary:created";
pub const ATTENDANCE_UPDATED: &str = "attendance:updated";
pub const SCHEDULE_UPDATED: &str = "schedule:updated";
pub const NOTICE_PUBLISHED: &str = "notice:published";

/// Frame exchanged over the notifications socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl NotificationEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}
