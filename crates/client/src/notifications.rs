use ems_types::notification::{
    ATTENDANCE_UPDATED, DASHBOARD_REFRESH, HR_DASHBOARD_REFRESH, LEAVE_UPDATED, NotificationEvent,
    REQUEST_UPDATED, SALARY_CREATED,
};
use url::Url;

use crate::{
    endpoints,
    error::{ClientError, ClientResult},
};

/// `ws://` / `wss://` address of the notifications socket for `token`.
pub fn notifications_url(base_url: &str, token: &str) -> ClientResult<String> {
    let mut url = Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::UnsupportedScheme(scheme.to_string()))?;
    url.set_path(endpoints::WS);
    url.query_pairs_mut().clear().append_pair("token", token);
    Ok(url.into())
}

/// Server frames the portals react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    DashboardRefresh,
    LeaveUpdated(serde_json::Value),
    RequestUpdated(serde_json::Value),
    SalaryCreated(serde_json::Value),
    AttendanceUpdated(serde_json::Value),
    Other(NotificationEvent),
}

impl Notification {
    pub fn parse(frame: &str) -> ClientResult<Self> {
        let event: NotificationEvent = serde_json::from_str(frame)?;
        Ok(Self::from(event))
    }
}

impl From<NotificationEvent> for Notification {
    fn from(event: NotificationEvent) -> Self {
        match event.event.as_str() {
            DASHBOARD_REFRESH => Notification::DashboardRefresh,
            LEAVE_UPDATED => Notification::LeaveUpdated(event.data),
            REQUEST_UPDATED => Notification::RequestUpdated(event.data),
            SALARY_CREATED => Notification::SalaryCreated(event.data),
            ATTENDANCE_UPDATED => Notification::AttendanceUpdated(event.data),
            _ => Notification::Other(event),
        }
    }
}

/// Frame an HR client sends to make every dashboard in its organization
/// refresh.
pub fn hr_dashboard_refresh_frame() -> ClientResult<String> {
    let frame = NotificationEvent::new(HR_DASHBOARD_REFRESH, serde_json::Value::Null);
    Ok(serde_json::to_string(&frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn socket_url_follows_http_scheme() {
        assert_eq!(
            notifications_url("http://localhost:5001", "abc").unwrap(),
            "ws://localhost:5001/ws?token=abc"
        );
        assert_eq!(
            notifications_url("https://ems.example.com", "a.b.c").unwrap(),
            "wss://ems.example.com/ws?token=a.b.c"
        );
        assert!(notifications_url("ftp://ems.example.com", "t").is_err());
    }

    #[test]
    fn frames_map_to_notifications() {
        let leave = Notification::parse(r#"{"event":"leave:updated","data":{"leaveId":"x"}}"#).unwrap();
        assert_eq!(leave, Notification::LeaveUpdated(json!({"leaveId": "x"})));
        assert_eq!(
            Notification::parse(r#"{"event":"dashboard:refresh"}"#).unwrap(),
            Notification::DashboardRefresh
        );
        assert!(matches!(
            Notification::parse(r#"{"event":"something:else","data":1}"#).unwrap(),
            Notification::Other(_)
        ));
        assert!(Notification::parse("not json").is_err());
    }

    #[test]
    fn refresh_frame_names_the_hr_event() {
        let frame: NotificationEvent = serde_json::from_str(&hr_dashboard_refresh_frame().unwrap()).unwrap();
        assert_eq!(frame.event, HR_DASHBOARD_REFRESH);
    }
}
