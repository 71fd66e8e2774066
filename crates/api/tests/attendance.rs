mod common;

use api::notify::Room;
use axum::http::StatusCode;
use chrono::Duration;
use common::TestApp;
use ems_types::notification::ATTENDANCE_UPDATED;
use serde_json::json;

#[tokio::test]
async fn employee_clocks_in_and_out_once_per_day() {
    let app = TestApp::new().await;
    let token = app.employee_token("carol@acme.test");
    let mut events = app
        .state
        .hub
        .subscribe(vec![Room::Organization(app.org_id())]);

    let status = app.get("/api/v1/attendance/employee/my-status", &token).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.data()["isClockedIn"], false);
    assert!(status.data()["today"].is_null());

    let early_out = app
        .post("/api/v1/attendance/employee/clock-out", &token, json!({}))
        .await;
    assert_eq!(early_out.status, StatusCode::BAD_REQUEST);
    assert_eq!(early_out.message(), "Not clocked in yet");

    let clock_in = app
        .post("/api/v1/attendance/employee/clock-in", &token, json!({}))
        .await;
    assert_eq!(clock_in.status, StatusCode::OK);
    assert_eq!(clock_in.data()["status"], "Present");
    assert_eq!(clock_in.data()["date"], app.today.to_string());
    assert!(clock_in.data()["checkOut"].is_null());

    let event = events.next().await.unwrap();
    assert_eq!(event.event, ATTENDANCE_UPDATED);
    assert_eq!(event.data["employeeName"], "Carol Clark");

    let twice = app
        .post("/api/v1/attendance/employee/clock-in", &token, json!({}))
        .await;
    assert_eq!(twice.status, StatusCode::BAD_REQUEST);
    assert_eq!(twice.message(), "Already clocked in for today");

    let clock_out = app
        .post("/api/v1/attendance/employee/clock-out", &token, json!({}))
        .await;
    assert_eq!(clock_out.status, StatusCode::OK);
    assert!(clock_out.data()["checkOut"].is_string());

    let again = app
        .post("/api/v1/attendance/employee/clock-out", &token, json!({}))
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.message(), "Already clocked out");

    let status = app.get("/api/v1/attendance/employee/my-status", &token).await;
    assert_eq!(status.data()["isClockedIn"], true);
    assert_eq!(status.data()["hasClockedOut"], true);
}

#[tokio::test]
async fn my_attendance_honours_date_range() {
    let app = TestApp::new().await;
    let token = app.employee_token("alice@acme.test");

    let all = app.get("/api/v1/attendance/employee/my-attendance", &token).await;
    assert_eq!(all.status, StatusCode::OK);
    let rows = all.data().as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|row| row["workHours"] == 8.0));

    let start = app.today - Duration::days(3);
    let uri = format!(
        "/api/v1/attendance/employee/my-attendance?startDate={start}&endDate={}",
        app.today
    );
    let recent = app.get(&uri, &token).await;
    assert!(recent.data().as_array().unwrap().len() <= 3);

    let uri = format!(
        "/api/v1/attendance/employee/my-attendance?startDate={}&endDate={start}",
        app.today
    );
    let reversed = app.get(&uri, &token).await;
    assert_eq!(reversed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hr_manages_attendance_records() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let carol = app.employee_id("carol@acme.test");
    let day = app.today - Duration::days(40);

    let created = app
        .post(
            "/api/v1/attendance",
            &admin,
            json!({
                "employeeId": carol,
                "date": day,
                "checkIn": "09:00",
                "checkOut": "17:30",
                "comments": "  entered by HR ",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["workHours"], 8.5);
    assert_eq!(created.data()["comments"], "entered by HR");
    let id = created.data()["id"].as_str().unwrap().to_string();

    let duplicate = app
        .post(
            "/api/v1/attendance",
            &admin,
            json!({ "employeeId": carol, "date": day }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let updated = app
        .patch(
            &format!("/api/v1/attendance/{id}"),
            &admin,
            json!({ "checkOut": "18:00", "status": "Late" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["workHours"], 9.0);
    assert_eq!(updated.data()["status"], "Late");
    assert_eq!(updated.data()["checkIn"], "09:00");

    let history = app
        .get(
            &format!(
                "/api/v1/attendance/employee-history/{carol}?startDate={}&endDate={day}",
                day - Duration::days(1)
            ),
            &admin,
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.data().as_array().unwrap().len(), 1);

    let removed = app.delete(&format!("/api/v1/attendance/{id}"), &admin).await;
    assert_eq!(removed.status, StatusCode::OK);
    let gone = app.get(&format!("/api/v1/attendance/{id}"), &admin).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hr_lists_organization_attendance() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let all = app.get("/api/v1/attendance", &admin).await;
    assert_eq!(all.status, StatusCode::OK);
    let rows = all.data().as_array().unwrap();
    assert_eq!(rows.len(), 20);
    assert!(rows.iter().all(|row| row["employeeName"].is_string()));

    let bob = app.employee_id("bob@acme.test");
    let bob_rows = app
        .get(&format!("/api/v1/attendance/employee/{bob}"), &admin)
        .await;
    let bob_rows = bob_rows.data().as_array().unwrap();
    assert_eq!(bob_rows.len(), 10);
    assert!(bob_rows.iter().all(|row| row["workHours"] == 9.5));

    let stranger = uuid::Uuid::new_v4();
    let missing = app
        .get(&format!("/api/v1/attendance/employee/{stranger}"), &admin)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approved_leave_day_refuses_clock_in() {
    let app = TestApp::new().await;
    let token = app.employee_token("carol@acme.test");

    let leave = app
        .post(
            "/api/v1/leave/create-leave",
            &token,
            json!({ "reason": "Flu", "startDate": app.today, "endDate": app.today }),
        )
        .await;
    assert_eq!(leave.status, StatusCode::CREATED);
    let approved = app
        .patch(
            "/api/v1/leave/HR-update-leave",
            &app.admin_token(),
            json!({ "leaveId": leave.data()["id"], "status": "Approved" }),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);

    let clock_in = app
        .post("/api/v1/attendance/employee/clock-in", &token, json!({}))
        .await;
    assert_eq!(clock_in.status, StatusCode::BAD_REQUEST);
    assert_eq!(clock_in.message(), "Today is marked as approved leave");

    let status = app.get("/api/v1/attendance/employee/my-status", &token).await;
    assert_eq!(status.data()["isClockedIn"], false);
    assert_eq!(status.data()["today"]["status"], "Leave");
}
