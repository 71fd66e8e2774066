mod common;

use api::notify::Room;
use axum::http::StatusCode;
use chrono::Duration;
use common::TestApp;
use ems_types::notification::SALARY_CREATED;
use serde_json::json;

#[tokio::test]
async fn manual_salary_applies_percentages() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let carol = app.employee_id("carol@acme.test");
    let mut inbox = app.state.hub.subscribe(vec![Room::User(carol)]);
    let due = app.today + Duration::days(5);

    let res = app
        .post(
            "/api/v1/salary/create",
            &admin,
            json!({
                "employeeID": carol,
                "basicpay": 2500,
                "bonusePT": 10,
                "deductionPT": 4,
                "duedate": due,
                "currency": "usd",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let data = res.data();
    assert_eq!(data["bonuses"], 250.0);
    assert_eq!(data["deductions"], 100.0);
    assert_eq!(data["netPay"], 2650.0);
    assert_eq!(data["currency"], "USD");
    assert_eq!(data["status"], "Pending");
    assert_eq!(data["paymentType"], "Manual");

    let event = inbox.next().await.unwrap();
    assert_eq!(event.event, SALARY_CREATED);

    let duplicate = app
        .post(
            "/api/v1/salary/create",
            &admin,
            json!({ "employeeId": carol, "basicPay": 1, "dueDate": due, "currency": "USD" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let negative = app
        .post(
            "/api/v1/salary/create",
            &admin,
            json!({ "employeeId": carol, "basicPay": -5, "dueDate": app.today, "currency": "USD" }),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let mine = app
        .get("/api/v1/salary/employee/my-salary", &app.employee_token("carol@acme.test"))
        .await;
    assert_eq!(mine.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn salary_update_recomputes_net_and_stamps_payment() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let alice = app.employee_id("alice@acme.test");
    let created = app
        .post(
            "/api/v1/salary/create",
            &admin,
            json!({ "employeeId": alice, "basicPay": 1000, "dueDate": app.today, "currency": "EUR" }),
        )
        .await;
    let id = created.data()["id"].as_str().unwrap().to_string();

    let res = app
        .patch(
            "/api/v1/salary/update",
            &admin,
            json!({ "salaryId": id, "bonuses": 50, "deductions": 20, "status": "Paid" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["netPay"], 1030.0);
    assert_eq!(res.data()["status"], "Paid");
    assert_eq!(res.data()["paymentDate"], app.today.to_string());

    let fetched = app.get(&format!("/api/v1/salary/{id}"), &admin).await;
    assert_eq!(fetched.data()["employeeName"], "Alice Andersen");

    let removed = app.delete(&format!("/api/v1/salary/delete/{id}"), &admin).await;
    assert_eq!(removed.status, StatusCode::OK);
    let gone = app.get(&format!("/api/v1/salary/{id}"), &admin).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn salary_routes_require_salary_permissions() {
    let app = TestApp::new().await;
    let manager = app.manager_token();

    let list = app.get("/api/v1/salary/all", &manager).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let run = app
        .post("/api/v1/salary/auto-payroll", &manager, json!({}))
        .await;
    assert_eq!(run.status, StatusCode::FORBIDDEN);

    let employee = app
        .get("/api/v1/salary/all", &app.employee_token("alice@acme.test"))
        .await;
    assert_eq!(employee.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn calculation_splits_regular_and_overtime_hours() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let start = app.today - Duration::days(14);
    let end = app.today - Duration::days(1);

    let alice = app
        .post(
            "/api/v1/salary/calculate",
            &admin,
            json!({
                "employeeId": app.employee_id("alice@acme.test"),
                "startDate": start,
                "endDate": end,
                "bonusPercentage": 10,
            }),
        )
        .await;
    assert_eq!(alice.status, StatusCode::OK);
    let breakdown = &alice.data()["breakdown"];
    assert_eq!(breakdown["daysWorked"], 10);
    assert_eq!(breakdown["regularHours"], 80.0);
    assert_eq!(breakdown["overtimeHours"], 0.0);
    assert_eq!(breakdown["grossPay"], 1376.0);
    assert_eq!(breakdown["tax"], 68.8);
    assert_eq!(breakdown["bonus"], 137.6);
    assert_eq!(breakdown["netPay"], 1444.8);
    assert!(alice.data()["salary"].is_null());

    let bob = app
        .post(
            "/api/v1/salary/calculate",
            &admin,
            json!({
                "employeeId": app.employee_id("bob@acme.test"),
                "startDate": start,
                "endDate": end,
                "save": true,
            }),
        )
        .await;
    assert_eq!(bob.status, StatusCode::OK);
    let breakdown = &bob.data()["breakdown"];
    assert_eq!(breakdown["overtimeHours"], 15.0);
    assert_eq!(breakdown["overtimeRate"], 25.8);
    assert_eq!(breakdown["grossPay"], 1763.0);
    assert_eq!(breakdown["netPay"], 1674.85);
    let saved = &bob.data()["salary"];
    assert_eq!(saved["paymentType"], "Auto-calculated");
    assert_eq!(saved["dueDate"], end.to_string());
    assert_eq!(saved["deductions"], 88.15);

    let backwards = app
        .post(
            "/api/v1/salary/calculate",
            &admin,
            json!({ "employeeId": app.employee_id("bob@acme.test"), "startDate": end, "endDate": start }),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auto_payroll_pays_each_active_employee_once() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let period_end = app.today - Duration::days(1);

    let first = app
        .post(
            "/api/v1/salary/auto-payroll",
            &admin,
            json!({ "periodEnd": period_end }),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let report = first.data();
    assert_eq!(report["processed"], 2);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["periodStart"], (app.today - Duration::days(14)).to_string());
    let salaries = report["salaries"].as_array().unwrap();
    assert!(salaries.iter().all(|s| s["status"] == "Auto-Generated"));
    assert!(salaries.iter().all(|s| s["paymentType"] == "Auto-Payroll"));

    let second = app
        .post(
            "/api/v1/salary/auto-payroll",
            &admin,
            json!({ "periodEnd": period_end }),
        )
        .await;
    assert_eq!(second.data()["processed"], 0);
    assert_eq!(second.data()["skipped"], 3);

    let all = app.get("/api/v1/salary/all", &admin).await;
    assert_eq!(all.data().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn payroll_settings_are_validated_and_stored() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let current = app.get("/api/v1/salary/settings", &admin).await;
    assert_eq!(current.data()["hourlyRate"], 17.2);
    assert_eq!(current.data()["periodDays"], 14);

    let invalid = app
        .put(
            "/api/v1/salary/settings",
            &admin,
            json!({
                "hourlyRate": 20.0,
                "overtimeMultiplier": 0.5,
                "taxRate": 5.0,
                "standardDayHours": 8.0,
                "periodDays": 14,
                "currency": "USD",
            }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let saved = app
        .put(
            "/api/v1/salary/settings",
            &admin,
            json!({
                "hourlyRate": 20.0,
                "overtimeMultiplier": 2.0,
                "taxRate": 10.0,
                "standardDayHours": 7.5,
                "periodDays": 7,
                "currency": "gbp",
            }),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.data()["currency"], "GBP");

    let reread = app.get("/api/v1/salary/settings", &admin).await;
    assert_eq!(reread.data()["hourlyRate"], 20.0);
    assert_eq!(reread.data()["periodDays"], 7);
}
