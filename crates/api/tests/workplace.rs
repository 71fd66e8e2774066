mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::TestApp;
use serde_json::json;

async fn globex_token(app: &TestApp) -> String {
    let signup = app
        .request(
            Method::POST,
            "/api/auth/HR/signup",
            None,
            Some(json!({
                "firstName": "Olga",
                "lastName": "Other",
                "email": "olga@globex.test",
                "password": "Str0ngPass!",
                "contactNumber": "+1-555-0199",
                "name": "Globex",
                "description": "Someone else",
                "OrganizationURL": "https://globex.test",
                "OrganizationMail": "hello@globex.test",
            })),
        )
        .await;
    assert_eq!(signup.status, StatusCode::CREATED);
    signup.body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn organization_info_and_admin_only_update() {
    let app = TestApp::new().await;

    let info = app.get("/api/v1/organization/info", &app.manager_token()).await;
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(info.data()["name"], "Acme Corporation");
    assert_eq!(info.data()["OrganizationURL"], "https://acme.test");
    assert_eq!(info.data()["OrganizationMail"], "contact@acme.test");
    assert!(info.data()["policies"].as_str().unwrap().contains("Core hours"));

    let alice = app.employee_token("alice@acme.test");
    let res = app.get("/api/v1/organization/info", &alice).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let denied = app
        .put(
            "/api/v1/organization/update",
            &app.manager_token(),
            json!({ "policies": "Anything goes" }),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let updated = app
        .put(
            "/api/v1/organization/update",
            &app.admin_token(),
            json!({
                "description": "Widgets and gadgets",
                "OrganizationMail": " HELLO@acme.test ",
                "policies": "  Remote Fridays.  ",
            }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["name"], "Acme Corporation");
    assert_eq!(updated.data()["description"], "Widgets and gadgets");
    assert_eq!(updated.data()["OrganizationMail"], "hello@acme.test");
    assert_eq!(updated.data()["policies"], "Remote Fridays.");

    // Re-sending its own name is not a clash.
    let same = app
        .put(
            "/api/v1/organization/update",
            &app.admin_token(),
            json!({ "name": "Acme Corporation" }),
        )
        .await;
    assert_eq!(same.status, StatusCode::OK);

    globex_token(&app).await;
    let taken = app
        .put(
            "/api/v1/organization/update",
            &app.admin_token(),
            json!({ "OrganizationURL": "https://globex.test" }),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
    assert_eq!(taken.message(), "OrganizationURL already exists");

    let blank = app
        .put("/api/v1/organization/update", &app.admin_token(), json!({ "name": "  " }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn one_shift_per_employee_per_day() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let alice = app.employee_id("alice@acme.test");
    let bob = app.employee_id("bob@acme.test");
    let day = app.today + Duration::days(2);

    let body = json!({
        "employeeId": alice,
        "date": day,
        "startTime": "22:00",
        "endTime": "06:00",
        "shift": "night",
    });
    let denied = app
        .post("/api/v1/schedule/create-schedule", &app.manager_token(), body.clone())
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let res = app
        .post("/api/v1/schedule/create-schedule", &admin, body.clone())
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["employeeName"], "Alice Andersen");
    assert_eq!(res.data()["startTime"], "22:00");
    assert_eq!(res.data()["location"], "Office");
    assert_eq!(res.data()["status"], "scheduled");
    let night_id = res.data()["id"].as_str().unwrap().to_string();

    let again = app
        .post("/api/v1/schedule/create-schedule", &admin, body)
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(
        again.message(),
        "Schedule already exists for this employee on this date"
    );

    let empty = app
        .post(
            "/api/v1/schedule/create-schedule",
            &admin,
            json!({ "employeeId": bob, "date": day, "startTime": "09:00", "endTime": "09:00" }),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let bad_time = app
        .post(
            "/api/v1/schedule/create-schedule",
            &admin,
            json!({ "employeeId": bob, "date": day, "startTime": "9am", "endTime": "17:00" }),
        )
        .await;
    assert_eq!(bad_time.status, StatusCode::BAD_REQUEST);

    let bob_shift = app
        .post(
            "/api/v1/schedule/create-schedule",
            &admin,
            json!({
                "employeeId": bob,
                "date": day + Duration::days(1),
                "startTime": "09:00",
                "endTime": "17:00",
                "location": "Warehouse",
            }),
        )
        .await;
    assert_eq!(bob_shift.status, StatusCode::CREATED);
    assert_eq!(bob_shift.data()["shift"], "custom");
    let bob_id = bob_shift.data()["id"].as_str().unwrap().to_string();

    // Moving bob's shift onto alice's night is refused, his own day is fine.
    let moved = app
        .put(
            &format!("/api/v1/schedule/update-schedule/{bob_id}"),
            &admin,
            json!({ "employeeId": alice, "date": day }),
        )
        .await;
    assert_eq!(moved.status, StatusCode::CONFLICT);
    let kept = app
        .put(
            &format!("/api/v1/schedule/update-schedule/{bob_id}"),
            &admin,
            json!({ "status": "completed", "notes": "Covered inventory" }),
        )
        .await;
    assert_eq!(kept.status, StatusCode::OK);
    assert_eq!(kept.data()["status"], "completed");
    assert_eq!(kept.data()["date"], json!(day + Duration::days(1)));

    let range = app
        .post(
            "/api/v1/schedule/date-range",
            &admin,
            json!({ "startDate": day, "endDate": day }),
        )
        .await;
    assert_eq!(range.data().as_array().unwrap().len(), 1);
    let backwards = app
        .post(
            "/api/v1/schedule/date-range",
            &admin,
            json!({ "startDate": day, "endDate": app.today }),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);

    let all = app.get("/api/v1/schedule/all", &admin).await;
    assert_eq!(all.data().as_array().unwrap().len(), 2);
    let alices = app
        .get(&format!("/api/v1/schedule/employee/{alice}"), &admin)
        .await;
    assert_eq!(alices.data()[0]["id"], night_id.as_str());

    let mine = app
        .get(
            "/api/v1/schedule/employee/my-schedule",
            &app.employee_token("bob@acme.test"),
        )
        .await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.data().as_array().unwrap().len(), 1);
    assert_eq!(mine.data()[0]["location"], "Warehouse");

    let removed = app
        .delete(&format!("/api/v1/schedule/delete-schedule/{night_id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let gone = app.get(&format!("/api/v1/schedule/{night_id}"), &admin).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notices_reach_only_their_audience() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let engineering = app.seeded.department_named("Engineering").unwrap().id;
    let carol = app.employee_id("carol@acme.test");

    for body in [
        json!({ "title": "Holiday party", "content": "Friday at five." }),
        json!({
            "title": "Code freeze",
            "content": "No deploys this week.",
            "audience": "Department-Specific",
            "departmentId": engineering,
        }),
        json!({
            "title": "Badge renewal",
            "content": "Please pick up your new badge.",
            "audience": "Employee-Specific",
            "employeeId": carol,
        }),
    ] {
        let res = app.post("/api/v1/notice/create-notice", &admin, body).await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let missing_target = app
        .post(
            "/api/v1/notice/create-notice",
            &admin,
            json!({ "title": "Who?", "content": "Nobody", "audience": "Employee-Specific" }),
        )
        .await;
    assert_eq!(missing_target.status, StatusCode::BAD_REQUEST);

    let too_long = app
        .post(
            "/api/v1/notice/create-notice",
            &admin,
            json!({ "title": "x".repeat(101), "content": "Body" }),
        )
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

    let denied = app
        .post(
            "/api/v1/notice/create-notice",
            &app.manager_token(),
            json!({ "title": "Hi", "content": "There" }),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let titles = |res: &common::TestResponse| -> Vec<String> {
        let mut titles: Vec<String> = res
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|notice| notice["title"].as_str().unwrap().to_string())
            .collect();
        titles.sort();
        titles
    };

    let alice = app
        .get("/api/v1/notice/employee/my-notices", &app.employee_token("alice@acme.test"))
        .await;
    assert_eq!(titles(&alice), ["Code freeze", "Holiday party"]);
    let carols = app
        .get("/api/v1/notice/employee/my-notices", &app.employee_token("carol@acme.test"))
        .await;
    assert_eq!(titles(&carols), ["Badge renewal", "Holiday party"]);

    let all = app.get("/api/v1/notice/all", &admin).await;
    assert_eq!(all.data().as_array().unwrap().len(), 3);
    let freeze = all
        .data()
        .as_array()
        .unwrap()
        .iter()
        .find(|notice| notice["title"] == "Code freeze")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Widening the audience drops the department.
    let widened = app
        .patch(
            "/api/v1/notice/update-notice",
            &admin,
            json!({ "noticeId": freeze, "audience": "All" }),
        )
        .await;
    assert_eq!(widened.status, StatusCode::OK);
    assert!(widened.data()["departmentId"].is_null());
    let carols = app
        .get("/api/v1/notice/employee/my-notices", &app.employee_token("carol@acme.test"))
        .await;
    assert_eq!(carols.data().as_array().unwrap().len(), 3);

    let globex = globex_token(&app).await;
    let hidden = app.get(&format!("/api/v1/notice/{freeze}"), &globex).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    let foreign = app
        .delete(&format!("/api/v1/notice/delete-notice/{freeze}"), &globex)
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let removed = app
        .delete(&format!("/api/v1/notice/delete-notice/{freeze}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
}

#[tokio::test]
async fn expense_balances_follow_salary_permissions() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let body = json!({
        "title": "October office budget",
        "availableamount": 2500.0,
        "totalexpenses": 1234.567,
        "expensemonth": "2026-10",
        "submitdate": app.today,
    });
    let denied = app
        .post("/api/v1/balance/create-balance", &app.manager_token(), body.clone())
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let hidden = app.get("/api/v1/balance/all", &app.manager_token()).await;
    assert_eq!(hidden.status, StatusCode::FORBIDDEN);

    let res = app.post("/api/v1/balance/create-balance", &admin, body).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["totalExpenses"], 1234.57);
    assert_eq!(res.data()["expenseMonth"], "2026-10");
    let id = res.data()["id"].as_str().unwrap().to_string();

    let bad_month = app
        .post(
            "/api/v1/balance/create-balance",
            &admin,
            json!({
                "title": "Broken",
                "availableAmount": 1.0,
                "expenseMonth": "October",
                "submitDate": app.today,
            }),
        )
        .await;
    assert_eq!(bad_month.status, StatusCode::BAD_REQUEST);

    let negative = app
        .patch(
            "/api/v1/balance/update-balance",
            &admin,
            json!({ "balanceId": id, "availableAmount": -5.0 }),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let updated = app
        .patch(
            "/api/v1/balance/update-balance",
            &admin,
            json!({ "balanceId": id, "totalExpenses": 1500.0, "description": "After audit" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["totalExpenses"], 1500.0);
    assert_eq!(updated.data()["availableAmount"], 2500.0);

    let globex = globex_token(&app).await;
    let foreign = app.get(&format!("/api/v1/balance/{id}"), &globex).await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    let empty = app.get("/api/v1/balance/all", &globex).await;
    assert_eq!(empty.data().as_array().unwrap().len(), 0);

    let removed = app
        .delete(&format!("/api/v1/balance/delete-balance/{id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let all = app.get("/api/v1/balance/all", &admin).await;
    assert!(all.data().as_array().unwrap().is_empty());
}
