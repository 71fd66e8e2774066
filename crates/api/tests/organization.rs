mod common;

use api::seed::{ADMIN_EMAIL, MANAGER_EMAIL, MANAGER_PASSWORD};
use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn departments_track_employee_counts() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let all = app.get("/api/v1/department/all", &admin).await;
    let departments = all.data().as_array().unwrap();
    let engineering = departments
        .iter()
        .find(|d| d["name"] == "Engineering")
        .unwrap();
    assert_eq!(engineering["employeeCount"], 2);

    let duplicate = app
        .post(
            "/api/v1/department/create-department",
            &admin,
            json!({ "name": "Engineering", "description": "again" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let created = app
        .post(
            "/api/v1/department/create-department",
            &admin,
            json!({ "name": "Finance", "description": "Money matters" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["employeeCount"], 0);

    let id = app.seeded.department_named("Engineering").unwrap().id;
    let renamed = app
        .patch(
            "/api/v1/department/update-department",
            &admin,
            json!({ "departmentId": id, "name": "Platform" }),
        )
        .await;
    assert_eq!(renamed.data()["name"], "Platform");
    assert_eq!(renamed.data()["employeeCount"], 2);

    let removed = app
        .delete(&format!("/api/v1/department/delete-department/{id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let alice = app.employee_id("alice@acme.test");
    let profile = app
        .get(&format!("/api/v1/employee/by-HR/{alice}"), &admin)
        .await;
    assert!(profile.data()["departmentId"].is_null());
}

#[tokio::test]
async fn hr_edits_and_removes_employees() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let alice = app.employee_id("alice@acme.test");
    let bob = app.employee_id("bob@acme.test");

    let all = app.get("/api/v1/employee/all", &admin).await;
    let employees = all.data().as_array().unwrap();
    assert_eq!(employees.len(), 3);
    assert!(employees.iter().all(|e| e.get("passwordHash").is_none()));

    let ids = app.get("/api/v1/employee/all-employees-ids", &admin).await;
    assert_eq!(ids.data().as_array().unwrap().len(), 3);

    let taken = app
        .patch(
            "/api/v1/employee/update-employee",
            &admin,
            json!({ "employeeId": alice, "updatedEmployee": { "email": "bob@acme.test" } }),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let own_manager = app
        .patch(
            "/api/v1/employee/update-employee",
            &admin,
            json!({ "employeeId": alice, "updatedEmployee": { "managerId": alice } }),
        )
        .await;
    assert_eq!(own_manager.status, StatusCode::BAD_REQUEST);

    let updated = app
        .patch(
            "/api/v1/employee/update-employee",
            &admin,
            json!({
                "employeeId": alice,
                "updatedEmployee": { "position": "Tech Lead", "managerId": bob, "status": "On Leave" },
            }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["position"], "Tech Lead");
    assert_eq!(updated.data()["status"], "On Leave");
    assert_eq!(updated.data()["departmentName"], "Engineering");

    let denied = app
        .delete(&format!("/api/v1/employee/delete-employee/{bob}"), &app.manager_token())
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let removed = app
        .delete(&format!("/api/v1/employee/delete-employee/{bob}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let leaves = app.get("/api/v1/leave/all", &admin).await;
    assert!(
        leaves
            .data()
            .as_array()
            .unwrap()
            .iter()
            .all(|leave| leave["employeeId"] != json!(bob))
    );
}

#[tokio::test]
async fn employees_edit_only_personal_fields() {
    let app = TestApp::new().await;
    let token = app.employee_token("carol@acme.test");

    let res = app
        .patch(
            "/api/v1/employee/update-profile",
            &token,
            json!({
                "address": "1 Main St",
                "emergencyContact": { "name": "Dan", "relationship": "Brother", "phone": "555" },
                "skills": ["Logistics"],
                "status": "Terminated",
                "email": "hijack@acme.test",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let profile = res.data();
    assert_eq!(profile["address"], "1 Main St");
    assert_eq!(profile["emergencyContact"]["relationship"], "Brother");
    assert_eq!(profile["skills"], json!(["Logistics"]));
    assert_eq!(profile["status"], "Active");
    assert_eq!(profile["email"], "carol@acme.test");

    let me = app.get("/api/v1/employee/by-employee", &token).await;
    assert_eq!(me.data()["departmentName"], "Operations");
}

#[tokio::test]
async fn only_admins_manage_hr_profiles() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let manager_id = app.hr_id(MANAGER_EMAIL);
    let admin_id = app.hr_id(ADMIN_EMAIL);

    let denied = app
        .post(
            "/api/v1/HR/create-profile",
            &app.manager_token(),
            json!({
                "firstName": "Ivy",
                "lastName": "Ito",
                "email": "ivy@acme.test",
                "password": "Assistant#2024",
                "contactNumber": "+1-555-0150",
            }),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app
        .post(
            "/api/v1/HR/create-profile",
            &admin,
            json!({
                "firstName": "Ivy",
                "lastName": "Ito",
                "email": "ivy@acme.test",
                "password": "Assistant#2024",
                "contactNumber": "+1-555-0150",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["role"], "HR_Assistant");
    assert_eq!(created.data()["isVerified"], true);

    let self_demote = app
        .patch(
            &format!("/api/v1/HR/update-permissions/{admin_id}"),
            &admin,
            json!({ "role": "HR_Manager" }),
        )
        .await;
    assert_eq!(self_demote.status, StatusCode::BAD_REQUEST);

    let promoted = app
        .patch(
            &format!("/api/v1/HR/update-permissions/{manager_id}"),
            &admin,
            json!({ "permissions": { "canViewSalary": true, "canManageLeaves": true } }),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.data()["permissions"]["canViewSalary"], true);
    assert_eq!(promoted.data()["permissions"]["canManageRequests"], false);

    let salaries = app.get("/api/v1/salary/all", &app.manager_token()).await;
    assert_eq!(salaries.status, StatusCode::OK);

    let self_delete = app
        .delete(&format!("/api/v1/HR/delete-profile/{admin_id}"), &admin)
        .await;
    assert_eq!(self_delete.status, StatusCode::BAD_REQUEST);

    let suspended = app
        .patch(
            &format!("/api/v1/HR/update-profile/{manager_id}"),
            &admin,
            json!({ "status": "suspended" }),
        )
        .await;
    assert_eq!(suspended.status, StatusCode::OK);
    let locked_out = app
        .request(
            Method::POST,
            "/api/auth/HR/login",
            None,
            Some(json!({ "email": MANAGER_EMAIL, "password": MANAGER_PASSWORD })),
        )
        .await;
    assert_eq!(locked_out.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_password_change_checks_current_password() {
    let app = TestApp::new().await;
    let manager = app.manager_token();
    let manager_id = app.hr_id(MANAGER_EMAIL);
    let uri = format!("/api/v1/HR/change-password/{manager_id}");

    let wrong = app
        .patch(&uri, &manager, json!({ "currentPassword": "nope", "newPassword": "Changed#2024" }))
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.message(), "Current password is incorrect");

    let admin_id = app.hr_id(ADMIN_EMAIL);
    let other = app
        .patch(
            &format!("/api/v1/HR/change-password/{admin_id}"),
            &manager,
            json!({ "newPassword": "Changed#2024" }),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let changed = app
        .patch(
            &uri,
            &manager,
            json!({ "currentPassword": MANAGER_PASSWORD, "newPassword": "Changed#2024" }),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let login = app
        .request(
            Method::POST,
            "/api/auth/HR/login",
            None,
            Some(json!({ "email": MANAGER_EMAIL, "password": "Changed#2024" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn calendar_events_are_shared_with_employees() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let created = app
        .post(
            "/api/v1/corporate-calendar/create-event",
            &admin,
            json!({ "title": "Hackathon", "description": "", "eventDate": app.today + Duration::days(30) }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["audience"], "All");

    let employee_view = app
        .get("/api/v1/corporate-calendar/all", &app.employee_token("bob@acme.test"))
        .await;
    let events = employee_view.data().as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["title"], "Quarterly all-hands");

    let denied = app
        .post(
            "/api/v1/corporate-calendar/create-event",
            &app.manager_token(),
            json!({ "title": "Party", "description": "", "eventDate": app.today }),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboards_summarize_the_organization() {
    let app = TestApp::new().await;

    let hr = app.get("/api/v1/dashboard/HR-dashboard", &app.admin_token()).await;
    assert_eq!(hr.status, StatusCode::OK);
    let summary = hr.data();
    assert_eq!(summary["employees"], 3);
    assert_eq!(summary["departments"], 2);
    assert_eq!(summary["leaves"], 3);
    assert_eq!(summary["pendingLeaves"], 2);
    assert_eq!(summary["requests"], 2);
    assert_eq!(summary["openRequests"], 1);
    assert_eq!(summary["recentEmployees"][0]["firstName"], "Carol");

    let employee = app
        .get("/api/v1/dashboard/employee-dashboard", &app.employee_token("alice@acme.test"))
        .await;
    assert_eq!(employee.status, StatusCode::OK);
    assert_eq!(employee.data()["pendingLeaves"], 1);
    assert_eq!(employee.data()["openRequests"], 1);
    assert_eq!(employee.data()["clock"]["isClockedIn"], false);
    assert!(employee.data()["hoursThisPeriod"].as_f64().unwrap() >= 72.0);
}

#[tokio::test]
async fn another_organizations_hr_sees_and_changes_nothing() {
    let app = TestApp::new().await;
    let acme_admin = app.admin_token();
    let alice = app.employee_id("alice@acme.test");

    let salary = app
        .post(
            "/api/v1/salary/create",
            &acme_admin,
            json!({
                "employeeID": alice,
                "basicpay": 3000,
                "bonusePT": 0,
                "deductionPT": 0,
                "duedate": app.today,
                "currency": "usd",
            }),
        )
        .await;
    assert_eq!(salary.status, StatusCode::CREATED);
    let salary_id = salary.data()["id"].as_str().unwrap().to_string();
    let leave_id = app.seeded.leaves[0].id;
    let request_id = app.seeded.requests[0].id;

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
    let globex = signup.body["token"].as_str().unwrap().to_string();

    for path in [
        "/api/v1/employee/all",
        "/api/v1/salary/all",
        "/api/v1/leave/all",
        "/api/v1/generate-request/all",
    ] {
        let res = app.get(path, &globex).await;
        assert_eq!(res.status, StatusCode::OK, "{path}");
        assert!(res.data().as_array().unwrap().is_empty(), "{path} leaked rows");
    }

    for path in [
        format!("/api/v1/employee/by-HR/{alice}"),
        format!("/api/v1/salary/{salary_id}"),
        format!("/api/v1/leave/{leave_id}"),
        format!("/api/v1/generate-request/{request_id}"),
    ] {
        let res = app.get(&path, &globex).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{path}");
    }

    let edit = app
        .patch(
            "/api/v1/employee/update-employee",
            &globex,
            json!({ "employeeId": alice, "updatedEmployee": { "firstName": "Hijacked" } }),
        )
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);
    let decide = app
        .patch(
            "/api/v1/leave/HR-update-leave",
            &globex,
            json!({ "leaveId": leave_id, "status": "Rejected" }),
        )
        .await;
    assert_eq!(decide.status, StatusCode::NOT_FOUND);
    let pay = app
        .post(
            "/api/v1/salary/create",
            &globex,
            json!({
                "employeeID": alice,
                "basicpay": 1,
                "duedate": app.today + Duration::days(1),
                "currency": "usd",
            }),
        )
        .await;
    assert_eq!(pay.status, StatusCode::NOT_FOUND);

    for path in [
        format!("/api/v1/employee/delete-employee/{alice}"),
        format!("/api/v1/salary/delete/{salary_id}"),
        format!("/api/v1/leave/delete-leave/{leave_id}"),
        format!("/api/v1/generate-request/delete-request/{request_id}"),
    ] {
        let res = app.delete(&path, &globex).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{path}");
    }

    // Everything is still there for Acme.
    let alice_view = app.get(&format!("/api/v1/employee/by-HR/{alice}"), &acme_admin).await;
    assert_eq!(alice_view.data()["firstName"], "Alice");
    assert_eq!(
        app.get(&format!("/api/v1/salary/{salary_id}"), &acme_admin).await.status,
        StatusCode::OK
    );
    let leave = app.get(&format!("/api/v1/leave/{leave_id}"), &acme_admin).await;
    assert_eq!(leave.data()["status"], app.seeded.leaves[0].status.as_str());
    assert_eq!(
        app.get(&format!("/api/v1/generate-request/{request_id}"), &acme_admin)
            .await
            .status,
        StatusCode::OK
    );
}
