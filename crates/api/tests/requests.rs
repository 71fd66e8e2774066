mod common;

use api::notify::Room;
use axum::http::StatusCode;
use common::TestApp;
use ems_types::notification::REQUEST_UPDATED;
use serde_json::json;

#[tokio::test]
async fn employee_raises_and_edits_requests() {
    let app = TestApp::new().await;
    let token = app.employee_token("carol@acme.test");
    let carol = app.employee_id("carol@acme.test");

    let res = app
        .post(
            "/api/v1/generate-request/create-request",
            &token,
            json!({ "title": "Desk chair", "content": "The current one is broken." }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["requestType"], "General");
    assert_eq!(res.data()["priority"], "Medium");
    assert_eq!(res.data()["createdBy"], "Employee");
    assert_eq!(res.data()["departmentId"], json!(app.seeded.department_named("Operations").unwrap().id));
    let id = res.data()["id"].as_str().unwrap().to_string();

    let duplicate = app
        .post(
            "/api/v1/generate-request/create-request",
            &token,
            json!({ "title": "Desk chair", "content": "The current one is broken." }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let edited = app
        .patch(
            "/api/v1/generate-request/update-request-content",
            &token,
            json!({ "requestId": id, "content": "Broken wheel, please replace." }),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.data()["content"], "Broken wheel, please replace.");

    let mine = app
        .get(&format!("/api/v1/generate-request/employee/{carol}"), &token)
        .await;
    assert_eq!(mine.data().as_array().unwrap().len(), 1);

    let alice = app.employee_id("alice@acme.test");
    let snooping = app
        .get(&format!("/api/v1/generate-request/employee/{alice}"), &token)
        .await;
    assert_eq!(snooping.status, StatusCode::FORBIDDEN);

    let foreign = app
        .patch(
            "/api/v1/generate-request/update-request-content",
            &app.employee_token("alice@acme.test"),
            json!({ "requestId": id, "title": "Mine" }),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_works_a_request_through_to_closure() {
    let app = TestApp::new().await;
    let manager = app.manager_token();
    let laptop = app.seeded.request_titled("Laptop replacement").unwrap().clone();
    let mut inbox = app.state.hub.subscribe(vec![Room::User(laptop.employee_id)]);

    let priority = app
        .patch(
            "/api/v1/generate-request/update-priority",
            &manager,
            json!({ "requestId": laptop.id, "priority": "Low" }),
        )
        .await;
    assert_eq!(priority.status, StatusCode::OK);
    assert_eq!(priority.data()["priority"], "Low");
    assert_eq!(inbox.next().await.unwrap().event, REQUEST_UPDATED);

    let approved = app
        .patch(
            "/api/v1/generate-request/update-request-status",
            &manager,
            json!({ "requestId": laptop.id, "status": "Approved", "hrComments": "Ordered" }),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.data()["approvedBy"], json!(app.hr_id(api::seed::MANAGER_EMAIL)));
    assert_eq!(approved.data()["hrComments"], "Ordered");
    assert!(approved.data()["closedAt"].is_null());

    let closed = app
        .patch(
            "/api/v1/generate-request/close-request",
            &manager,
            json!({ "requestId": laptop.id }),
        )
        .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.data()["status"], "Closed");
    assert!(closed.data()["closedAt"].is_string());
    assert_eq!(closed.data()["hrComments"], "Ordered");

    let twice = app
        .patch(
            "/api/v1/generate-request/close-request",
            &manager,
            json!({ "requestId": laptop.id }),
        )
        .await;
    assert_eq!(twice.status, StatusCode::BAD_REQUEST);

    let locked = app
        .patch(
            "/api/v1/generate-request/update-request-content",
            &app.employee_token("alice@acme.test"),
            json!({ "requestId": laptop.id, "title": "Faster laptop" }),
        )
        .await;
    assert_eq!(locked.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hr_files_requests_on_behalf_of_employees() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let bob = app.employee_id("bob@acme.test");

    let res = app
        .post(
            "/api/v1/generate-request/create-request-by-hr",
            &admin,
            json!({
                "employeeId": bob,
                "title": "Badge renewal",
                "content": "Badge expires next week.",
                "requestType": "Facilities",
                "status": "In Review",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["createdBy"], "HR");
    assert_eq!(res.data()["status"], "In Review");
    assert_eq!(res.data()["employeeName"], "Bob Brown");

    let all = app.get("/api/v1/generate-request/all", &admin).await;
    assert_eq!(all.data().as_array().unwrap().len(), 3);

    let id = res.data()["id"].as_str().unwrap().to_string();
    let removed = app
        .delete(&format!("/api/v1/generate-request/delete-request/{id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let gone = app
        .get(&format!("/api/v1/generate-request/{id}"), &admin)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
