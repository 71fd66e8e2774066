mod common;

use api::ApiSettings;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::TestApp;
use serde_json::{Value, json};

async fn graphql(app: &TestApp, token: Option<&str>, query: &str, variables: Value) -> Value {
    let res = app
        .request(
            Method::POST,
            "/graphql",
            token,
            Some(json!({ "query": query, "variables": variables })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    res.body
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn me_resolves_either_portal() {
    let app = TestApp::new().await;
    let query = "{ me { portal role firstName email } }";

    let hr = graphql(&app, Some(&app.admin_token()), query, json!({})).await;
    assert_eq!(hr["data"]["me"]["portal"], "HR");
    assert_eq!(hr["data"]["me"]["role"], "HR-Admin");

    let employee = graphql(&app, Some(&app.employee_token("bob@acme.test")), query, json!({})).await;
    assert_eq!(employee["data"]["me"]["portal"], "Employee");
    assert_eq!(employee["data"]["me"]["firstName"], "Bob");

    let anonymous = graphql(&app, None, query, json!({})).await;
    assert_eq!(error_code(&anonymous), "UNAUTHENTICATED");
}

#[tokio::test]
async fn hr_queries_cover_dashboard_employees_and_leaves() {
    let app = TestApp::new().await;
    let token = app.manager_token();
    let query = r#"
        query {
            hrDashboard { employees departments pendingLeaves openRequests }
            employees(first: 2) { firstName lastName }
            leaves(status: PENDING) { employeeName status days }
        }
    "#;

    let body = graphql(&app, Some(&token), query, json!({})).await;
    assert!(body.get("errors").is_none(), "{body}");
    let data = &body["data"];
    assert_eq!(data["hrDashboard"]["employees"], 3);
    assert_eq!(data["hrDashboard"]["pendingLeaves"], 2);
    assert_eq!(data["hrDashboard"]["openRequests"], 1);

    let employees = data["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["lastName"], "Andersen");

    let leaves = data["leaves"].as_array().unwrap();
    assert_eq!(leaves.len(), 2);
    assert!(leaves.iter().all(|leave| leave["status"] == "PENDING"));

    let filtered = graphql(
        &app,
        Some(&token),
        "query($q: String) { employees(q: $q) { email } }",
        json!({ "q": "carol" }),
    )
    .await;
    assert_eq!(filtered["data"]["employees"], json!([{ "email": "carol@acme.test" }]));

    let employee = graphql(
        &app,
        Some(&app.employee_token("alice@acme.test")),
        "{ hrDashboard { employees } }",
        json!({}),
    )
    .await;
    assert_eq!(error_code(&employee), "FORBIDDEN");
}

#[tokio::test]
async fn payroll_preview_needs_salary_access() {
    let app = TestApp::new().await;
    let query = r#"
        query($id: UUID!, $start: NaiveDate, $end: NaiveDate) {
            payrollPreview(employeeId: $id, start: $start, end: $end) {
                daysWorked regularHours grossPay tax netPay currency
            }
        }
    "#;
    let variables = json!({
        "id": app.employee_id("alice@acme.test"),
        "start": app.today - Duration::days(14),
        "end": app.today - Duration::days(1),
    });

    let denied = graphql(&app, Some(&app.manager_token()), query, variables.clone()).await;
    assert_eq!(error_code(&denied), "FORBIDDEN");

    let body = graphql(&app, Some(&app.admin_token()), query, variables).await;
    assert!(body.get("errors").is_none(), "{body}");
    let preview = &body["data"]["payrollPreview"];
    assert_eq!(preview["daysWorked"], 10);
    assert_eq!(preview["grossPay"], 1376.0);
    assert_eq!(preview["netPay"], 1307.2);
    assert_eq!(preview["currency"], "USD");
}

#[tokio::test]
async fn debug_token_route_is_opt_in() {
    let app = TestApp::new().await;
    let hidden = app.get("/api/debug/token", &app.admin_token()).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let app = TestApp::with_settings(ApiSettings {
        debug_routes: true,
        ..ApiSettings::default()
    })
    .await;
    let res = app.get("/api/debug/token", &app.admin_token()).await;
    assert_eq!(res.status, StatusCode::OK);
    let data = res.data();
    assert_eq!(data["sources"]["authorizationHeader"], true);
    assert_eq!(data["portals"]["HR"]["valid"], true);
    assert_eq!(data["portals"]["HR"]["portalMatches"], true);
    assert_eq!(data["portals"]["Employee"]["portalMatches"], false);
}
