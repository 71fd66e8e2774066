mod common;

use api::seed::{ADMIN_EMAIL, ADMIN_PASSWORD, EMPLOYEE_PASSWORD};
use axum::http::{Method, StatusCode};
use common::TestApp;
use entity::{employee, hr_profile};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

fn signup_body(email: &str) -> serde_json::Value {
    json!({
        "firstName": "Nina",
        "lastName": "Novak",
        "email": email,
        "password": "Str0ngPass!",
        "contactNumber": "+1-555-0111",
        "name": "Globex",
        "description": "Globex Corporation",
        "OrganizationURL": "https://globex.test",
        "OrganizationMail": "hello@globex.test",
    })
}

#[tokio::test]
async fn hr_signup_creates_unverified_admin_and_verifies_with_code() {
    let app = TestApp::new().await;

    let res = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(signup_body("nina@globex.test")))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"]["email"], "nina@globex.test");
    assert_eq!(res.body["user"]["role"], "HR-Admin");
    assert!(res.set_cookies().iter().any(|c| c.starts_with("HRtoken=")));
    let token = res.body["token"].as_str().unwrap().to_string();

    let mail = app.mailer.last_to("nina@globex.test").unwrap();
    assert_eq!(mail.subject, "Verify your email");

    let check = app.get("/api/auth/HR/check-verify-email", &token).await;
    assert_eq!(check.data()["isVerified"], false);

    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq("nina@globex.test"))
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.permissions(), ems_types::hr::HrPermissions::all());
    let code = profile.verification_code.unwrap();
    assert!(mail.body.contains(&code));

    let wrong = app
        .request(
            Method::POST,
            "/api/auth/HR/verify-email",
            None,
            Some(json!({ "verificationcode": "000000x" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let verified = app
        .request(
            Method::POST,
            "/api/auth/HR/verify-email",
            None,
            Some(json!({ "verificationcode": code })),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    let check = app.get("/api/auth/HR/check-verify-email", &token).await;
    assert_eq!(check.data()["isVerified"], true);
}

#[tokio::test]
async fn hr_signup_rejects_duplicates_and_missing_fields() {
    let app = TestApp::new().await;

    let dup = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(signup_body(ADMIN_EMAIL)))
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["success"], false);

    let mut missing = signup_body("new@globex.test");
    missing["contactNumber"] = json!("  ");
    let res = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(missing))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "All fields are required");

    let mut clash = signup_body("other@globex.test");
    clash["name"] = json!("Initech");
    clash["OrganizationURL"] = json!("https://acme.test");
    let res = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(clash))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn hr_signup_cannot_join_an_existing_organization() {
    let app = TestApp::new().await;

    let mut intruder = signup_body("mallory@evil.test");
    intruder["name"] = json!("Acme Corporation");
    intruder["OrganizationURL"] = json!("https://evil.test");
    intruder["OrganizationMail"] = json!("root@evil.test");
    let res = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(intruder))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.body.get("token").is_none());

    // Even a full match of the public organization details is refused.
    let mut lookalike = signup_body("lookalike@acme.test");
    lookalike["name"] = json!("Acme Corporation");
    lookalike["OrganizationURL"] = json!("https://acme.test");
    lookalike["OrganizationMail"] = json!("contact@acme.test");
    let res = app
        .request(Method::POST, "/api/auth/HR/signup", None, Some(lookalike))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let created = hr_profile::Entity::find()
        .filter(hr_profile::Column::OrganizationId.eq(app.org_id()))
        .all(app.db())
        .await
        .unwrap();
    assert_eq!(created.len(), app.seeded.hr_profiles.len());
}

#[tokio::test]
async fn login_sets_portal_cookie_and_rejects_bad_credentials() {
    let app = TestApp::new().await;

    let res = app
        .request(
            Method::POST,
            "/api/auth/HR/login",
            None,
            Some(json!({ "email": "ADMIN@acme.test", "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert!(res.set_cookies().iter().any(|c| c.starts_with("HRtoken=")));
    assert!(res.body["user"]["lastLoginAt"].is_string());

    let bad = app
        .request(
            Method::POST,
            "/api/auth/HR/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "not-the-password" })),
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.message(), "Invalid credentials");
    assert_eq!(bad.body["gologin"], true);

    let employee = app
        .request(
            Method::POST,
            "/api/auth/employee/login",
            None,
            Some(json!({ "email": "alice@acme.test", "password": EMPLOYEE_PASSWORD })),
        )
        .await;
    assert_eq!(employee.status, StatusCode::OK);
    assert!(employee.set_cookies().iter().any(|c| c.starts_with("EMtoken=")));
    assert_eq!(employee.body["user"]["portal"], "Employee");
}

#[tokio::test]
async fn tokens_are_bound_to_their_portal() {
    let app = TestApp::new().await;
    let alice = app.employee_token("alice@acme.test");

    let res = app.get("/api/v1/employee/all", &alice).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/v1/leave/my-leaves", &app.admin_token()).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(Method::GET, "/api/v1/employee/all", None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["gologin"], true);

    let res = app.get("/api/v1/employee/all", "garbage.token.value").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.set_cookies().iter().any(|c| c.starts_with("HRtoken=")));
}

#[tokio::test]
async fn check_login_reports_session_state() {
    let app = TestApp::new().await;

    let anonymous = app
        .request(Method::GET, "/api/auth/HR/check-login", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["success"], false);

    let signed_in = app.get("/api/auth/HR/check-login", &app.admin_token()).await;
    assert_eq!(signed_in.body["success"], true);
    assert_eq!(signed_in.data()["email"], ADMIN_EMAIL);

    let logout = app
        .request(Method::POST, "/api/auth/employee/logout", None, None)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(
        logout
            .set_cookies()
            .iter()
            .any(|c| c.starts_with("EMtoken=") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn employee_password_reset_flow() {
    let app = TestApp::new().await;

    let unknown = app
        .request(
            Method::POST,
            "/api/auth/employee/forgot-password",
            None,
            Some(json!({ "email": "nobody@acme.test" })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let res = app
        .request(
            Method::POST,
            "/api/auth/employee/forgot-password",
            None,
            Some(json!({ "email": "bob@acme.test" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let mail = app.mailer.last_to("bob@acme.test").unwrap();

    let bob = employee::Entity::find_by_id(app.employee_id("bob@acme.test"))
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    let token = bob.reset_token.unwrap();
    assert_eq!(token.len(), 50);
    assert!(mail.body.contains(&format!("/auth/reset-password/{token}")));

    let short = app
        .request(
            Method::POST,
            &format!("/api/auth/employee/reset-password/{token}"),
            None,
            Some(json!({ "password": "short" })),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let reset = app
        .request(
            Method::POST,
            &format!("/api/auth/employee/reset-password/{token}"),
            None,
            Some(json!({ "password": "BrandNew#2024" })),
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK);

    let reused = app
        .request(
            Method::POST,
            &format!("/api/auth/employee/reset-password/{token}"),
            None,
            Some(json!({ "password": "Another#2024" })),
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);

    let login = app
        .request(
            Method::POST,
            "/api/auth/employee/login",
            None,
            Some(json!({ "email": "bob@acme.test", "password": "BrandNew#2024" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn hr_registers_employees_subject_to_permission() {
    let app = TestApp::new().await;
    let engineering = app.seeded.department_named("Engineering").unwrap().id;
    let body = json!({
        "firstName": "Dave",
        "lastName": "Doe",
        "email": "dave@acme.test",
        "password": "Employee#2024!",
        "contactNumber": "+1-555-0123",
        "departmentId": engineering,
        "employeeCode": "EMP-004",
        "skills": ["Go"],
    });

    let denied = app
        .post("/api/auth/employee/signup", &app.manager_token(), body.clone())
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let res = app
        .post("/api/auth/employee/signup", &app.admin_token(), body.clone())
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["email"], "dave@acme.test");
    assert_eq!(res.data()["isVerified"], false);
    assert_eq!(res.data()["employmentType"], "Full-time");
    assert!(app.mailer.last_to("dave@acme.test").is_some());

    let again = app
        .post("/api/auth/employee/signup", &app.admin_token(), body)
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}
