mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn recruitment_postings_require_permission_and_unique_titles() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let body = json!({ "jobTitle": "Site Reliability Engineer", "description": "Keep things running." });

    let denied = app
        .post("/api/v1/recruitment/create-recruitment", &app.manager_token(), body.clone())
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app
        .post("/api/v1/recruitment/create-recruitment", &admin, body.clone())
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["applicants"], json!([]));

    let duplicate = app
        .post("/api/v1/recruitment/create-recruitment", &admin, body)
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let all = app.get("/api/v1/recruitment/all", &admin).await;
    let postings = all.data().as_array().unwrap();
    assert_eq!(postings.len(), 2);
    let backend = postings
        .iter()
        .find(|p| p["jobTitle"] == "Backend Engineer")
        .unwrap();
    assert_eq!(backend["applicants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn attaching_applicants_reports_added_and_existing() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let posting = app.seeded.recruitments[0].id;
    let dana = app.seeded.applicant_email("dana@applicants.test").unwrap().id;
    let fay = app.seeded.applicant_email("fay@applicants.test").unwrap().id;
    let uri = format!("/api/v1/recruitment/update-recruitment/{posting}");

    let unknown = app
        .patch(&uri, &admin, json!({ "applicationIDArray": [Uuid::new_v4()] }))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let res = app
        .patch(
            &uri,
            &admin,
            json!({ "description": "Own the payroll engine.", "applicationIDArray": [fay, dana, fay] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["added"], json!([fay]));
    assert_eq!(res.data()["alreadyPresent"], json!([dana]));
    let recruitment = &res.data()["recruitment"];
    assert_eq!(recruitment["description"], "Own the payroll engine.");
    assert_eq!(recruitment["applicants"].as_array().unwrap().len(), 3);

    let fetched = app
        .get(&format!("/api/v1/recruitment/{posting}"), &admin)
        .await;
    assert_eq!(fetched.data()["applicants"].as_array().unwrap().len(), 3);

    let removed = app
        .delete(&format!("/api/v1/recruitment/delete-recruitment/{posting}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let applicants = app.get("/api/v1/applicant/all", &admin).await;
    assert_eq!(applicants.data().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn applicant_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let created = app
        .post(
            "/api/v1/applicant/create-applicant",
            &admin,
            json!({
                "firstName": "Gus",
                "lastName": "Grant",
                "email": "Gus@Applicants.test",
                "contactNumber": "+1-555-0170",
                "appliedRole": "Support Engineer",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["status"], "Not Specified");
    assert_eq!(created.data()["email"], "gus@applicants.test");
    let id = created.data()["id"].as_str().unwrap().to_string();

    let duplicate = app
        .post(
            "/api/v1/applicant/create-applicant",
            &admin,
            json!({
                "firstName": "Gus",
                "lastName": "Again",
                "email": "gus@applicants.test",
                "contactNumber": "+1-555-0171",
                "appliedRole": "Support Engineer",
            }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let updated = app
        .patch(
            "/api/v1/applicant/update-applicant",
            &admin,
            json!({ "applicantId": id, "status": "Conduct-Interview" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["status"], "Conduct-Interview");

    let removed = app
        .delete(&format!("/api/v1/applicant/delete-applicant/{id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let gone = app.get(&format!("/api/v1/applicant/{id}"), &admin).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interview_insights_name_applicant_and_interviewer() {
    let app = TestApp::new().await;
    let admin = app.admin_token();
    let evan = app.seeded.applicant_email("evan@applicants.test").unwrap().id;

    let created = app
        .post(
            "/api/v1/interview-insights/create-interview",
            &admin,
            json!({ "applicantId": evan, "interviewDate": app.today + Duration::days(4) }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["applicantName"], "Evan Evans");
    assert_eq!(created.data()["interviewerName"], "Grace Hopper");
    assert_eq!(created.data()["status"], "Pending");
    let id = created.data()["id"].as_str().unwrap().to_string();

    let stranger = app
        .post(
            "/api/v1/interview-insights/create-interview",
            &admin,
            json!({ "applicantId": evan, "interviewerId": Uuid::new_v4(), "interviewDate": app.today }),
        )
        .await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let updated = app
        .patch(
            &format!("/api/v1/interview-insights/update-interview/{id}"),
            &admin,
            json!({ "status": "Completed", "feedback": "Hire", "responseDate": app.today }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["status"], "Completed");
    assert_eq!(updated.data()["feedback"], "Hire");

    let all = app.get("/api/v1/interview-insights/all", &admin).await;
    assert_eq!(all.data().as_array().unwrap().len(), 2);

    let removed = app
        .delete(&format!("/api/v1/interview-insights/delete-interview/{id}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
}
