//! Signup, verification, login and password reset for both portals.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use ems_types::{
    ApiEnvelope, EmployeeStatus, EmploymentType, HrRole, HrStatus, Portal,
    auth::{
        AuthUser, EmailOnly, HrSignup, LoginRequest, LoginResponse, NewPassword,
        VerificationState, VerifyEmail,
    },
    employee::{Employee, NewEmployee},
    hr::{HrPermissions, Permission},
};
use entity::{employee, hr_profile, organization};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{Envelope, created, done, normalize_email, ok, required, trimmed};
use crate::{
    auth::{
        VERIFICATION_CODE_TTL_MINUTES, RESET_TOKEN_TTL_MINUTES, clear_cookie,
        generate_reset_token, generate_verification_code, hash_password, issue_token,
        session_cookie, validate_password, verify_password,
    },
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, MaybeEmployee, MaybeHr, PathParam},
    mailer::{reset_confirmation_mail, reset_mail, verification_mail, welcome_mail},
    routes::departments::department_in_org,
    state::AppState,
    views,
};

pub fn hr_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(hr_signup))
        .route("/verify-email", post(hr_verify_email))
        .route("/resend-verify-email", post(hr_resend_verification))
        .route("/login", post(hr_login))
        .route("/check-login", get(hr_check_login))
        .route("/check-verify-email", get(hr_check_verified))
        .route("/logout", post(hr_logout))
        .route("/forgot-password", post(hr_forgot_password))
        .route("/reset-password/{token}", post(hr_reset_password))
}

pub fn employee_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(employee_signup))
        .route("/verify-email", post(employee_verify_email))
        .route("/resend-verify-email", post(employee_resend_verification))
        .route("/login", post(employee_login))
        .route("/check-login", get(employee_check_login))
        .route("/check-verify-email", get(employee_check_verified))
        .route("/logout", post(employee_logout))
        .route("/forgot-password", post(employee_forgot_password))
        .route("/reset-password/{token}", post(employee_reset_password))
}

type SessionResponse = (StatusCode, CookieJar, Json<LoginResponse>);

fn session(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    message: &str,
    user: AuthUser,
) -> ApiResult<SessionResponse> {
    let token = issue_token(
        user.id,
        user.portal,
        &user.role,
        user.organization_id,
        &state.auth,
    )
    .map_err(ApiError::internal)?;
    let jar = jar.add(session_cookie(user.portal, token.clone(), &state.auth));
    Ok((
        status,
        jar,
        Json(LoginResponse {
            success: true,
            message: message.to_string(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.auth.token_ttl().num_seconds(),
            user,
        }),
    ))
}

fn not_logged_in() -> Envelope<AuthUser> {
    Json(ApiEnvelope {
        success: false,
        message: "Not logged in".to_string(),
        data: None,
    })
}

fn bad_credentials() -> ApiError {
    ApiError::Unauthorized {
        message: "Invalid credentials".to_string(),
        portal: None,
    }
}

fn expiry_in(minutes: i64) -> sea_orm::prelude::DateTimeWithTimeZone {
    (Utc::now() + Duration::minutes(minutes)).into()
}

async fn hr_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Body(body): Body<HrSignup>,
) -> ApiResult<SessionResponse> {
    let fields = [
        &body.first_name,
        &body.last_name,
        &body.email,
        &body.password,
        &body.contact_number,
        &body.name,
        &body.description,
        &body.organization_url,
        &body.organization_mail,
    ];
    if fields.iter().any(|value| value.trim().is_empty()) {
        return Err(ApiError::bad_request("All fields are required"));
    }
    let email = normalize_email(&body.email)?;
    validate_password(&body.password)?;

    let taken = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?;
    if taken.is_some() {
        return Err(ApiError::conflict("HR account already exists with this email"));
    }

    let password_hash = hash_password(&body.password)?;
    let code = generate_verification_code();
    let now = Utc::now();
    let txn = state.db.begin().await?;

    // Joining an existing organization goes through an HR-Admin of that
    // organization (`/api/v1/HR/create-profile`), never through signup.
    let org_name = body.name.trim().to_string();
    let url = body.organization_url.trim().to_string();
    let mail = normalize_email(&body.organization_mail)?;
    let clash = organization::Entity::find()
        .filter(
            Condition::any()
                .add(organization::Column::Name.eq(org_name.clone()))
                .add(organization::Column::Url.eq(url.clone()))
                .add(organization::Column::Mail.eq(mail.clone())),
        )
        .one(&txn)
        .await?;
    if clash.is_some() {
        return Err(ApiError::conflict(
            "An organization with this name, URL or mail already exists",
        ));
    }
    let organization = organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(org_name),
        description: Set(body.description.trim().to_string()),
        url: Set(url),
        mail: Set(mail),
        policies: Set(String::new()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut profile = hr_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization.id),
        department_id: Set(None),
        first_name: Set(body.first_name.trim().to_string()),
        last_name: Set(body.last_name.trim().to_string()),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        contact_number: Set(body.contact_number.trim().to_string()),
        role: Set(HrRole::Admin),
        status: Set(HrStatus::Active),
        is_verified: Set(false),
        verification_code: Set(Some(code.clone())),
        verification_expires_at: Set(Some(expiry_in(VERIFICATION_CODE_TTL_MINUTES))),
        reset_token: Set(None),
        reset_expires_at: Set(None),
        last_login_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    profile.set_permissions(HrPermissions::all());
    let profile = profile.insert(&txn).await?;
    txn.commit().await?;

    state
        .mailer
        .send(verification_mail(&email, &profile.first_name, &code))
        .await?;
    info!(hr_id = %profile.id, organization_id = %organization.id, "hr signup");
    session(
        &state,
        jar,
        StatusCode::CREATED,
        "HR registered successfully",
        views::hr_user(&profile),
    )
}

async fn hr_verify_email(
    State(state): State<AppState>,
    Body(body): Body<VerifyEmail>,
) -> ApiResult<Envelope<()>> {
    let code = required(&body.verification_code, "verificationcode")?;
    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::VerificationCode.eq(code))
        .one(&state.db)
        .await?
        .filter(|profile| {
            profile
                .verification_expires_at
                .is_some_and(|expires| expires > Utc::now())
        })
        .ok_or_else(|| ApiError::Unauthorized {
            message: "Invalid or expired verification code".to_string(),
            portal: None,
        })?;
    let (email, name) = (profile.email.clone(), profile.first_name.clone());
    let mut active: hr_profile::ActiveModel = profile.into();
    active.is_verified = Set(true);
    active.verification_code = Set(None);
    active.verification_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state.mailer.send(welcome_mail(&email, &name)).await?;
    Ok(done("Email verified successfully"))
}

async fn hr_resend_verification(
    State(state): State<AppState>,
    Body(body): Body<EmailOnly>,
) -> ApiResult<Envelope<()>> {
    let email = normalize_email(&body.email)?;
    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("HR account not found"))?;
    if profile.is_verified {
        return Err(ApiError::bad_request("Email is already verified"));
    }
    let code = generate_verification_code();
    let name = profile.first_name.clone();
    let mut active: hr_profile::ActiveModel = profile.into();
    active.verification_code = Set(Some(code.clone()));
    active.verification_expires_at = Set(Some(expiry_in(VERIFICATION_CODE_TTL_MINUTES)));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state
        .mailer
        .send(verification_mail(&email, &name, &code))
        .await?;
    Ok(done("Verification code sent"))
}

async fn hr_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Body(body): Body<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email = normalize_email(&body.email).map_err(|_| bad_credentials())?;
    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq(email))
        .one(&state.db)
        .await?
        .filter(|profile| verify_password(&body.password, &profile.password_hash))
        .ok_or_else(|| {
            warn!("hr login rejected");
            bad_credentials()
        })?;
    if profile.status != HrStatus::Active {
        return Err(ApiError::forbidden("HR account is not active"));
    }
    let mut active: hr_profile::ActiveModel = profile.into();
    active.last_login_at = Set(Some(Utc::now().into()));
    let profile = active.update(&state.db).await?;
    info!(hr_id = %profile.id, "hr login");
    session(
        &state,
        jar,
        StatusCode::OK,
        "Logged in successfully",
        views::hr_user(&profile),
    )
}

async fn hr_check_login(MaybeHr(principal): MaybeHr) -> Envelope<AuthUser> {
    match principal {
        Some(hr) => ok("HR is logged in", views::hr_user(&hr.profile)),
        None => not_logged_in(),
    }
}

async fn hr_check_verified(hr: HrPrincipal) -> Envelope<VerificationState> {
    ok(
        "Verification state",
        VerificationState {
            is_verified: hr.profile.is_verified,
        },
    )
}

async fn hr_logout(jar: CookieJar) -> (CookieJar, Envelope<()>) {
    (jar.add(clear_cookie(Portal::Hr)), done("Logged out successfully"))
}

async fn hr_forgot_password(
    State(state): State<AppState>,
    Body(body): Body<EmailOnly>,
) -> ApiResult<Envelope<()>> {
    let email = normalize_email(&body.email)?;
    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("HR account not found"))?;
    let token = generate_reset_token();
    let mut active: hr_profile::ActiveModel = profile.into();
    active.reset_token = Set(Some(token.clone()));
    active.reset_expires_at = Set(Some(expiry_in(RESET_TOKEN_TTL_MINUTES)));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state
        .mailer
        .send(reset_mail(&email, &state.reset_link(&token)))
        .await?;
    Ok(done("Password reset link sent"))
}

async fn hr_reset_password(
    State(state): State<AppState>,
    PathParam(token): PathParam<String>,
    Body(body): Body<NewPassword>,
) -> ApiResult<Envelope<()>> {
    validate_password(&body.password)?;
    let profile = hr_profile::Entity::find()
        .filter(hr_profile::Column::ResetToken.eq(token))
        .one(&state.db)
        .await?
        .filter(|profile| profile.reset_expires_at.is_some_and(|exp| exp > Utc::now()))
        .ok_or_else(|| ApiError::bad_request("Invalid or expired reset token"))?;
    let email = profile.email.clone();
    let mut active: hr_profile::ActiveModel = profile.into();
    active.password_hash = Set(hash_password(&body.password)?);
    active.reset_token = Set(None);
    active.reset_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state.mailer.send(reset_confirmation_mail(&email)).await?;
    Ok(done("Password reset successfully"))
}

/// Creates an employee account in the caller's organization.
pub(crate) async fn create_employee(
    state: &AppState,
    hr: &HrPrincipal,
    body: NewEmployee,
) -> ApiResult<employee::Model> {
    hr.require(Permission::CreateEmployee)?;
    let first_name = required(&body.first_name, "firstName")?;
    let last_name = required(&body.last_name, "lastName")?;
    let contact_number = required(&body.contact_number, "contactNumber")?;
    let email = normalize_email(&body.email)?;
    validate_password(&body.password)?;
    let employee_code = trimmed(body.employee_code);

    let mut duplicate = Condition::any().add(employee::Column::Email.eq(email.clone()));
    if let Some(code) = &employee_code {
        duplicate = duplicate.add(employee::Column::EmployeeCode.eq(code.clone()));
    }
    if employee::Entity::find()
        .filter(duplicate)
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "Employee already exists with this email or employee code",
        ));
    }
    if let Some(department_id) = body.department_id {
        department_in_org(&state.db, hr.organization_id(), department_id).await?;
    }

    let emergency = body.emergency_contact.unwrap_or_default();
    let now = Utc::now();
    let code = generate_verification_code();
    let model = employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        department_id: Set(body.department_id),
        manager_id: Set(body.manager_id),
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email.clone()),
        password_hash: Set(hash_password(&body.password)?),
        contact_number: Set(contact_number),
        employee_code: Set(employee_code),
        position: Set(trimmed(body.position)),
        date_of_birth: Set(body.date_of_birth),
        gender: Set(body.gender),
        address: Set(trimmed(body.address)),
        joining_date: Set(body.joining_date.or(Some(now.date_naive()))),
        employment_type: Set(body.employment_type.unwrap_or(EmploymentType::FullTime)),
        work_location: Set(trimmed(body.work_location)),
        status: Set(body.status.unwrap_or(EmployeeStatus::Active)),
        emergency_name: Set(trimmed(Some(emergency.name))),
        emergency_relationship: Set(trimmed(Some(emergency.relationship))),
        emergency_phone: Set(trimmed(Some(emergency.phone))),
        skills: Set(employee::encode_skills(&body.skills)),
        education: Set(employee::encode_education(&body.education)),
        is_verified: Set(false),
        verification_code: Set(Some(code.clone())),
        verification_expires_at: Set(Some(expiry_in(VERIFICATION_CODE_TTL_MINUTES))),
        reset_token: Set(None),
        reset_expires_at: Set(None),
        last_login_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;

    state
        .mailer
        .send(verification_mail(&email, &model.first_name, &code))
        .await?;
    info!(employee_id = %model.id, hr_id = %hr.id(), "employee created");
    Ok(model)
}

async fn employee_signup(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewEmployee>,
) -> ApiResult<super::Created<Employee>> {
    let model = create_employee(&state, &hr, body).await?;
    Ok(created(
        "Employee registered successfully",
        views::employee(model, None),
    ))
}

async fn employee_verify_email(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(body): Body<VerifyEmail>,
) -> ApiResult<Envelope<()>> {
    let code = required(&body.verification_code, "verificationcode")?;
    let employee = principal.employee;
    let matches = employee.verification_code.as_deref() == Some(code.as_str())
        && employee
            .verification_expires_at
            .is_some_and(|expires| expires > Utc::now());
    if !matches {
        return Err(ApiError::Unauthorized {
            message: "Invalid or expired verification code".to_string(),
            portal: None,
        });
    }
    let (email, name) = (employee.email.clone(), employee.first_name.clone());
    let mut active: employee::ActiveModel = employee.into();
    active.is_verified = Set(true);
    active.verification_code = Set(None);
    active.verification_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state.mailer.send(welcome_mail(&email, &name)).await?;
    Ok(done("Email verified successfully"))
}

async fn employee_resend_verification(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<()>> {
    let employee = principal.employee;
    if employee.is_verified {
        return Err(ApiError::bad_request("Email is already verified"));
    }
    let code = generate_verification_code();
    let (email, name) = (employee.email.clone(), employee.first_name.clone());
    let mut active: employee::ActiveModel = employee.into();
    active.verification_code = Set(Some(code.clone()));
    active.verification_expires_at = Set(Some(expiry_in(VERIFICATION_CODE_TTL_MINUTES)));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state
        .mailer
        .send(verification_mail(&email, &name, &code))
        .await?;
    Ok(done("Verification code sent"))
}

async fn employee_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Body(body): Body<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email = normalize_email(&body.email).map_err(|_| bad_credentials())?;
    let employee = employee::Entity::find()
        .filter(employee::Column::Email.eq(email))
        .one(&state.db)
        .await?
        .filter(|employee| verify_password(&body.password, &employee.password_hash))
        .ok_or_else(|| {
            warn!("employee login rejected");
            bad_credentials()
        })?;
    let mut active: employee::ActiveModel = employee.into();
    active.last_login_at = Set(Some(Utc::now().into()));
    let employee = active.update(&state.db).await?;
    info!(employee_id = %employee.id, "employee login");
    session(
        &state,
        jar,
        StatusCode::OK,
        "Logged in successfully",
        views::employee_user(&employee),
    )
}

async fn employee_check_login(MaybeEmployee(principal): MaybeEmployee) -> Envelope<AuthUser> {
    match principal {
        Some(employee) => ok("Employee is logged in", views::employee_user(&employee.employee)),
        None => not_logged_in(),
    }
}

async fn employee_check_verified(principal: EmployeePrincipal) -> Envelope<VerificationState> {
    ok(
        "Verification state",
        VerificationState {
            is_verified: principal.employee.is_verified,
        },
    )
}

async fn employee_logout(jar: CookieJar) -> (CookieJar, Envelope<()>) {
    (
        jar.add(clear_cookie(Portal::Employee)),
        done("Logged out successfully"),
    )
}

async fn employee_forgot_password(
    State(state): State<AppState>,
    Body(body): Body<EmailOnly>,
) -> ApiResult<Envelope<()>> {
    let email = normalize_email(&body.email)?;
    let employee = employee::Entity::find()
        .filter(employee::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee account not found"))?;
    let token = generate_reset_token();
    let mut active: employee::ActiveModel = employee.into();
    active.reset_token = Set(Some(token.clone()));
    active.reset_expires_at = Set(Some(expiry_in(RESET_TOKEN_TTL_MINUTES)));
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state
        .mailer
        .send(reset_mail(&email, &state.reset_link(&token)))
        .await?;
    Ok(done("Password reset link sent"))
}

async fn employee_reset_password(
    State(state): State<AppState>,
    PathParam(token): PathParam<String>,
    Body(body): Body<NewPassword>,
) -> ApiResult<Envelope<()>> {
    validate_password(&body.password)?;
    let employee = employee::Entity::find()
        .filter(employee::Column::ResetToken.eq(token))
        .one(&state.db)
        .await?
        .filter(|employee| employee.reset_expires_at.is_some_and(|exp| exp > Utc::now()))
        .ok_or_else(|| ApiError::bad_request("Invalid or expired reset token"))?;
    let email = employee.email.clone();
    let mut active: employee::ActiveModel = employee.into();
    active.password_hash = Set(hash_password(&body.password)?);
    active.reset_token = Set(None);
    active.reset_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    state.mailer.send(reset_confirmation_mail(&email)).await?;
    Ok(done("Password reset successfully"))
}
