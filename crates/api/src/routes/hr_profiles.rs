use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    HrRole, HrStatus,
    hr::{HrPermissions, HrProfile, HrProfileChanges, NewHrProfile, PasswordChange, PermissionUpdate},
};
use entity::hr_profile;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, normalize_email, ok, required};
use crate::{
    auth::{hash_password, validate_password, verify_password},
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal, PathParam},
    routes::departments::department_in_org,
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all-profiles", get(list))
        .route("/create-profile", post(create))
        .route("/profile/{id}", get(fetch))
        .route("/update-profile/{id}", patch(update))
        .route("/delete-profile/{id}", delete(remove))
        .route("/update-permissions/{id}", patch(update_permissions))
        .route("/change-password/{id}", patch(change_password))
}

async fn profile_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<hr_profile::Model> {
    hr_profile::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("HR profile not found"))
}

fn require_self_or_admin(hr: &HrPrincipal, id: Uuid) -> ApiResult<()> {
    if hr.id() == id || hr.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("You can only manage your own profile"))
    }
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<HrProfile>>> {
    let data = hr_profile::Entity::find()
        .filter(hr_profile::Column::OrganizationId.eq(hr.organization_id()))
        .order_by_asc(hr_profile::Column::LastName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::hr_profile)
        .collect();
    Ok(ok("HR profiles fetched successfully", data))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewHrProfile>,
) -> ApiResult<Created<HrProfile>> {
    hr.require_admin()?;
    let first_name = required(&body.first_name, "firstName")?;
    let last_name = required(&body.last_name, "lastName")?;
    let contact_number = required(&body.contact_number, "contactNumber")?;
    let email = normalize_email(&body.email)?;
    validate_password(&body.password)?;
    let taken = hr_profile::Entity::find()
        .filter(hr_profile::Column::Email.eq(email.clone()))
        .one(&state.db)
        .await?;
    if taken.is_some() {
        return Err(ApiError::conflict("HR account already exists with this email"));
    }
    if let Some(department_id) = body.department_id {
        department_in_org(&state.db, hr.organization_id(), department_id).await?;
    }
    let role = body.role.unwrap_or(HrRole::Assistant);
    let permissions = if role == HrRole::Admin {
        HrPermissions::all()
    } else {
        body.permissions.unwrap_or_default()
    };

    let now = Utc::now();
    let mut profile = hr_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        department_id: Set(body.department_id),
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email),
        password_hash: Set(hash_password(&body.password)?),
        contact_number: Set(contact_number),
        role: Set(role),
        status: Set(HrStatus::Active),
        is_verified: Set(true),
        verification_code: Set(None),
        verification_expires_at: Set(None),
        reset_token: Set(None),
        reset_expires_at: Set(None),
        last_login_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    profile.set_permissions(permissions);
    let model = profile.insert(&state.db).await?;
    info!(hr_id = %model.id, created_by = %hr.id(), "hr profile created");
    Ok(created("HR profile created successfully", views::hr_profile(model)))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<HrProfile>> {
    let model = profile_in_org(&state.db, hr.organization_id(), id).await?;
    Ok(ok("HR profile fetched successfully", views::hr_profile(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(changes): Body<HrProfileChanges>,
) -> ApiResult<Envelope<HrProfile>> {
    require_self_or_admin(&hr, id)?;
    let existing = profile_in_org(&state.db, hr.organization_id(), id).await?;
    let mut active: hr_profile::ActiveModel = existing.into();
    if let Some(value) = changes.first_name {
        active.first_name = Set(required(&value, "firstName")?);
    }
    if let Some(value) = changes.last_name {
        active.last_name = Set(required(&value, "lastName")?);
    }
    if let Some(value) = changes.contact_number {
        active.contact_number = Set(required(&value, "contactNumber")?);
    }
    if let Some(department_id) = changes.department_id {
        department_in_org(&state.db, hr.organization_id(), department_id).await?;
        active.department_id = Set(Some(department_id));
    }
    if let Some(status) = changes.status {
        hr.require_admin()?;
        if id == hr.id() && status != HrStatus::Active {
            return Err(ApiError::bad_request("You cannot deactivate your own account"));
        }
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok("HR profile updated successfully", views::hr_profile(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require_admin()?;
    if id == hr.id() {
        return Err(ApiError::bad_request("You cannot delete your own profile"));
    }
    let model = profile_in_org(&state.db, hr.organization_id(), id).await?;
    hr_profile::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(hr_id = %id, deleted_by = %hr.id(), "hr profile deleted");
    Ok(done("HR profile deleted successfully"))
}

async fn update_permissions(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(body): Body<PermissionUpdate>,
) -> ApiResult<Envelope<HrProfile>> {
    hr.require_admin()?;
    let existing = profile_in_org(&state.db, hr.organization_id(), id).await?;
    if id == hr.id() && body.role.is_some_and(|role| role != HrRole::Admin) {
        return Err(ApiError::bad_request("You cannot demote your own account"));
    }
    let role = body.role.unwrap_or(existing.role);
    let permissions = if role == HrRole::Admin {
        HrPermissions::all()
    } else {
        body.permissions.unwrap_or_else(|| existing.permissions())
    };
    let mut active: hr_profile::ActiveModel = existing.into();
    active.role = Set(role);
    active.set_permissions(permissions);
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    info!(hr_id = %id, role = %role, "hr permissions updated");
    Ok(ok("Permissions updated successfully", views::hr_profile(model)))
}

async fn change_password(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(body): Body<PasswordChange>,
) -> ApiResult<Envelope<()>> {
    require_self_or_admin(&hr, id)?;
    let existing = profile_in_org(&state.db, hr.organization_id(), id).await?;
    let acting_on_other = hr.is_admin() && id != hr.id();
    if !acting_on_other {
        let current = body.current_password.as_deref().unwrap_or_default();
        if !verify_password(current, &existing.password_hash) {
            return Err(ApiError::bad_request("Current password is incorrect"));
        }
    }
    validate_password(&body.new_password)?;
    let mut active: hr_profile::ActiveModel = existing.into();
    active.password_hash = Set(hash_password(&body.new_password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;
    info!(hr_id = %id, "hr password changed");
    Ok(done("Password changed successfully"))
}
