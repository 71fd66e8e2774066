use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    ApplicantStatus,
    hr::Permission,
    recruitment::{Applicant, ApplicantUpdate, NewApplicant},
};
use entity::applicant;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, normalize_email, ok, required};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal, PathParam},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-applicant", post(create))
        .route("/all", get(list))
        .route("/update-applicant", patch(update))
        .route("/delete-applicant/{id}", delete(remove))
        .route("/{id}", get(fetch))
}

pub(crate) async fn applicant_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<applicant::Model> {
    applicant::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Applicant not found"))
}

async fn email_taken<C: ConnectionTrait>(db: &C, email: &str) -> ApiResult<bool> {
    Ok(applicant::Entity::find()
        .filter(applicant::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some())
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewApplicant>,
) -> ApiResult<Created<Applicant>> {
    hr.require(Permission::ManageRecruitment)?;
    let email = normalize_email(&body.email)?;
    if email_taken(&state.db, &email).await? {
        return Err(ApiError::conflict("Applicant already exists with this email"));
    }
    let now = Utc::now();
    let model = applicant::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        first_name: Set(required(&body.first_name, "firstName")?),
        last_name: Set(required(&body.last_name, "lastName")?),
        email: Set(email),
        contact_number: Set(required(&body.contact_number, "contactNumber")?),
        applied_role: Set(required(&body.applied_role, "appliedRole")?),
        status: Set(body.status.unwrap_or(ApplicantStatus::NotSpecified)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(applicant_id = %model.id, "applicant created");
    Ok(created("Applicant created successfully", views::applicant(model)))
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Applicant>>> {
    let data = applicant::Entity::find()
        .filter(applicant::Column::OrganizationId.eq(hr.organization_id()))
        .order_by_desc(applicant::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::applicant)
        .collect();
    Ok(ok("Applicants fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Applicant>> {
    let model = applicant_in_org(&state.db, hr.organization_id(), id).await?;
    Ok(ok("Applicant fetched successfully", views::applicant(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<ApplicantUpdate>,
) -> ApiResult<Envelope<Applicant>> {
    hr.require(Permission::ManageRecruitment)?;
    let existing = applicant_in_org(&state.db, hr.organization_id(), body.applicant_id).await?;
    let current_email = existing.email.clone();
    let mut active: applicant::ActiveModel = existing.into();
    if let Some(email) = body.email {
        let email = normalize_email(&email)?;
        if email != current_email && email_taken(&state.db, &email).await? {
            return Err(ApiError::conflict("Applicant already exists with this email"));
        }
        active.email = Set(email);
    }
    if let Some(value) = body.first_name {
        active.first_name = Set(required(&value, "firstName")?);
    }
    if let Some(value) = body.last_name {
        active.last_name = Set(required(&value, "lastName")?);
    }
    if let Some(value) = body.contact_number {
        active.contact_number = Set(required(&value, "contactNumber")?);
    }
    if let Some(value) = body.applied_role {
        active.applied_role = Set(required(&value, "appliedRole")?);
    }
    if let Some(status) = body.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok("Applicant updated successfully", views::applicant(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageRecruitment)?;
    let model = applicant_in_org(&state.db, hr.organization_id(), id).await?;
    applicant::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(applicant_id = %id, "applicant deleted");
    Ok(done("Applicant deleted successfully"))
}
