use std::collections::HashMap;

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    hr::Permission,
    recruitment::{NewRecruitment, Recruitment, RecruitmentUpdate, RecruitmentUpdateResult},
};
use entity::{applicant, recruitment, recruitment_applicant};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, ok, required};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal, PathParam},
    routes::departments::department_in_org,
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-recruitment", post(create))
        .route("/all", get(list))
        .route("/update-recruitment/{id}", patch(update))
        .route("/delete-recruitment/{id}", delete(remove))
        .route("/{id}", get(fetch))
}

async fn recruitment_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<recruitment::Model> {
    recruitment::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Recruitment not found"))
}

async fn title_taken<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    title: &str,
    except: Option<Uuid>,
) -> ApiResult<bool> {
    let mut query = recruitment::Entity::find()
        .filter(recruitment::Column::OrganizationId.eq(organization_id))
        .filter(recruitment::Column::JobTitle.eq(title));
    if let Some(id) = except {
        query = query.filter(recruitment::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn applicants_of<C: ConnectionTrait>(
    db: &C,
    recruitment_id: Uuid,
) -> ApiResult<Vec<applicant::Model>> {
    let ids: Vec<Uuid> = recruitment_applicant::Entity::find()
        .filter(recruitment_applicant::Column::RecruitmentId.eq(recruitment_id))
        .order_by_asc(recruitment_applicant::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.applicant_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(applicant::Entity::find()
        .filter(applicant::Column::Id.is_in(ids))
        .order_by_asc(applicant::Column::LastName)
        .all(db)
        .await?)
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewRecruitment>,
) -> ApiResult<Created<Recruitment>> {
    hr.require(Permission::ManageRecruitment)?;
    let org = hr.organization_id();
    let job_title = required(&body.job_title, "jobTitle")?;
    let description = required(&body.description, "description")?;
    if title_taken(&state.db, org, &job_title, None).await? {
        return Err(ApiError::conflict("A recruitment with this job title already exists"));
    }
    if let Some(department_id) = body.department_id {
        department_in_org(&state.db, org, department_id).await?;
    }
    let now = Utc::now();
    let model = recruitment::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        department_id: Set(body.department_id),
        job_title: Set(job_title),
        description: Set(description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(recruitment_id = %model.id, "recruitment created");
    Ok(created(
        "Recruitment created successfully",
        views::recruitment(model, Vec::new()),
    ))
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Recruitment>>> {
    let org = hr.organization_id();
    let postings = recruitment::Entity::find()
        .filter(recruitment::Column::OrganizationId.eq(org))
        .order_by_desc(recruitment::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let applicants: HashMap<Uuid, applicant::Model> = applicant::Entity::find()
        .filter(applicant::Column::OrganizationId.eq(org))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();
    let mut links: HashMap<Uuid, Vec<applicant::Model>> = HashMap::new();
    for link in recruitment_applicant::Entity::find()
        .order_by_asc(recruitment_applicant::Column::CreatedAt)
        .all(&state.db)
        .await?
    {
        if let Some(model) = applicants.get(&link.applicant_id) {
            links.entry(link.recruitment_id).or_default().push(model.clone());
        }
    }
    let data = postings
        .into_iter()
        .map(|posting| {
            let attached = links.remove(&posting.id).unwrap_or_default();
            views::recruitment(posting, attached)
        })
        .collect();
    Ok(ok("Recruitments fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Recruitment>> {
    let model = recruitment_in_org(&state.db, hr.organization_id(), id).await?;
    let applicants = applicants_of(&state.db, model.id).await?;
    Ok(ok(
        "Recruitment fetched successfully",
        views::recruitment(model, applicants),
    ))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(body): Body<RecruitmentUpdate>,
) -> ApiResult<Envelope<RecruitmentUpdateResult>> {
    hr.require(Permission::ManageRecruitment)?;
    let org = hr.organization_id();
    let txn = state.db.begin().await?;
    let existing = recruitment_in_org(&txn, org, id).await?;
    let mut active: recruitment::ActiveModel = existing.into();
    if let Some(title) = body.job_title {
        let title = required(&title, "jobTitle")?;
        if title_taken(&txn, org, &title, Some(id)).await? {
            return Err(ApiError::conflict("A recruitment with this job title already exists"));
        }
        active.job_title = Set(title);
    }
    if let Some(description) = body.description {
        active.description = Set(required(&description, "description")?);
    }
    if let Some(department_id) = body.department_id {
        department_in_org(&txn, org, department_id).await?;
        active.department_id = Set(Some(department_id));
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&txn).await?;

    let mut added = Vec::new();
    let mut already_present = Vec::new();
    for applicant_id in body.application_ids {
        if added.contains(&applicant_id) || already_present.contains(&applicant_id) {
            continue;
        }
        let known = applicant::Entity::find_by_id(applicant_id)
            .one(&txn)
            .await?
            .is_some_and(|found| found.organization_id == org);
        if !known {
            return Err(ApiError::not_found(format!("Applicant {applicant_id} not found")));
        }
        let linked = recruitment_applicant::Entity::find_by_id((model.id, applicant_id))
            .one(&txn)
            .await?
            .is_some();
        if linked {
            already_present.push(applicant_id);
            continue;
        }
        recruitment_applicant::ActiveModel {
            recruitment_id: Set(model.id),
            applicant_id: Set(applicant_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        added.push(applicant_id);
    }
    let applicants = applicants_of(&txn, model.id).await?;
    txn.commit().await?;

    info!(recruitment_id = %id, added = added.len(), "recruitment updated");
    Ok(ok(
        "Recruitment updated successfully",
        RecruitmentUpdateResult {
            recruitment: views::recruitment(model, applicants),
            added,
            already_present,
        },
    ))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageRecruitment)?;
    let model = recruitment_in_org(&state.db, hr.organization_id(), id).await?;
    recruitment::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(recruitment_id = %id, "recruitment deleted");
    Ok(done("Recruitment deleted successfully"))
}
