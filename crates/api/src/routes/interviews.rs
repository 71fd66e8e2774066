use std::collections::HashMap;

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    InterviewStatus,
    hr::Permission,
    recruitment::{InterviewInsight, InterviewInsightChanges, NewInterviewInsight},
};
use entity::{applicant, hr_profile, interview_insight};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, ok, trimmed};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal, PathParam},
    routes::applicants::applicant_in_org,
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-interview", post(create))
        .route("/all", get(list))
        .route("/update-interview/{id}", patch(update))
        .route("/delete-interview/{id}", delete(remove))
        .route("/{id}", get(fetch))
}

async fn insight_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<interview_insight::Model> {
    interview_insight::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Interview insight not found"))
}

async fn interviewer_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<hr_profile::Model> {
    hr_profile::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Interviewer not found"))
}

struct Names {
    applicants: HashMap<Uuid, String>,
    interviewers: HashMap<Uuid, String>,
}

impl Names {
    async fn load<C: ConnectionTrait>(db: &C, organization_id: Uuid) -> ApiResult<Self> {
        let applicants = applicant::Entity::find()
            .filter(applicant::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.full_name()))
            .collect();
        let interviewers = hr_profile::Entity::find()
            .filter(hr_profile::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model.full_name()))
            .collect();
        Ok(Self {
            applicants,
            interviewers,
        })
    }

    fn render(&self, model: interview_insight::Model) -> InterviewInsight {
        let applicant = self.applicants.get(&model.applicant_id).cloned();
        let interviewer = model
            .interviewer_id
            .and_then(|id| self.interviewers.get(&id).cloned());
        views::interview(model, applicant, interviewer)
    }
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewInterviewInsight>,
) -> ApiResult<Created<InterviewInsight>> {
    hr.require(Permission::ManageRecruitment)?;
    let org = hr.organization_id();
    applicant_in_org(&state.db, org, body.applicant_id).await?;
    let interviewer_id = body.interviewer_id.unwrap_or(hr.id());
    interviewer_in_org(&state.db, org, interviewer_id).await?;
    let now = Utc::now();
    let model = interview_insight::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        applicant_id: Set(body.applicant_id),
        interviewer_id: Set(Some(interviewer_id)),
        feedback: Set(trimmed(body.feedback)),
        interview_date: Set(body.interview_date),
        response_date: Set(body.response_date),
        status: Set(body.status.unwrap_or(InterviewStatus::Pending)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(interview_id = %model.id, applicant_id = %body.applicant_id, "interview scheduled");
    let names = Names::load(&state.db, org).await?;
    Ok(created("Interview insight created successfully", names.render(model)))
}

async fn list(
    State(state): State<AppState>,
    hr: HrPrincipal,
) -> ApiResult<Envelope<Vec<InterviewInsight>>> {
    let org = hr.organization_id();
    let names = Names::load(&state.db, org).await?;
    let data = interview_insight::Entity::find()
        .filter(interview_insight::Column::OrganizationId.eq(org))
        .order_by_desc(interview_insight::Column::InterviewDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| names.render(model))
        .collect();
    Ok(ok("Interview insights fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<InterviewInsight>> {
    let org = hr.organization_id();
    let model = insight_in_org(&state.db, org, id).await?;
    let names = Names::load(&state.db, org).await?;
    Ok(ok("Interview insight fetched successfully", names.render(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(changes): Body<InterviewInsightChanges>,
) -> ApiResult<Envelope<InterviewInsight>> {
    hr.require(Permission::ManageRecruitment)?;
    let org = hr.organization_id();
    let existing = insight_in_org(&state.db, org, id).await?;
    let mut active: interview_insight::ActiveModel = existing.into();
    if let Some(interviewer_id) = changes.interviewer_id {
        interviewer_in_org(&state.db, org, interviewer_id).await?;
        active.interviewer_id = Set(Some(interviewer_id));
    }
    if let Some(feedback) = changes.feedback {
        active.feedback = Set(trimmed(Some(feedback)));
    }
    if let Some(date) = changes.interview_date {
        active.interview_date = Set(date);
    }
    if let Some(date) = changes.response_date {
        active.response_date = Set(Some(date));
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let names = Names::load(&state.db, org).await?;
    Ok(ok("Interview insight updated successfully", names.render(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageRecruitment)?;
    let model = insight_in_org(&state.db, hr.organization_id(), id).await?;
    interview_insight::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    Ok(done("Interview insight deleted successfully"))
}
