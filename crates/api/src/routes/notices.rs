use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    NoticeAudience,
    hr::Permission,
    notice::{MAX_CONTENT_LEN, MAX_TITLE_LEN, NewNotice, Notice, NoticeUpdate},
    notification::NOTICE_PUBLISHED,
};
use entity::notice;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, employee_in_org, json_data, ok, required};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam},
    routes::departments::department_in_org,
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list))
        .route("/create-notice", post(create))
        .route("/update-notice", patch(update))
        .route("/delete-notice/{id}", delete(remove))
        .route("/employee/my-notices", get(my_notices))
        .route("/{id}", get(fetch))
}

async fn notice_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<notice::Model> {
    notice::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Notice not found"))
}

fn bounded(value: &str, field: &str, max: usize) -> ApiResult<String> {
    let text = required(value, field)?;
    if text.chars().count() > max {
        return Err(ApiError::bad_request(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(text)
}

/// Department and employee ids kept for `audience`, each checked against
/// the organization. Ids the audience does not use are dropped.
async fn resolve_target<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    audience: NoticeAudience,
    department_id: Option<Uuid>,
    employee_id: Option<Uuid>,
) -> ApiResult<(Option<Uuid>, Option<Uuid>)> {
    match audience {
        NoticeAudience::All => Ok((None, None)),
        NoticeAudience::DepartmentSpecific => {
            let id = department_id.ok_or_else(|| {
                ApiError::bad_request("departmentId is required for Department-Specific notices")
            })?;
            department_in_org(db, organization_id, id).await?;
            Ok((Some(id), None))
        }
        NoticeAudience::EmployeeSpecific => {
            let id = employee_id.ok_or_else(|| {
                ApiError::bad_request("employeeId is required for Employee-Specific notices")
            })?;
            employee_in_org(db, organization_id, id).await?;
            Ok((None, Some(id)))
        }
    }
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Notice>>> {
    let data = notice::Entity::find()
        .filter(notice::Column::OrganizationId.eq(hr.organization_id()))
        .order_by_desc(notice::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::notice)
        .collect();
    Ok(ok("Notices fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Notice>> {
    let model = notice_in_org(&state.db, hr.organization_id(), id).await?;
    Ok(ok("Notice fetched successfully", views::notice(model)))
}

/// Notices addressed to everyone, to the employee's department or to the
/// employee directly.
async fn my_notices(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<Vec<Notice>>> {
    let mut audience = Condition::any()
        .add(notice::Column::Audience.eq(NoticeAudience::All))
        .add(notice::Column::EmployeeId.eq(principal.id()));
    if let Some(department_id) = principal.employee.department_id {
        audience = audience.add(notice::Column::DepartmentId.eq(department_id));
    }
    let data = notice::Entity::find()
        .filter(notice::Column::OrganizationId.eq(principal.organization_id()))
        .filter(audience)
        .order_by_desc(notice::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::notice)
        .collect();
    Ok(ok("Notices fetched successfully", data))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewNotice>,
) -> ApiResult<Created<Notice>> {
    hr.require(Permission::ManageCalendar)?;
    let org = hr.organization_id();
    let title = bounded(&body.title, "title", MAX_TITLE_LEN)?;
    let content = bounded(&body.content, "content", MAX_CONTENT_LEN)?;
    let audience = body.audience.unwrap_or(NoticeAudience::All);
    let (department_id, employee_id) =
        resolve_target(&state.db, org, audience, body.department_id, body.employee_id).await?;
    let now = Utc::now();
    let model = notice::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        title: Set(title),
        content: Set(content),
        audience: Set(audience),
        department_id: Set(department_id),
        employee_id: Set(employee_id),
        created_by: Set(hr.id()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    let view = views::notice(model);
    match view.employee_id {
        Some(employee_id) => state.hub.to_user(employee_id, NOTICE_PUBLISHED, json_data(&view)),
        None => state.hub.to_org(org, NOTICE_PUBLISHED, json_data(&view)),
    };
    info!(notice_id = %view.id, audience = %view.audience, "notice published");
    Ok(created("Notice created successfully", view))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NoticeUpdate>,
) -> ApiResult<Envelope<Notice>> {
    hr.require(Permission::ManageCalendar)?;
    let org = hr.organization_id();
    let existing = notice_in_org(&state.db, org, body.notice_id).await?;
    let audience = body.audience.unwrap_or(existing.audience);
    let (department_id, employee_id) = resolve_target(
        &state.db,
        org,
        audience,
        body.department_id.or(existing.department_id),
        body.employee_id.or(existing.employee_id),
    )
    .await?;

    let mut active: notice::ActiveModel = existing.into();
    if let Some(title) = body.title {
        active.title = Set(bounded(&title, "title", MAX_TITLE_LEN)?);
    }
    if let Some(content) = body.content {
        active.content = Set(bounded(&content, "content", MAX_CONTENT_LEN)?);
    }
    active.audience = Set(audience);
    active.department_id = Set(department_id);
    active.employee_id = Set(employee_id);
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok("Notice updated successfully", views::notice(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageCalendar)?;
    let model = notice_in_org(&state.db, hr.organization_id(), id).await?;
    notice::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(notice_id = %id, "notice deleted");
    Ok(done("Notice deleted successfully"))
}
