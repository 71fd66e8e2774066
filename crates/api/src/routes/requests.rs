use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    Portal, RequestPriority, RequestStatus, RequestType,
    hr::Permission,
    notification::{DASHBOARD_REFRESH, REQUEST_UPDATED},
    request::{
        EmployeeRequest, NewRequest, NewRequestByHr, RequestClose, RequestContentUpdate,
        RequestPriorityUpdate, RequestStatusUpdate,
    },
};
use entity::{employee, employee_request};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, employee_in_org, employee_names, json_data, ok, required, trimmed};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-request", post(create))
        .route("/update-request-content", patch(update_content))
        .route("/employee/{id}", get(for_employee))
        .route("/create-request-by-hr", post(create_by_hr))
        .route("/all", get(list))
        .route("/update-request-status", patch(update_status))
        .route("/close-request", patch(close))
        .route("/update-priority", patch(update_priority))
        .route("/delete-request/{id}", delete(remove))
        .route("/{id}", get(fetch))
}

async fn request_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<employee_request::Model> {
    employee_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Request not found"))
}

async fn duplicate_exists<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    title: &str,
    content: &str,
) -> ApiResult<bool> {
    Ok(employee_request::Entity::find()
        .filter(employee_request::Column::EmployeeId.eq(employee_id))
        .filter(employee_request::Column::Title.eq(title))
        .filter(employee_request::Column::Content.eq(content))
        .one(db)
        .await?
        .is_some())
}

struct Draft {
    title: String,
    content: String,
    request_type: RequestType,
    priority: RequestPriority,
    status: RequestStatus,
    created_by: Portal,
}

async fn insert_request(
    state: &AppState,
    employee: &employee::Model,
    draft: Draft,
) -> ApiResult<EmployeeRequest> {
    if duplicate_exists(&state.db, employee.id, &draft.title, &draft.content).await? {
        return Err(ApiError::conflict("An identical request already exists"));
    }
    let now = Utc::now();
    let model = employee_request::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(employee.organization_id),
        employee_id: Set(employee.id),
        department_id: Set(employee.department_id),
        title: Set(draft.title),
        content: Set(draft.content),
        request_type: Set(draft.request_type),
        priority: Set(draft.priority),
        status: Set(draft.status),
        created_by: Set(draft.created_by),
        approved_by: Set(None),
        hr_comments: Set(None),
        closed_by: Set(None),
        closed_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    let view = views::request(model, Some(employee.full_name()));
    state.hub.to_org(
        employee.organization_id,
        DASHBOARD_REFRESH,
        json!({ "requestId": view.id }),
    );
    info!(request_id = %view.id, employee_id = %employee.id, created_by = %view.created_by, "request created");
    Ok(view)
}

/// Publishes a changed request to its owner and refreshes HR dashboards.
fn announce(state: &AppState, organization_id: Uuid, request: &EmployeeRequest) {
    state
        .hub
        .to_user(request.employee_id, REQUEST_UPDATED, json_data(request));
    state.hub.to_org(
        organization_id,
        DASHBOARD_REFRESH,
        json!({ "requestId": request.id }),
    );
}

async fn with_name(
    state: &AppState,
    organization_id: Uuid,
    model: employee_request::Model,
) -> ApiResult<EmployeeRequest> {
    let name = employee_names(&state.db, organization_id)
        .await?
        .remove(&model.employee_id);
    Ok(views::request(model, name))
}

async fn create(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(body): Body<NewRequest>,
) -> ApiResult<Created<EmployeeRequest>> {
    let draft = Draft {
        title: required(&body.title, "title")?,
        content: required(&body.content, "content")?,
        request_type: body.request_type.unwrap_or(RequestType::General),
        priority: body.priority.unwrap_or(RequestPriority::Medium),
        status: RequestStatus::Pending,
        created_by: Portal::Employee,
    };
    let view = insert_request(&state, &principal.employee, draft).await?;
    Ok(created("Request created successfully", view))
}

async fn update_content(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(body): Body<RequestContentUpdate>,
) -> ApiResult<Envelope<EmployeeRequest>> {
    let existing = request_in_org(&state.db, principal.organization_id(), body.request_id).await?;
    if existing.employee_id != principal.id() {
        return Err(ApiError::forbidden("You can only update your own requests"));
    }
    if existing.status == RequestStatus::Closed {
        return Err(ApiError::bad_request("Closed requests cannot be updated"));
    }
    let mut active: employee_request::ActiveModel = existing.into();
    if let Some(title) = body.title {
        active.title = Set(required(&title, "title")?);
    }
    if let Some(content) = body.content {
        active.content = Set(required(&content, "content")?);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let view = views::request(model, Some(principal.employee.full_name()));
    state.hub.to_org(
        principal.organization_id(),
        DASHBOARD_REFRESH,
        json!({ "requestId": view.id }),
    );
    Ok(ok("Request updated successfully", view))
}

async fn for_employee(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    PathParam(employee_id): PathParam<Uuid>,
) -> ApiResult<Envelope<Vec<EmployeeRequest>>> {
    if employee_id != principal.id() {
        return Err(ApiError::forbidden("You can only view your own requests"));
    }
    let name = principal.employee.full_name();
    let data = employee_request::Entity::find()
        .filter(employee_request::Column::EmployeeId.eq(employee_id))
        .order_by_desc(employee_request::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| views::request(model, Some(name.clone())))
        .collect();
    Ok(ok("Requests fetched successfully", data))
}

async fn create_by_hr(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewRequestByHr>,
) -> ApiResult<Created<EmployeeRequest>> {
    hr.require(Permission::ManageRequests)?;
    let employee = employee_in_org(&state.db, hr.organization_id(), body.employee_id).await?;
    let draft = Draft {
        title: required(&body.title, "title")?,
        content: required(&body.content, "content")?,
        request_type: body.request_type.unwrap_or(RequestType::General),
        priority: body.priority.unwrap_or(RequestPriority::Medium),
        status: body.status.unwrap_or(RequestStatus::Pending),
        created_by: Portal::Hr,
    };
    let view = insert_request(&state, &employee, draft).await?;
    state
        .hub
        .to_user(employee.id, REQUEST_UPDATED, json_data(&view));
    Ok(created("Request created successfully", view))
}

async fn list(
    State(state): State<AppState>,
    hr: HrPrincipal,
) -> ApiResult<Envelope<Vec<EmployeeRequest>>> {
    hr.require(Permission::ManageRequests)?;
    let org = hr.organization_id();
    let names = employee_names(&state.db, org).await?;
    let data = employee_request::Entity::find()
        .filter(employee_request::Column::OrganizationId.eq(org))
        .order_by_desc(employee_request::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| {
            let name = names.get(&model.employee_id).cloned();
            views::request(model, name)
        })
        .collect();
    Ok(ok("Requests fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<EmployeeRequest>> {
    hr.require(Permission::ManageRequests)?;
    let model = request_in_org(&state.db, hr.organization_id(), id).await?;
    let view = with_name(&state, hr.organization_id(), model).await?;
    Ok(ok("Request fetched successfully", view))
}

async fn update_status(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<RequestStatusUpdate>,
) -> ApiResult<Envelope<EmployeeRequest>> {
    hr.require(Permission::ManageRequests)?;
    let org = hr.organization_id();
    let existing = request_in_org(&state.db, org, body.request_id).await?;
    let now = Utc::now();
    let mut active: employee_request::ActiveModel = existing.into();
    active.status = Set(body.status);
    match body.status {
        RequestStatus::Closed => {
            active.closed_by = Set(Some(hr.id()));
            active.closed_at = Set(Some(now.into()));
        }
        RequestStatus::Approved => {
            active.approved_by = Set(Some(hr.id()));
        }
        _ => {}
    }
    if let Some(comments) = trimmed(body.hr_comments) {
        active.hr_comments = Set(Some(comments));
    }
    active.updated_at = Set(now.into());
    let model = active.update(&state.db).await?;
    let view = with_name(&state, org, model).await?;
    announce(&state, org, &view);
    info!(request_id = %view.id, status = %view.status, hr_id = %hr.id(), "request status updated");
    Ok(ok("Request status updated successfully", view))
}

async fn close(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<RequestClose>,
) -> ApiResult<Envelope<EmployeeRequest>> {
    hr.require(Permission::ManageRequests)?;
    let org = hr.organization_id();
    let existing = request_in_org(&state.db, org, body.request_id).await?;
    if existing.status == RequestStatus::Closed {
        return Err(ApiError::bad_request("Request is already closed"));
    }
    let now = Utc::now();
    let mut active: employee_request::ActiveModel = existing.into();
    active.status = Set(RequestStatus::Closed);
    active.closed_by = Set(Some(hr.id()));
    active.closed_at = Set(Some(now.into()));
    if let Some(comments) = trimmed(body.hr_comments) {
        active.hr_comments = Set(Some(comments));
    }
    active.updated_at = Set(now.into());
    let model = active.update(&state.db).await?;
    let view = with_name(&state, org, model).await?;
    announce(&state, org, &view);
    Ok(ok("Request closed successfully", view))
}

async fn update_priority(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<RequestPriorityUpdate>,
) -> ApiResult<Envelope<EmployeeRequest>> {
    hr.require(Permission::ManageRequests)?;
    let org = hr.organization_id();
    let existing = request_in_org(&state.db, org, body.request_id).await?;
    let mut active: employee_request::ActiveModel = existing.into();
    active.priority = Set(body.priority);
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let view = with_name(&state, org, model).await?;
    announce(&state, org, &view);
    Ok(ok("Request priority updated successfully", view))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageRequests)?;
    let model = request_in_org(&state.db, hr.organization_id(), id).await?;
    employee_request::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!(request_id = %id, "request deleted");
    Ok(done("Request deleted successfully"))
}
