use std::collections::HashSet;

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::{NaiveDate, Utc};
use ems_types::{
    AttendanceStatus, LeaveStatus,
    hr::Permission,
    leave::{
        DEFAULT_LEAVE_TITLE, Leave, LeaveDecision, LeaveFilter, LeaveUpdate, MAX_LEAVE_DAYS,
        NewLeave,
    },
    notification::{DASHBOARD_REFRESH, LEAVE_UPDATED},
};
use entity::{attendance, leave_application};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, employee_names, json_data, ok, required, trimmed};
use crate::{
    error::{ApiError, ApiResult},
    extract::{AnyPrincipal, Body, EmployeePrincipal, HrPrincipal, PathParam, QueryParams},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-leave", post(create))
        .route("/my-leaves", get(my_leaves))
        .route("/employee-update-leave", patch(employee_update))
        .route("/delete-leave/{id}", delete(remove))
        .route("/all", get(list))
        .route("/HR-update-leave", patch(decide))
        .route("/{id}", get(fetch))
}

/// Leaves of an organization, newest first, optionally narrowed to one status.
pub async fn list_for_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    status: Option<LeaveStatus>,
) -> ApiResult<Vec<Leave>> {
    let names = employee_names(db, organization_id).await?;
    let mut query = leave_application::Entity::find()
        .filter(leave_application::Column::OrganizationId.eq(organization_id));
    if let Some(status) = status {
        query = query.filter(leave_application::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(leave_application::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|model| {
            let name = names.get(&model.employee_id).cloned();
            views::leave(model, name)
        })
        .collect())
}

async fn leave_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<leave_application::Model> {
    leave_application::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Leave not found"))
}

fn check_range(start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
    if end < start {
        return Err(ApiError::bad_request("End date must be on or after start date"));
    }
    if (end - start).num_days() + 1 > MAX_LEAVE_DAYS {
        return Err(ApiError::bad_request(format!(
            "A leave cannot span more than {MAX_LEAVE_DAYS} days"
        )));
    }
    Ok(())
}

/// Marks every day of an approved leave as `Leave` in the attendance sheet.
async fn mark_leave_days<C: ConnectionTrait>(db: &C, leave: &leave_application::Model) -> ApiResult<()> {
    let now = Utc::now();
    let existing = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(leave.employee_id))
        .filter(attendance::Column::Date.between(leave.start_date, leave.end_date))
        .all(db)
        .await?;
    let covered: HashSet<NaiveDate> = existing.iter().map(|row| row.date).collect();
    for row in existing {
        let mut active: attendance::ActiveModel = row.into();
        active.status = Set(AttendanceStatus::Leave);
        active.updated_at = Set(now.into());
        active.update(db).await?;
    }

    let missing: Vec<attendance::ActiveModel> = leave
        .start_date
        .iter_days()
        .take_while(|day| *day <= leave.end_date)
        .filter(|day| !covered.contains(day))
        .map(|day| attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(leave.organization_id),
            employee_id: Set(leave.employee_id),
            date: Set(day),
            status: Set(AttendanceStatus::Leave),
            check_in: Set(None),
            check_out: Set(None),
            work_hours: Set(0.0),
            comments: Set(Some(leave.title.clone())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        })
        .collect();
    if !missing.is_empty() {
        attendance::Entity::insert_many(missing).exec(db).await?;
    }
    Ok(())
}

async fn create(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(body): Body<NewLeave>,
) -> ApiResult<Created<Leave>> {
    check_range(body.start_date, body.end_date)?;
    let reason = required(&body.reason, "reason")?;
    let title = trimmed(body.title).unwrap_or_else(|| DEFAULT_LEAVE_TITLE.to_string());
    let now = Utc::now();
    let model = leave_application::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(principal.organization_id()),
        employee_id: Set(principal.id()),
        title: Set(title),
        reason: Set(reason),
        start_date: Set(body.start_date),
        end_date: Set(body.end_date),
        status: Set(LeaveStatus::Pending),
        approved_by: Set(None),
        hr_comment: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(leave_id = %model.id, employee_id = %principal.id(), "leave requested");
    state
        .hub
        .to_org(principal.organization_id(), DASHBOARD_REFRESH, json!({ "leaveId": model.id }));
    Ok(created(
        "Leave application created successfully",
        views::leave(model, Some(principal.employee.full_name())),
    ))
}

async fn my_leaves(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<Vec<Leave>>> {
    let name = principal.employee.full_name();
    let data = leave_application::Entity::find()
        .filter(leave_application::Column::EmployeeId.eq(principal.id()))
        .order_by_desc(leave_application::Column::StartDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| views::leave(model, Some(name.clone())))
        .collect();
    Ok(ok("Leaves fetched successfully", data))
}

async fn employee_update(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(body): Body<LeaveUpdate>,
) -> ApiResult<Envelope<Leave>> {
    let existing = leave_in_org(&state.db, principal.organization_id(), body.leave_id).await?;
    if existing.employee_id != principal.id() {
        return Err(ApiError::not_found("Leave not found"));
    }
    if existing.status != LeaveStatus::Pending {
        return Err(ApiError::bad_request("Only pending leaves can be updated"));
    }
    let start = body.start_date.unwrap_or(existing.start_date);
    let end = body.end_date.unwrap_or(existing.end_date);
    check_range(start, end)?;
    let mut active: leave_application::ActiveModel = existing.into();
    if let Some(title) = body.title {
        active.title = Set(trimmed(Some(title)).unwrap_or_else(|| DEFAULT_LEAVE_TITLE.to_string()));
    }
    if let Some(reason) = body.reason {
        active.reason = Set(required(&reason, "reason")?);
    }
    active.start_date = Set(start);
    active.end_date = Set(end);
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok(
        "Leave updated successfully",
        views::leave(model, Some(principal.employee.full_name())),
    ))
}

async fn remove(
    State(state): State<AppState>,
    principal: AnyPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    let model = leave_in_org(&state.db, principal.organization_id(), id).await?;
    match &principal {
        AnyPrincipal::Hr(hr) => hr.require(Permission::ManageLeaves)?,
        AnyPrincipal::Employee(employee) => {
            if model.employee_id != employee.id() {
                return Err(ApiError::not_found("Leave not found"));
            }
            if model.status != LeaveStatus::Pending {
                return Err(ApiError::bad_request("Only pending leaves can be deleted"));
            }
        }
    }
    leave_application::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!(leave_id = %id, portal = %principal.portal(), "leave deleted");
    Ok(done("Leave deleted successfully"))
}

async fn list(
    State(state): State<AppState>,
    hr: HrPrincipal,
    QueryParams(filter): QueryParams<LeaveFilter>,
) -> ApiResult<Envelope<Vec<Leave>>> {
    let data = list_for_org(&state.db, hr.organization_id(), filter.status).await?;
    Ok(ok("Leaves fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Leave>> {
    let org = hr.organization_id();
    let model = leave_in_org(&state.db, org, id).await?;
    let name = employee_names(&state.db, org)
        .await?
        .remove(&model.employee_id);
    Ok(ok("Leave fetched successfully", views::leave(model, name)))
}

async fn decide(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<LeaveDecision>,
) -> ApiResult<Envelope<Leave>> {
    hr.require(Permission::ManageLeaves)?;
    if body.status == LeaveStatus::Pending {
        return Err(ApiError::bad_request("Status must be Approved or Rejected"));
    }
    let org = hr.organization_id();
    let txn = state.db.begin().await?;
    let existing = leave_in_org(&txn, org, body.leave_id).await?;
    if existing.status != LeaveStatus::Pending {
        return Err(ApiError::bad_request(format!(
            "Leave has already been {}",
            existing.status.as_str().to_lowercase()
        )));
    }
    let mut active: leave_application::ActiveModel = existing.into();
    active.status = Set(body.status);
    active.approved_by = Set(Some(hr.id()));
    active.hr_comment = Set(trimmed(body.comment));
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&txn).await?;
    if model.status == LeaveStatus::Approved {
        check_range(model.start_date, model.end_date)?;
        mark_leave_days(&txn, &model).await?;
    }
    txn.commit().await?;

    let name = employee_names(&state.db, org)
        .await?
        .remove(&model.employee_id);
    let view = views::leave(model, name);
    state
        .hub
        .to_user(view.employee_id, LEAVE_UPDATED, json_data(&view));
    state
        .hub
        .to_org(org, DASHBOARD_REFRESH, json!({ "leaveId": view.id }));
    info!(leave_id = %view.id, status = %view.status, hr_id = %hr.id(), "leave decided");
    Ok(ok(format!("Leave {}", view.status.as_str().to_lowercase()), view))
}
