use axum::{
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use ems_types::{
    ScheduleStatus, ShiftType,
    hr::Permission,
    notification::SCHEDULE_UPDATED,
    schedule::{DEFAULT_LOCATION, NewSchedule, Schedule, ScheduleChanges, ScheduleRange},
};
use entity::shift_schedule;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{
    Created, Envelope, created, done, employee_in_org, employee_names, json_data, ok, trimmed,
};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam},
    state::AppState,
    views,
};

const DUPLICATE_DAY: &str = "Schedule already exists for this employee on this date";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list))
        .route("/create-schedule", post(create))
        .route("/update-schedule/{id}", put(update))
        .route("/delete-schedule/{id}", delete(remove))
        .route("/date-range", post(date_range))
        .route("/employee/my-schedule", get(my_schedule))
        .route("/employee/{id}", get(for_employee))
        .route("/{id}", get(fetch))
}

async fn schedule_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<shift_schedule::Model> {
    shift_schedule::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Schedule not found"))
}

/// Another schedule of `employee_id` on `date`, ignoring `except`.
async fn day_taken<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    date: NaiveDate,
    except: Option<Uuid>,
) -> ApiResult<bool> {
    let mut query = shift_schedule::Entity::find()
        .filter(shift_schedule::Column::EmployeeId.eq(employee_id))
        .filter(shift_schedule::Column::Date.eq(date));
    if let Some(id) = except {
        query = query.filter(shift_schedule::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

// Shifts may run past midnight, so only an empty shift is rejected.
fn check_times(start: NaiveTime, end: NaiveTime) -> ApiResult<()> {
    if start == end {
        return Err(ApiError::bad_request("startTime and endTime must differ"));
    }
    Ok(())
}

async fn render(
    state: &AppState,
    organization_id: Uuid,
    rows: Vec<shift_schedule::Model>,
) -> ApiResult<Vec<Schedule>> {
    let names = employee_names(&state.db, organization_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let name = names.get(&row.employee_id).cloned();
            views::schedule(row, name)
        })
        .collect())
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Schedule>>> {
    let org = hr.organization_id();
    let rows = shift_schedule::Entity::find()
        .filter(shift_schedule::Column::OrganizationId.eq(org))
        .order_by_asc(shift_schedule::Column::Date)
        .order_by_asc(shift_schedule::Column::StartTime)
        .all(&state.db)
        .await?;
    Ok(ok("Schedules fetched successfully", render(&state, org, rows).await?))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Schedule>> {
    let org = hr.organization_id();
    let model = schedule_in_org(&state.db, org, id).await?;
    let employee = employee_in_org(&state.db, org, model.employee_id).await?;
    Ok(ok(
        "Schedule fetched successfully",
        views::schedule(model, Some(employee.full_name())),
    ))
}

async fn for_employee(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Vec<Schedule>>> {
    let employee = employee_in_org(&state.db, hr.organization_id(), id).await?;
    let name = employee.full_name();
    let data = shift_schedule::Entity::find()
        .filter(shift_schedule::Column::EmployeeId.eq(employee.id))
        .order_by_asc(shift_schedule::Column::Date)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| views::schedule(row, Some(name.clone())))
        .collect();
    Ok(ok("Employee schedules fetched successfully", data))
}

async fn my_schedule(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<Vec<Schedule>>> {
    let name = principal.employee.full_name();
    let data = shift_schedule::Entity::find()
        .filter(shift_schedule::Column::EmployeeId.eq(principal.id()))
        .order_by_asc(shift_schedule::Column::Date)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| views::schedule(row, Some(name.clone())))
        .collect();
    Ok(ok("Schedules fetched successfully", data))
}

async fn date_range(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<ScheduleRange>,
) -> ApiResult<Envelope<Vec<Schedule>>> {
    if body.end_date < body.start_date {
        return Err(ApiError::bad_request("endDate must not be before startDate"));
    }
    let org = hr.organization_id();
    let mut query = shift_schedule::Entity::find()
        .filter(shift_schedule::Column::OrganizationId.eq(org))
        .filter(shift_schedule::Column::Date.between(body.start_date, body.end_date));
    if let Some(employee_id) = body.employee_id {
        employee_in_org(&state.db, org, employee_id).await?;
        query = query.filter(shift_schedule::Column::EmployeeId.eq(employee_id));
    }
    let rows = query
        .order_by_asc(shift_schedule::Column::Date)
        .order_by_asc(shift_schedule::Column::StartTime)
        .all(&state.db)
        .await?;
    Ok(ok("Schedules fetched successfully", render(&state, org, rows).await?))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewSchedule>,
) -> ApiResult<Created<Schedule>> {
    hr.require(Permission::ManageCalendar)?;
    let org = hr.organization_id();
    let employee = employee_in_org(&state.db, org, body.employee_id).await?;
    check_times(body.start_time, body.end_time)?;
    if day_taken(&state.db, employee.id, body.date, None).await? {
        return Err(ApiError::conflict(DUPLICATE_DAY));
    }
    let now = Utc::now();
    let model = shift_schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        employee_id: Set(employee.id),
        date: Set(body.date),
        start_time: Set(body.start_time),
        end_time: Set(body.end_time),
        shift: Set(body.shift.unwrap_or(ShiftType::Custom)),
        location: Set(trimmed(body.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
        notes: Set(trimmed(body.notes).unwrap_or_default()),
        status: Set(ScheduleStatus::Scheduled),
        created_by: Set(hr.id()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    let view = views::schedule(model, Some(employee.full_name()));
    state
        .hub
        .to_user(view.employee_id, SCHEDULE_UPDATED, json_data(&view));
    info!(schedule_id = %view.id, employee_id = %view.employee_id, "schedule created");
    Ok(created("Schedule created successfully", view))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(body): Body<ScheduleChanges>,
) -> ApiResult<Envelope<Schedule>> {
    hr.require(Permission::ManageCalendar)?;
    let org = hr.organization_id();
    let existing = schedule_in_org(&state.db, org, id).await?;
    let employee_id = body.employee_id.unwrap_or(existing.employee_id);
    let employee = employee_in_org(&state.db, org, employee_id).await?;
    let date = body.date.unwrap_or(existing.date);
    check_times(
        body.start_time.unwrap_or(existing.start_time),
        body.end_time.unwrap_or(existing.end_time),
    )?;
    if day_taken(&state.db, employee.id, date, Some(existing.id)).await? {
        return Err(ApiError::conflict(DUPLICATE_DAY));
    }

    let mut active: shift_schedule::ActiveModel = existing.into();
    active.employee_id = Set(employee.id);
    active.date = Set(date);
    if let Some(start) = body.start_time {
        active.start_time = Set(start);
    }
    if let Some(end) = body.end_time {
        active.end_time = Set(end);
    }
    if let Some(shift) = body.shift {
        active.shift = Set(shift);
    }
    if let Some(location) = body.location {
        active.location = Set(trimmed(Some(location)).unwrap_or_else(|| DEFAULT_LOCATION.to_string()));
    }
    if let Some(notes) = body.notes {
        active.notes = Set(notes.trim().to_string());
    }
    if let Some(status) = body.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let view = views::schedule(model, Some(employee.full_name()));
    state
        .hub
        .to_user(view.employee_id, SCHEDULE_UPDATED, json_data(&view));
    Ok(ok("Schedule updated successfully", view))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageCalendar)?;
    let model = schedule_in_org(&state.db, hr.organization_id(), id).await?;
    shift_schedule::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    info!(schedule_id = %id, "schedule deleted");
    Ok(done("Schedule deleted successfully"))
}
