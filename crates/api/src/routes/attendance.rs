use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use ems_types::{
    AttendanceStatus,
    attendance::{AttendanceChanges, AttendanceRecord, ClockStatus, DateRange, NewAttendance},
    notification::ATTENDANCE_UPDATED,
};
use entity::attendance;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Select,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, employee_in_org, employee_names, json_data, ok, trimmed};
use crate::{
    attendance as engine,
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam, QueryParams},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/employee/my-status", get(my_status))
        .route("/employee/my-attendance", get(my_attendance))
        .route("/employee/clock-in", post(clock_in))
        .route("/employee/clock-out", post(clock_out))
        .route("/employee/{id}", get(for_employee))
        .route("/employee-history/{id}", get(history))
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).patch(update).delete(remove))
}

async fn record_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<attendance::Model> {
    attendance::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Attendance record not found"))
}

fn within(mut query: Select<attendance::Entity>, range: &DateRange) -> ApiResult<Select<attendance::Entity>> {
    if let (Some(start), Some(end)) = (range.start_date, range.end_date) {
        if end < start {
            return Err(ApiError::bad_request("endDate must not be before startDate"));
        }
    }
    if let Some(start) = range.start_date {
        query = query.filter(attendance::Column::Date.gte(start));
    }
    if let Some(end) = range.end_date {
        query = query.filter(attendance::Column::Date.lte(end));
    }
    Ok(query)
}

async fn named<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    rows: Vec<attendance::Model>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let names = employee_names(db, organization_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let name = names.get(&row.employee_id).cloned();
            views::attendance(row, name)
        })
        .collect())
}

async fn my_status(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<ClockStatus>> {
    let status = engine::clock_status(&state.db, principal.id(), Utc::now().date_naive()).await?;
    Ok(ok("Clock status fetched successfully", status))
}

async fn my_attendance(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    QueryParams(range): QueryParams<DateRange>,
) -> ApiResult<Envelope<Vec<AttendanceRecord>>> {
    let query = attendance::Entity::find().filter(attendance::Column::EmployeeId.eq(principal.id()));
    let name = principal.employee.full_name();
    let data = within(query, &range)?
        .order_by_desc(attendance::Column::Date)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| views::attendance(row, Some(name.clone())))
        .collect();
    Ok(ok("Attendance fetched successfully", data))
}

async fn clock_in(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<AttendanceRecord>> {
    let record = engine::clock_in(
        &state.db,
        principal.organization_id(),
        principal.id(),
        Utc::now(),
    )
    .await?;
    let view = views::attendance(record, Some(principal.employee.full_name()));
    state
        .hub
        .to_org(principal.organization_id(), ATTENDANCE_UPDATED, json_data(&view));
    info!(employee_id = %principal.id(), "clocked in");
    Ok(ok("Clocked in successfully", view))
}

async fn clock_out(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<AttendanceRecord>> {
    let record = engine::clock_out(&state.db, principal.id(), Utc::now()).await?;
    let view = views::attendance(record, Some(principal.employee.full_name()));
    state
        .hub
        .to_org(principal.organization_id(), ATTENDANCE_UPDATED, json_data(&view));
    info!(employee_id = %principal.id(), hours = view.work_hours, "clocked out");
    Ok(ok("Clocked out successfully", view))
}

async fn list(
    State(state): State<AppState>,
    hr: HrPrincipal,
    QueryParams(range): QueryParams<DateRange>,
) -> ApiResult<Envelope<Vec<AttendanceRecord>>> {
    let org = hr.organization_id();
    let query = attendance::Entity::find().filter(attendance::Column::OrganizationId.eq(org));
    let rows = within(query, &range)?
        .order_by_desc(attendance::Column::Date)
        .all(&state.db)
        .await?;
    Ok(ok("Attendance fetched successfully", named(&state.db, org, rows).await?))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<AttendanceRecord>> {
    let org = hr.organization_id();
    let row = record_in_org(&state.db, org, id).await?;
    let mut records = named(&state.db, org, vec![row]).await?;
    let record = records
        .pop()
        .ok_or_else(|| ApiError::not_found("Attendance record not found"))?;
    Ok(ok("Attendance fetched successfully", record))
}

async fn for_employee(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(employee_id): PathParam<Uuid>,
) -> ApiResult<Envelope<Vec<AttendanceRecord>>> {
    let employee = employee_in_org(&state.db, hr.organization_id(), employee_id).await?;
    let name = employee.full_name();
    let data = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id))
        .order_by_desc(attendance::Column::Date)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| views::attendance(row, Some(name.clone())))
        .collect();
    Ok(ok("Attendance fetched successfully", data))
}

async fn history(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(employee_id): PathParam<Uuid>,
    QueryParams(range): QueryParams<DateRange>,
) -> ApiResult<Envelope<Vec<AttendanceRecord>>> {
    let employee = employee_in_org(&state.db, hr.organization_id(), employee_id).await?;
    let name = employee.full_name();
    let query = attendance::Entity::find().filter(attendance::Column::EmployeeId.eq(employee.id));
    let data = within(query, &range)?
        .order_by_asc(attendance::Column::Date)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| views::attendance(row, Some(name.clone())))
        .collect();
    Ok(ok("Attendance history fetched successfully", data))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewAttendance>,
) -> ApiResult<Created<AttendanceRecord>> {
    let org = hr.organization_id();
    let employee = employee_in_org(&state.db, org, body.employee_id).await?;
    if engine::record_for_day(&state.db, employee.id, body.date)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "Attendance already recorded for this employee and date",
        ));
    }
    let now = Utc::now();
    let model = attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        employee_id: Set(employee.id),
        date: Set(body.date),
        status: Set(body.status.unwrap_or(AttendanceStatus::Present)),
        check_in: Set(body.check_in),
        check_out: Set(body.check_out),
        work_hours: Set(engine::hours_for(body.check_in, body.check_out)),
        comments: Set(trimmed(body.comments)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    let view = views::attendance(model, Some(employee.full_name()));
    state.hub.to_org(org, ATTENDANCE_UPDATED, json_data(&view));
    Ok(created("Attendance recorded successfully", view))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
    Body(changes): Body<AttendanceChanges>,
) -> ApiResult<Envelope<AttendanceRecord>> {
    let org = hr.organization_id();
    let existing = record_in_org(&state.db, org, id).await?;
    let check_in = changes.check_in.or(existing.check_in);
    let check_out = changes.check_out.or(existing.check_out);
    let mut active: attendance::ActiveModel = existing.into();
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(comments) = changes.comments {
        active.comments = Set(trimmed(Some(comments)));
    }
    active.check_in = Set(check_in);
    active.check_out = Set(check_out);
    active.work_hours = Set(engine::hours_for(check_in, check_out));
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let mut records = named(&state.db, org, vec![model]).await?;
    let view = records
        .pop()
        .ok_or_else(|| ApiError::not_found("Attendance record not found"))?;
    state.hub.to_org(org, ATTENDANCE_UPDATED, json_data(&view));
    Ok(ok("Attendance updated successfully", view))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    let model = record_in_org(&state.db, hr.organization_id(), id).await?;
    attendance::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(attendance_id = %id, "attendance deleted");
    Ok(done("Attendance deleted successfully"))
}
