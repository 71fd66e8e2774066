use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use ems_types::{
    LeaveStatus, RequestStatus,
    dashboard::{EmployeeDashboard, HrDashboard},
};
use entity::{department, employee, employee_request, leave_application, salary};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::{Envelope, employee_names, ok};
use crate::{
    attendance::clock_status,
    error::ApiResult,
    extract::{EmployeePrincipal, HrPrincipal},
    payroll,
    state::AppState,
    views,
};

const RECENT_ITEMS: u64 = 5;
const NEWEST_EMPLOYEES: u64 = 3;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/HR-dashboard", get(hr))
        .route("/employee-dashboard", get(employee_view))
}

pub async fn hr_dashboard<C: ConnectionTrait>(db: &C, organization_id: Uuid) -> ApiResult<HrDashboard> {
    let employees = employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(organization_id))
        .count(db)
        .await?;
    let departments = department::Entity::find()
        .filter(department::Column::OrganizationId.eq(organization_id))
        .count(db)
        .await?;
    let leaves = leave_application::Entity::find()
        .filter(leave_application::Column::OrganizationId.eq(organization_id))
        .count(db)
        .await?;
    let pending_leaves = leave_application::Entity::find()
        .filter(leave_application::Column::OrganizationId.eq(organization_id))
        .filter(leave_application::Column::Status.eq(LeaveStatus::Pending))
        .count(db)
        .await?;
    let requests = employee_request::Entity::find()
        .filter(employee_request::Column::OrganizationId.eq(organization_id))
        .count(db)
        .await?;
    let open_requests = employee_request::Entity::find()
        .filter(employee_request::Column::OrganizationId.eq(organization_id))
        .filter(
            employee_request::Column::Status
                .is_not_in([RequestStatus::Closed, RequestStatus::Denied]),
        )
        .count(db)
        .await?;

    let names = employee_names(db, organization_id).await?;
    let recent_leaves = leave_application::Entity::find()
        .filter(leave_application::Column::OrganizationId.eq(organization_id))
        .order_by_desc(leave_application::Column::CreatedAt)
        .limit(RECENT_ITEMS)
        .all(db)
        .await?
        .into_iter()
        .map(|model| {
            let name = names.get(&model.employee_id).cloned();
            views::leave(model, name)
        })
        .collect();
    let recent_requests = employee_request::Entity::find()
        .filter(employee_request::Column::OrganizationId.eq(organization_id))
        .order_by_desc(employee_request::Column::CreatedAt)
        .limit(RECENT_ITEMS)
        .all(db)
        .await?
        .into_iter()
        .map(|model| {
            let name = names.get(&model.employee_id).cloned();
            views::request(model, name)
        })
        .collect();
    let recent_employees = employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(organization_id))
        .order_by_desc(employee::Column::CreatedAt)
        .limit(NEWEST_EMPLOYEES)
        .all(db)
        .await?
        .into_iter()
        .map(|model| views::employee(model, None))
        .collect();

    Ok(HrDashboard {
        employees,
        departments,
        leaves,
        pending_leaves,
        requests,
        open_requests,
        recent_leaves,
        recent_requests,
        recent_employees,
    })
}

async fn hr(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<HrDashboard>> {
    let summary = hr_dashboard(&state.db, hr.organization_id()).await?;
    Ok(ok("Dashboard fetched successfully", summary))
}

async fn employee_view(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<EmployeeDashboard>> {
    let today = Utc::now().date_naive();
    let employee_id = principal.id();
    let settings =
        payroll::load_settings(&state.db, principal.organization_id(), &state.settings.currency)
            .await?;
    let start = payroll::period_ending(today, settings.period_days);
    let hours: f64 = payroll::attendance_hours(&state.db, employee_id, start, today)
        .await?
        .into_iter()
        .sum();
    let clock = clock_status(&state.db, employee_id, today).await?;
    let pending_leaves = leave_application::Entity::find()
        .filter(leave_application::Column::EmployeeId.eq(employee_id))
        .filter(leave_application::Column::Status.eq(LeaveStatus::Pending))
        .count(&state.db)
        .await?;
    let open_requests = employee_request::Entity::find()
        .filter(employee_request::Column::EmployeeId.eq(employee_id))
        .filter(
            employee_request::Column::Status
                .is_not_in([RequestStatus::Closed, RequestStatus::Denied]),
        )
        .count(&state.db)
        .await?;
    let latest_salary = salary::Entity::find()
        .filter(salary::Column::EmployeeId.eq(employee_id))
        .order_by_desc(salary::Column::DueDate)
        .one(&state.db)
        .await?
        .map(|model| views::salary(model, Some(principal.employee.full_name())));

    Ok(ok(
        "Dashboard fetched successfully",
        EmployeeDashboard {
            clock,
            hours_this_period: payroll::round2(hours),
            pending_leaves,
            latest_salary,
            open_requests,
        },
    ))
}
