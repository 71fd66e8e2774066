//! Read-only GraphQL view over the same data the REST routers serve.

use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Enum, Error, ErrorExtensions, Object, Schema,
    SimpleObject,
};
use chrono::{NaiveDate, Utc};
use ems_types::{LeaveStatus, Portal, hr::Permission, salary::PayrollBreakdown};
use entity::employee;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::{AnyPrincipal, HrPrincipal},
    payroll,
    routes::{self, dashboard, leaves},
    state::ApiSettings,
};

pub type EmsSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

#[derive(Clone)]
pub struct AppSchema(pub EmsSchema);

pub fn build_schema(db: DatabaseConnection, settings: Arc<ApiSettings>) -> AppSchema {
    let schema = Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(db)
        .data(settings)
        .finish();
    AppSchema(schema)
}

const MAX_EMPLOYEES_PAGE: i32 = 200;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LeaveStatusFilter {
    #[graphql(name = "PENDING")]
    Pending,
    #[graphql(name = "APPROVED")]
    Approved,
    #[graphql(name = "REJECTED")]
    Rejected,
}

impl From<LeaveStatusFilter> for LeaveStatus {
    fn from(value: LeaveStatusFilter) -> Self {
        match value {
            LeaveStatusFilter::Pending => LeaveStatus::Pending,
            LeaveStatusFilter::Approved => LeaveStatus::Approved,
            LeaveStatusFilter::Rejected => LeaveStatus::Rejected,
        }
    }
}

impl From<LeaveStatus> for LeaveStatusFilter {
    fn from(value: LeaveStatus) -> Self {
        match value {
            LeaveStatus::Pending => LeaveStatusFilter::Pending,
            LeaveStatus::Approved => LeaveStatusFilter::Approved,
            LeaveStatus::Rejected => LeaveStatusFilter::Rejected,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ViewerNode {
    pub id: Uuid,
    pub portal: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization_id: Uuid,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DashboardNode {
    pub employees: u64,
    pub departments: u64,
    pub leaves: u64,
    pub pending_leaves: u64,
    pub requests: u64,
    pub open_requests: u64,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeNode {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: Option<String>,
    pub department_id: Option<Uuid>,
    pub status: String,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            position: model.position,
            department_id: model.department_id,
            status: model.status.to_string(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LeaveNode {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub status: LeaveStatusFilter,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PayrollNode {
    pub employee_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub days_worked: u32,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub gross_pay: f64,
    pub tax: f64,
    pub net_pay: f64,
    pub currency: String,
}

impl From<PayrollBreakdown> for PayrollNode {
    fn from(value: PayrollBreakdown) -> Self {
        Self {
            employee_id: value.employee_id,
            period_start: value.period_start,
            period_end: value.period_end,
            days_worked: value.days_worked,
            regular_hours: value.regular_hours,
            overtime_hours: value.overtime_hours,
            gross_pay: value.gross_pay,
            tax: value.tax,
            net_pay: value.net_pay,
            currency: value.currency,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<ViewerNode> {
        Ok(match principal(ctx)? {
            AnyPrincipal::Hr(hr) => ViewerNode {
                id: hr.profile.id,
                portal: Portal::Hr.to_string(),
                role: hr.profile.role.to_string(),
                first_name: hr.profile.first_name,
                last_name: hr.profile.last_name,
                email: hr.profile.email,
                organization_id: hr.profile.organization_id,
            },
            AnyPrincipal::Employee(employee) => ViewerNode {
                id: employee.employee.id,
                portal: Portal::Employee.to_string(),
                role: Portal::Employee.to_string(),
                first_name: employee.employee.first_name,
                last_name: employee.employee.last_name,
                email: employee.employee.email,
                organization_id: employee.employee.organization_id,
            },
        })
    }

    async fn hr_dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<DashboardNode> {
        let hr = require_hr(ctx)?;
        let db = database(ctx)?;
        let summary = dashboard::hr_dashboard(&db, hr.organization_id())
            .await
            .map_err(api_error)?;
        Ok(DashboardNode {
            employees: summary.employees,
            departments: summary.departments,
            leaves: summary.leaves,
            pending_leaves: summary.pending_leaves,
            requests: summary.requests,
            open_requests: summary.open_requests,
        })
    }

    async fn employees(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
        q: Option<String>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let hr = require_hr(ctx)?;
        let db = database(ctx)?;
        let limit = first.unwrap_or(50).clamp(1, MAX_EMPLOYEES_PAGE) as u64;
        let skip = offset.unwrap_or(0).max(0) as u64;
        let mut query =
            employee::Entity::find().filter(employee::Column::OrganizationId.eq(hr.organization_id()));
        if let Some(filter) = sanitize_optional_filter(q) {
            query = query.filter(
                Condition::any()
                    .add(employee::Column::FirstName.contains(&filter))
                    .add(employee::Column::LastName.contains(&filter))
                    .add(employee::Column::Email.contains(&filter)),
            );
        }
        let records = query
            .order_by_asc(employee::Column::LastName)
            .order_by_asc(employee::Column::FirstName)
            .limit(limit)
            .offset(skip)
            .all(&db)
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(EmployeeNode::from).collect())
    }

    async fn leaves(
        &self,
        ctx: &Context<'_>,
        status: Option<LeaveStatusFilter>,
    ) -> async_graphql::Result<Vec<LeaveNode>> {
        let hr = require_hr(ctx)?;
        let db = database(ctx)?;
        let rows = leaves::list_for_org(&db, hr.organization_id(), status.map(LeaveStatus::from))
            .await
            .map_err(api_error)?;
        Ok(rows
            .into_iter()
            .map(|leave| LeaveNode {
                id: leave.id,
                employee_id: leave.employee_id,
                employee_name: leave.employee_name,
                title: leave.title,
                start_date: leave.start_date,
                end_date: leave.end_date,
                days: leave.days,
                status: leave.status.into(),
            })
            .collect())
    }

    async fn payroll_preview(
        &self,
        ctx: &Context<'_>,
        employee_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> async_graphql::Result<PayrollNode> {
        let hr = require_hr(ctx)?;
        if !hr.can(Permission::ViewSalary) {
            return Err(error_with_code("FORBIDDEN", "Insufficient permissions"));
        }
        let db = database(ctx)?;
        let settings = ctx
            .data::<Arc<ApiSettings>>()
            .map_err(|_| error_with_code("INTERNAL", "Missing server settings"))?;
        routes::employee_in_org(&db, hr.organization_id(), employee_id)
            .await
            .map_err(api_error)?;
        let payroll_settings =
            payroll::load_settings(&db, hr.organization_id(), &settings.currency)
                .await
                .map_err(api_error)?;
        let end = end.unwrap_or_else(|| Utc::now().date_naive());
        let start = start.unwrap_or_else(|| payroll::period_ending(end, payroll_settings.period_days));
        let breakdown =
            payroll::calculate_for_employee(&db, employee_id, start, end, &payroll_settings, 0.0, 0.0)
                .await
                .map_err(api_error)?;
        Ok(breakdown.into())
    }
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<DatabaseConnection> {
    ctx.data::<DatabaseConnection>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing database connection"))
}

fn principal(ctx: &Context<'_>) -> async_graphql::Result<AnyPrincipal> {
    ctx.data::<AnyPrincipal>()
        .cloned()
        .map_err(|_| error_with_code("UNAUTHENTICATED", "Authentication required"))
}

fn require_hr(ctx: &Context<'_>) -> async_graphql::Result<HrPrincipal> {
    match principal(ctx)? {
        AnyPrincipal::Hr(hr) => Ok(hr),
        AnyPrincipal::Employee(_) => Err(error_with_code("FORBIDDEN", "HR access required")),
    }
}

fn sanitize_optional_filter(value: Option<String>) -> Option<String> {
    value
        .map(|input| input.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn db_error(err: DbErr) -> Error {
    error_with_code("INTERNAL", format!("Database error: {}", err))
}

fn api_error(err: ApiError) -> Error {
    let code = match err {
        ApiError::BadRequest(_) | ApiError::Conflict(_) => "VALIDATION",
        ApiError::Unauthorized { .. } => "UNAUTHENTICATED",
        ApiError::Forbidden(_) => "FORBIDDEN",
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::Internal(_) => "INTERNAL",
    };
    error_with_code(code, err.to_string())
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}
