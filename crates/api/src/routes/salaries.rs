//! Salary records, organization payroll settings and the two payroll runs.

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    PaymentType, SalaryStatus,
    hr::Permission,
    notification::{DASHBOARD_REFRESH, SALARY_CREATED},
    salary::{
        AutoPayrollReport, AutoPayrollRequest, DEFAULT_HOURLY_RATE, NewSalary, PayrollCalculation,
        PayrollCalculationRequest, PayrollSettings, Salary, SalaryUpdate,
    },
};
use entity::salary;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{
    Created, Envelope, created, done, employee_in_org, employee_names, json_data, ok, required,
};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam},
    payroll::{self, round2},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/all", get(list))
        .route("/update", patch(update))
        .route("/delete/{id}", delete(remove))
        .route("/employee/my-salary", get(my_salaries))
        .route("/settings", get(settings).put(save_settings))
        .route("/calculate", post(calculate))
        .route("/auto-payroll", post(auto_payroll))
        .route("/{id}", get(fetch))
}

async fn salary_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<salary::Model> {
    salary::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Salary record not found"))
}

fn non_negative(value: f64, field: &str) -> ApiResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!("{field} must be a non-negative number")))
    }
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewSalary>,
) -> ApiResult<Created<Salary>> {
    hr.require(Permission::ManageSalary)?;
    let org = hr.organization_id();
    let employee = employee_in_org(&state.db, org, body.employee_id).await?;
    let basic_pay = non_negative(body.basic_pay, "basicpay")?;
    let bonus_percentage = non_negative(body.bonus_percentage, "bonusePT")?;
    let deduction_percentage = non_negative(body.deduction_percentage, "deductionPT")?;
    let currency = required(&body.currency, "currency")?.to_uppercase();
    if payroll::salary_exists(&state.db, employee.id, body.due_date).await? {
        return Err(ApiError::conflict(
            "Salary record already exists for this employee and due date",
        ));
    }

    let (bonuses, deductions, net_pay) =
        payroll::manual_figures(basic_pay, bonus_percentage, deduction_percentage);
    let now = Utc::now();
    let model = salary::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(org),
        employee_id: Set(employee.id),
        basic_pay: Set(round2(basic_pay)),
        bonuses: Set(bonuses),
        deductions: Set(deductions),
        net_pay: Set(net_pay),
        currency: Set(currency),
        due_date: Set(body.due_date),
        payment_date: Set(body.payment_date),
        status: Set(body.status.unwrap_or(SalaryStatus::Pending)),
        work_hours: Set(body.work_hours.unwrap_or(0.0)),
        overtime_hours: Set(body.overtime_hours.unwrap_or(0.0)),
        hourly_rate: Set(body.hourly_rate.unwrap_or(DEFAULT_HOURLY_RATE)),
        payment_type: Set(PaymentType::Manual),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;

    let view = views::salary(model, Some(employee.full_name()));
    state.hub.to_user(employee.id, SALARY_CREATED, json_data(&view));
    info!(salary_id = %view.id, employee_id = %employee.id, "salary created");
    Ok(created("Salary created successfully", view))
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Salary>>> {
    hr.require(Permission::ViewSalary)?;
    let org = hr.organization_id();
    let names = employee_names(&state.db, org).await?;
    let data = salary::Entity::find()
        .filter(salary::Column::OrganizationId.eq(org))
        .order_by_desc(salary::Column::DueDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| {
            let name = names.get(&model.employee_id).cloned();
            views::salary(model, name)
        })
        .collect();
    Ok(ok("Salaries fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Salary>> {
    hr.require(Permission::ViewSalary)?;
    let org = hr.organization_id();
    let model = salary_in_org(&state.db, org, id).await?;
    let name = employee_in_org(&state.db, org, model.employee_id)
        .await
        .ok()
        .map(|employee| employee.full_name());
    Ok(ok("Salary fetched successfully", views::salary(model, name)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<SalaryUpdate>,
) -> ApiResult<Envelope<Salary>> {
    hr.require(Permission::ManageSalary)?;
    let org = hr.organization_id();
    let existing = salary_in_org(&state.db, org, body.salary_id).await?;
    if let Some(due_date) = body.due_date {
        if due_date != existing.due_date
            && payroll::salary_exists(&state.db, existing.employee_id, due_date).await?
        {
            return Err(ApiError::conflict(
                "Salary record already exists for this employee and due date",
            ));
        }
    }

    let basic_pay = body.basic_pay.map(|v| non_negative(v, "basicPay")).transpose()?;
    let bonuses = body.bonuses.map(|v| non_negative(v, "bonuses")).transpose()?;
    let deductions = body.deductions.map(|v| non_negative(v, "deductions")).transpose()?;
    let figures_changed = basic_pay.is_some() || bonuses.is_some() || deductions.is_some();
    let basic_pay = round2(basic_pay.unwrap_or(existing.basic_pay));
    let bonuses = round2(bonuses.unwrap_or(existing.bonuses));
    let deductions = round2(deductions.unwrap_or(existing.deductions));
    let employee_id = existing.employee_id;

    let mut active: salary::ActiveModel = existing.into();
    if figures_changed {
        active.basic_pay = Set(basic_pay);
        active.bonuses = Set(bonuses);
        active.deductions = Set(deductions);
        active.net_pay = Set(round2(basic_pay + bonuses - deductions));
    }
    if let Some(currency) = body.currency {
        active.currency = Set(required(&currency, "currency")?.to_uppercase());
    }
    if let Some(due_date) = body.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(payment_date) = body.payment_date {
        active.payment_date = Set(Some(payment_date));
    }
    if let Some(status) = body.status {
        active.status = Set(status);
        if status == SalaryStatus::Paid && body.payment_date.is_none() {
            active.payment_date = Set(Some(Utc::now().date_naive()));
        }
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let name = employee_in_org(&state.db, org, employee_id)
        .await
        .ok()
        .map(|employee| employee.full_name());
    Ok(ok("Salary updated successfully", views::salary(model, name)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageSalary)?;
    let model = salary_in_org(&state.db, hr.organization_id(), id).await?;
    salary::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(salary_id = %id, "salary deleted");
    Ok(done("Salary deleted successfully"))
}

async fn my_salaries(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<Vec<Salary>>> {
    let name = principal.employee.full_name();
    let data = salary::Entity::find()
        .filter(salary::Column::EmployeeId.eq(principal.id()))
        .order_by_desc(salary::Column::DueDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| views::salary(model, Some(name.clone())))
        .collect();
    Ok(ok("Salaries fetched successfully", data))
}

async fn settings(
    State(state): State<AppState>,
    hr: HrPrincipal,
) -> ApiResult<Envelope<PayrollSettings>> {
    hr.require(Permission::ViewSalary)?;
    let settings =
        payroll::load_settings(&state.db, hr.organization_id(), &state.settings.currency).await?;
    Ok(ok("Payroll settings fetched successfully", settings))
}

async fn save_settings(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<PayrollSettings>,
) -> ApiResult<Envelope<PayrollSettings>> {
    hr.require(Permission::ManageSalary)?;
    let saved = payroll::save_settings(&state.db, hr.organization_id(), &body).await?;
    info!(organization_id = %hr.organization_id(), "payroll settings saved");
    Ok(ok("Payroll settings saved successfully", saved))
}

async fn calculate(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<PayrollCalculationRequest>,
) -> ApiResult<Envelope<PayrollCalculation>> {
    hr.require(Permission::ViewSalary)?;
    if body.save {
        hr.require(Permission::ManageSalary)?;
    }
    let org = hr.organization_id();
    let employee = employee_in_org(&state.db, org, body.employee_id).await?;
    let bonus_percentage = non_negative(body.bonus_percentage, "bonusePT")?;
    let deduction_percentage = non_negative(body.deduction_percentage, "deductionPT")?;
    let settings = payroll::load_settings(&state.db, org, &state.settings.currency).await?;
    let end = body.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = body
        .start_date
        .unwrap_or_else(|| payroll::period_ending(end, settings.period_days));
    let breakdown = payroll::calculate_for_employee(
        &state.db,
        employee.id,
        start,
        end,
        &settings,
        bonus_percentage,
        deduction_percentage,
    )
    .await?;

    let salary = if body.save {
        if payroll::salary_exists(&state.db, employee.id, end).await? {
            return Err(ApiError::conflict(
                "Salary record already exists for this employee and due date",
            ));
        }
        let model = payroll::salary_from_breakdown(
            org,
            &breakdown,
            SalaryStatus::Pending,
            PaymentType::AutoCalculated,
        )
        .insert(&state.db)
        .await?;
        let view = views::salary(model, Some(employee.full_name()));
        state.hub.to_user(employee.id, SALARY_CREATED, json_data(&view));
        info!(salary_id = %view.id, employee_id = %employee.id, "calculated salary saved");
        Some(view)
    } else {
        None
    };

    Ok(ok(
        "Payroll calculated successfully",
        PayrollCalculation { breakdown, salary },
    ))
}

async fn auto_payroll(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<AutoPayrollRequest>,
) -> ApiResult<Envelope<AutoPayrollReport>> {
    hr.require(Permission::ManageSalary)?;
    let org = hr.organization_id();
    let settings = payroll::load_settings(&state.db, org, &state.settings.currency).await?;
    let period_end = body.period_end.unwrap_or_else(|| Utc::now().date_naive());
    let report = payroll::run_auto_payroll(&state.db, org, period_end, &settings).await?;
    for salary in &report.salaries {
        state
            .hub
            .to_user(salary.employee_id, SALARY_CREATED, json_data(salary));
    }
    state.hub.to_org(
        org,
        DASHBOARD_REFRESH,
        json!({ "processed": report.processed }),
    );
    let message = format!(
        "Auto payroll finished: {} processed, {} skipped, {} failed",
        report.processed, report.skipped, report.failed
    );
    Ok(ok(message, report))
}
