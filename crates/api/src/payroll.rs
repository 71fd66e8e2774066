//! Attendance-based payroll.
//!
//! The arithmetic is pure and unit tested below; the database half loads
//! settings and attendance for an organization and stores the resulting
//! salary rows.

use chrono::{Duration, NaiveDate, Utc};
use ems_types::{
    EmployeeStatus, PaymentType, SalaryStatus,
    salary::{AutoPayrollReport, PayrollBreakdown, PayrollSettings},
};
use entity::{attendance, employee, payroll_settings, salary};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    views,
};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First day of the period of `period_days` days that ends on `end`.
pub fn period_ending(end: NaiveDate, period_days: i64) -> NaiveDate {
    end - Duration::days(period_days.max(1) - 1)
}

/// Bonuses, deductions and net pay of a manually entered salary, from
/// percentages of the basic pay.
pub fn manual_figures(basic_pay: f64, bonus_percentage: f64, deduction_percentage: f64) -> (f64, f64, f64) {
    let bonuses = round2(basic_pay * bonus_percentage / 100.0);
    let deductions = round2(basic_pay * deduction_percentage / 100.0);
    (bonuses, deductions, round2(basic_pay + bonuses - deductions))
}

pub fn calculate(
    employee_id: Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
    hours: impl IntoIterator<Item = f64>,
    settings: &PayrollSettings,
    bonus_percentage: f64,
    deduction_percentage: f64,
) -> PayrollBreakdown {
    let mut regular = 0.0;
    let mut overtime = 0.0;
    let mut days_worked = 0u32;
    for worked in hours {
        if worked <= 0.0 {
            continue;
        }
        days_worked += 1;
        regular += worked.min(settings.standard_day_hours);
        overtime += (worked - settings.standard_day_hours).max(0.0);
    }

    let overtime_rate = settings.hourly_rate * settings.overtime_multiplier;
    let regular_pay = regular * settings.hourly_rate;
    let overtime_pay = overtime * overtime_rate;
    let gross = regular_pay + overtime_pay;
    // Net is derived from the rounded parts so the reported figures add up.
    let gross_pay = round2(gross);
    let tax = round2(gross * settings.tax_rate / 100.0);
    let bonus = round2(gross * bonus_percentage / 100.0);
    let deduction = round2(gross * deduction_percentage / 100.0);

    PayrollBreakdown {
        employee_id,
        period_start,
        period_end,
        days_worked,
        regular_hours: round2(regular),
        overtime_hours: round2(overtime),
        total_hours: round2(regular + overtime),
        hourly_rate: settings.hourly_rate,
        overtime_rate: round2(overtime_rate),
        regular_pay: round2(regular_pay),
        overtime_pay: round2(overtime_pay),
        gross_pay,
        tax,
        bonus,
        deduction,
        net_pay: round2(gross_pay + bonus - tax - deduction),
        currency: settings.currency.clone(),
    }
}

/// Settings row of the organization, or the defaults in `fallback_currency`.
pub async fn load_settings<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    fallback_currency: &str,
) -> ApiResult<PayrollSettings> {
    let stored = payroll_settings::Entity::find_by_id(organization_id)
        .one(db)
        .await?;
    Ok(stored.map(PayrollSettings::from).unwrap_or_else(|| PayrollSettings {
        currency: fallback_currency.to_string(),
        ..PayrollSettings::default()
    }))
}

pub async fn save_settings<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    settings: &PayrollSettings,
) -> ApiResult<PayrollSettings> {
    validate_settings(settings)?;
    let now = Utc::now();
    let currency = settings.currency.trim().to_uppercase();
    let existing = payroll_settings::Entity::find_by_id(organization_id)
        .one(db)
        .await?;
    let saved = match existing {
        Some(model) => {
            let mut active: payroll_settings::ActiveModel = model.into();
            active.hourly_rate = Set(settings.hourly_rate);
            active.overtime_multiplier = Set(settings.overtime_multiplier);
            active.tax_rate = Set(settings.tax_rate);
            active.standard_day_hours = Set(settings.standard_day_hours);
            active.period_days = Set(settings.period_days as i32);
            active.currency = Set(currency);
            active.updated_at = Set(now.into());
            active.update(db).await?
        }
        None => {
            payroll_settings::ActiveModel {
                organization_id: Set(organization_id),
                hourly_rate: Set(settings.hourly_rate),
                overtime_multiplier: Set(settings.overtime_multiplier),
                tax_rate: Set(settings.tax_rate),
                standard_day_hours: Set(settings.standard_day_hours),
                period_days: Set(settings.period_days as i32),
                currency: Set(currency),
                updated_at: Set(now.into()),
            }
            .insert(db)
            .await?
        }
    };
    Ok(saved.into())
}

fn validate_settings(settings: &PayrollSettings) -> ApiResult<()> {
    if settings.hourly_rate <= 0.0 {
        return Err(ApiError::bad_request("hourlyRate must be positive"));
    }
    if settings.overtime_multiplier < 1.0 {
        return Err(ApiError::bad_request("overtimeMultiplier must be at least 1"));
    }
    if !(0.0..=100.0).contains(&settings.tax_rate) {
        return Err(ApiError::bad_request("taxRate must be between 0 and 100"));
    }
    if settings.standard_day_hours <= 0.0 || settings.standard_day_hours > 24.0 {
        return Err(ApiError::bad_request("standardDayHours must be within 0-24"));
    }
    if !(1..=62).contains(&settings.period_days) {
        return Err(ApiError::bad_request("periodDays must be within 1-62"));
    }
    if settings.currency.trim().is_empty() {
        return Err(ApiError::bad_request("currency is required"));
    }
    Ok(())
}

pub async fn attendance_hours<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<f64>> {
    let rows = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Date.between(start, end))
        .order_by_asc(attendance::Column::Date)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.work_hours).collect())
}

pub async fn calculate_for_employee<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    settings: &PayrollSettings,
    bonus_percentage: f64,
    deduction_percentage: f64,
) -> ApiResult<PayrollBreakdown> {
    if end < start {
        return Err(ApiError::bad_request("endDate must not be before startDate"));
    }
    let hours = attendance_hours(db, employee_id, start, end).await?;
    Ok(calculate(
        employee_id,
        start,
        end,
        hours,
        settings,
        bonus_percentage,
        deduction_percentage,
    ))
}

/// Salary row for a computed breakdown. Tax and the deduction percentage are
/// both booked as deductions so that `net = basic + bonuses - deductions`.
pub fn salary_from_breakdown(
    organization_id: Uuid,
    breakdown: &PayrollBreakdown,
    status: SalaryStatus,
    payment_type: PaymentType,
) -> salary::ActiveModel {
    let now = Utc::now();
    let deductions = round2(breakdown.tax + breakdown.deduction);
    salary::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        employee_id: Set(breakdown.employee_id),
        basic_pay: Set(breakdown.gross_pay),
        bonuses: Set(breakdown.bonus),
        deductions: Set(deductions),
        net_pay: Set(round2(breakdown.gross_pay + breakdown.bonus - deductions)),
        currency: Set(breakdown.currency.clone()),
        due_date: Set(breakdown.period_end),
        payment_date: Set(None),
        status: Set(status),
        work_hours: Set(breakdown.total_hours),
        overtime_hours: Set(breakdown.overtime_hours),
        hourly_rate: Set(breakdown.hourly_rate),
        payment_type: Set(payment_type),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

pub async fn salary_exists<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    due_date: NaiveDate,
) -> ApiResult<bool> {
    Ok(salary::Entity::find()
        .filter(salary::Column::EmployeeId.eq(employee_id))
        .filter(salary::Column::DueDate.eq(due_date))
        .one(db)
        .await?
        .is_some())
}

enum Outcome {
    Created(salary::Model),
    Skipped,
}

/// Runs payroll for every active employee of the organization over the
/// period ending on `period_end`.
pub async fn run_auto_payroll(
    db: &DatabaseConnection,
    organization_id: Uuid,
    period_end: NaiveDate,
    settings: &PayrollSettings,
) -> ApiResult<AutoPayrollReport> {
    let period_start = period_ending(period_end, settings.period_days);
    let employees = employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(organization_id))
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .order_by_asc(employee::Column::LastName)
        .all(db)
        .await?;

    let mut processed = 0u32;
    let mut skipped = 0u32;
    let mut failed = 0u32;
    let mut created = Vec::new();

    for employee in employees {
        match payroll_one(db, organization_id, &employee, period_start, period_end, settings).await {
            Ok(Outcome::Created(model)) => {
                processed += 1;
                created.push(views::salary(model, Some(employee.full_name())));
            }
            Ok(Outcome::Skipped) => skipped += 1,
            Err(err) => {
                failed += 1;
                error!(employee_id = %employee.id, error = %err, "auto payroll failed for employee");
            }
        }
    }

    info!(
        %organization_id,
        %period_start,
        %period_end,
        processed,
        skipped,
        failed,
        "auto payroll finished"
    );

    Ok(AutoPayrollReport {
        period_start,
        period_end,
        processed,
        skipped,
        failed,
        salaries: created,
    })
}

async fn payroll_one(
    db: &DatabaseConnection,
    organization_id: Uuid,
    employee: &employee::Model,
    period_start: NaiveDate,
    period_end: NaiveDate,
    settings: &PayrollSettings,
) -> ApiResult<Outcome> {
    let txn = db.begin().await?;
    let breakdown =
        calculate_for_employee(&txn, employee.id, period_start, period_end, settings, 0.0, 0.0)
            .await?;
    if breakdown.total_hours <= 0.0 || salary_exists(&txn, employee.id, period_end).await? {
        txn.rollback().await?;
        return Ok(Outcome::Skipped);
    }
    let model = salary_from_breakdown(
        organization_id,
        &breakdown,
        SalaryStatus::AutoGenerated,
        PaymentType::AutoPayroll,
    )
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(Outcome::Created(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn regular_and_overtime_are_split_per_day() {
        let settings = PayrollSettings::default();
        let result = calculate(
            Uuid::nil(),
            date(1),
            date(14),
            [8.0, 10.0, 6.5, 0.0],
            &settings,
            0.0,
            0.0,
        );
        assert_eq!(result.days_worked, 3);
        assert_eq!(result.regular_hours, 22.5);
        assert_eq!(result.overtime_hours, 2.0);
        assert_eq!(result.total_hours, 24.5);
        // 22.5 * 17.20 = 387.00; 2 * 17.20 * 1.5 = 51.60
        assert_eq!(result.regular_pay, 387.0);
        assert_eq!(result.overtime_pay, 51.6);
        assert_eq!(result.gross_pay, 438.6);
        assert_eq!(result.tax, 21.93);
        assert_eq!(result.net_pay, 416.67);
    }

    #[test]
    fn bonus_and_deduction_are_percentages_of_gross() {
        let settings = PayrollSettings {
            tax_rate: 10.0,
            ..PayrollSettings::default()
        };
        let result = calculate(Uuid::nil(), date(1), date(1), [8.0], &settings, 5.0, 2.0);
        // gross 137.60, tax 13.76, bonus 6.88, deduction 2.752
        assert_eq!(result.gross_pay, 137.6);
        assert_eq!(result.bonus, 6.88);
        assert_eq!(result.deduction, 2.75);
        assert_eq!(result.net_pay, 127.97);
    }

    #[test]
    fn stored_salary_adds_up_to_the_cent() {
        // gross 17.20, bonus 0.516, tax 0.86, deduction 0.344
        let result = calculate(
            Uuid::nil(),
            date(1),
            date(1),
            [1.0],
            &PayrollSettings::default(),
            3.0,
            2.0,
        );
        assert_eq!(result.bonus, 0.52);
        assert_eq!(result.deduction, 0.34);
        assert_eq!(result.net_pay, 16.52);

        let row = salary_from_breakdown(
            Uuid::nil(),
            &result,
            SalaryStatus::Pending,
            PaymentType::AutoCalculated,
        );
        let basic = row.basic_pay.clone().unwrap();
        let bonuses = row.bonuses.clone().unwrap();
        let deductions = row.deductions.clone().unwrap();
        assert_eq!(deductions, 1.2);
        assert_eq!(row.net_pay.clone().unwrap(), round2(basic + bonuses - deductions));
        assert_eq!(row.net_pay.clone().unwrap(), result.net_pay);
    }

    #[test]
    fn empty_period_yields_zero() {
        let result = calculate(
            Uuid::nil(),
            date(1),
            date(14),
            Vec::new(),
            &PayrollSettings::default(),
            10.0,
            0.0,
        );
        assert_eq!(result.days_worked, 0);
        assert_eq!(result.net_pay, 0.0);
    }

    #[test]
    fn default_period_is_fourteen_days_inclusive() {
        assert_eq!(period_ending(date(14), 14), date(1));
        assert_eq!(period_ending(date(14), 1), date(14));
    }

    #[test]
    fn manual_salary_figures() {
        assert_eq!(manual_figures(2500.0, 10.0, 4.0), (250.0, 100.0, 2650.0));
        assert_eq!(manual_figures(1000.0, 0.0, 0.0), (0.0, 0.0, 1000.0));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad = PayrollSettings {
            tax_rate: 140.0,
            ..PayrollSettings::default()
        };
        assert!(validate_settings(&bad).is_err());
        assert!(validate_settings(&PayrollSettings::default()).is_ok());
    }
}
