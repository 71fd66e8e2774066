use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{PaymentType, SalaryStatus};

pub const DEFAULT_HOURLY_RATE: f64 = 17.20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub basic_pay: f64,
    pub bonuses: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub currency: String,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: SalaryStatus,
    pub work_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate: f64,
    pub payment_type: PaymentType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalary {
    #[serde(alias = "employeeID")]
    pub employee_id: Uuid,
    #[serde(alias = "basicpay")]
    pub basic_pay: f64,
    #[serde(default, alias = "bonusePT")]
    pub bonus_percentage: f64,
    #[serde(default, alias = "deductionPT")]
    pub deduction_percentage: f64,
    #[serde(alias = "duedate")]
    pub due_date: NaiveDate,
    pub currency: String,
    pub status: Option<SalaryStatus>,
    pub payment_date: Option<NaiveDate>,
    pub hourly_rate: Option<f64>,
    pub work_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryUpdate {
    pub salary_id: Uuid,
    pub basic_pay: Option<f64>,
    pub bonuses: Option<f64>,
    pub deductions: Option<f64>,
    pub currency: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub status: Option<SalaryStatus>,
}

/// Organization-wide inputs of the attendance-based payroll calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSettings {
    pub hourly_rate: f64,
    pub overtime_multiplier: f64,
    /// Percent of gross pay withheld as tax.
    pub tax_rate: f64,
    pub standard_day_hours: f64,
    pub period_days: i64,
    pub currency: String,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            overtime_multiplier: 1.5,
            tax_rate: 5.0,
            standard_day_hours: 8.0,
            period_days: 14,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCalculationRequest {
    #[serde(alias = "employeeID")]
    pub employee_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, alias = "bonusePT")]
    pub bonus_percentage: f64,
    #[serde(default, alias = "deductionPT")]
    pub deduction_percentage: f64,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayrollBreakdown {
    pub employee_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub days_worked: u32,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub overtime_rate: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub gross_pay: f64,
    pub tax: f64,
    pub bonus: f64,
    pub deduction: f64,
    pub net_pay: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollCalculation {
    pub breakdown: PayrollBreakdown,
    pub salary: Option<Salary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoPayrollRequest {
    pub period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoPayrollReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
    pub salaries: Vec<Salary>,
}
