use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monthly expense account of an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub available_amount: f64,
    pub total_expenses: f64,
    /// `YYYY-MM`.
    pub expense_month: String,
    pub submit_date: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBalance {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "availableamount")]
    pub available_amount: f64,
    #[serde(default, alias = "totalexpenses")]
    pub total_expenses: f64,
    #[serde(alias = "expensemonth")]
    pub expense_month: String,
    #[serde(alias = "submitdate")]
    pub submit_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    pub balance_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub available_amount: Option<f64>,
    pub total_expenses: Option<f64>,
    pub expense_month: Option<String>,
    pub submit_date: Option<NaiveDate>,
}
