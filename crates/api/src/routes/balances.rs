use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::{NaiveDate, Utc};
use ems_types::{
    balance::{Balance, BalanceUpdate, NewBalance},
    hr::Permission,
};
use entity::balance;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Created, Envelope, created, done, ok, required};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal, PathParam},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list))
        .route("/create-balance", post(create))
        .route("/update-balance", patch(update))
        .route("/delete-balance/{id}", delete(remove))
        .route("/{id}", get(fetch))
}

async fn balance_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<balance::Model> {
    balance::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Balance not found"))
}

/// Normalized `YYYY-MM`.
fn expense_month(value: &str) -> ApiResult<String> {
    let value = value.trim();
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|first| first.format("%Y-%m").to_string())
        .map_err(|_| ApiError::bad_request("expenseMonth must look like YYYY-MM"))
}

fn money(value: f64, field: &str) -> ApiResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::bad_request(format!("{field} must be a non-negative amount")));
    }
    Ok((value * 100.0).round() / 100.0)
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Balance>>> {
    hr.require(Permission::ViewSalary)?;
    let data = balance::Entity::find()
        .filter(balance::Column::OrganizationId.eq(hr.organization_id()))
        .order_by_desc(balance::Column::ExpenseMonth)
        .order_by_desc(balance::Column::SubmitDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::balance)
        .collect();
    Ok(ok("Balances fetched successfully", data))
}

async fn fetch(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Balance>> {
    hr.require(Permission::ViewSalary)?;
    let model = balance_in_org(&state.db, hr.organization_id(), id).await?;
    Ok(ok("Balance fetched successfully", views::balance(model)))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewBalance>,
) -> ApiResult<Created<Balance>> {
    hr.require(Permission::ManageSalary)?;
    let now = Utc::now();
    let model = balance::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        title: Set(required(&body.title, "title")?),
        description: Set(body.description.trim().to_string()),
        available_amount: Set(money(body.available_amount, "availableAmount")?),
        total_expenses: Set(money(body.total_expenses, "totalExpenses")?),
        expense_month: Set(expense_month(&body.expense_month)?),
        submit_date: Set(body.submit_date),
        created_by: Set(hr.id()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(balance_id = %model.id, month = %model.expense_month, "balance recorded");
    Ok(created("Balance created successfully", views::balance(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<BalanceUpdate>,
) -> ApiResult<Envelope<Balance>> {
    hr.require(Permission::ManageSalary)?;
    let existing = balance_in_org(&state.db, hr.organization_id(), body.balance_id).await?;
    let mut active: balance::ActiveModel = existing.into();
    if let Some(title) = body.title {
        active.title = Set(required(&title, "title")?);
    }
    if let Some(description) = body.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(amount) = body.available_amount {
        active.available_amount = Set(money(amount, "availableAmount")?);
    }
    if let Some(amount) = body.total_expenses {
        active.total_expenses = Set(money(amount, "totalExpenses")?);
    }
    if let Some(month) = body.expense_month {
        active.expense_month = Set(expense_month(&month)?);
    }
    if let Some(date) = body.submit_date {
        active.submit_date = Set(date);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok("Balance updated successfully", views::balance(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageSalary)?;
    let model = balance_in_org(&state.db, hr.organization_id(), id).await?;
    balance::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(balance_id = %id, "balance deleted");
    Ok(done("Balance deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_month_is_normalized() {
        assert_eq!(expense_month(" 2026-3 ").unwrap(), "2026-03");
        assert_eq!(expense_month("2026-10").unwrap(), "2026-10");
        for bad in ["2026-13", "October", "", "2026-10-01"] {
            assert!(expense_month(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn amounts_must_be_non_negative() {
        assert_eq!(money(12.346, "x").unwrap(), 12.35);
        assert!(money(-1.0, "x").is_err());
        assert!(money(f64::NAN, "x").is_err());
    }
}
