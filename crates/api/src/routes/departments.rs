use std::collections::HashMap;

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::department::{Department, DepartmentUpdate, NewDepartment};
use entity::{department, employee};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
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
        .route("/create-department", post(create))
        .route("/update-department", patch(update))
        .route("/delete-department/{id}", delete(remove))
}

pub(crate) async fn department_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    department_id: Uuid,
) -> ApiResult<department::Model> {
    department::Entity::find_by_id(department_id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Department not found"))
}

async fn name_taken<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    name: &str,
    except: Option<Uuid>,
) -> ApiResult<bool> {
    let mut query = department::Entity::find()
        .filter(department::Column::OrganizationId.eq(organization_id))
        .filter(department::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(department::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Department>>> {
    let org = hr.organization_id();
    let departments = department::Entity::find()
        .filter(department::Column::OrganizationId.eq(org))
        .order_by_asc(department::Column::Name)
        .all(&state.db)
        .await?;
    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for member in employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(org))
        .all(&state.db)
        .await?
    {
        if let Some(department_id) = member.department_id {
            *counts.entry(department_id).or_default() += 1;
        }
    }
    let data = departments
        .into_iter()
        .map(|model| {
            let count = counts.get(&model.id).copied().unwrap_or(0);
            views::department(model, count)
        })
        .collect();
    Ok(ok("Departments fetched successfully", data))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewDepartment>,
) -> ApiResult<Created<Department>> {
    let name = required(&body.name, "name")?;
    if name_taken(&state.db, hr.organization_id(), &name, None).await? {
        return Err(ApiError::conflict("Department already exists"));
    }
    let now = Utc::now();
    let model = department::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        name: Set(name),
        description: Set(body.description.trim().to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    info!(department_id = %model.id, "department created");
    Ok(created("Department created successfully", views::department(model, 0)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<DepartmentUpdate>,
) -> ApiResult<Envelope<Department>> {
    let org = hr.organization_id();
    let existing = department_in_org(&state.db, org, body.department_id).await?;
    let mut active: department::ActiveModel = existing.into();
    if let Some(name) = body.name {
        let name = required(&name, "name")?;
        if name_taken(&state.db, org, &name, Some(body.department_id)).await? {
            return Err(ApiError::conflict("Department already exists"));
        }
        active.name = Set(name);
    }
    if let Some(description) = body.description {
        active.description = Set(description.trim().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    let count = employee::Entity::find()
        .filter(employee::Column::DepartmentId.eq(model.id))
        .all(&state.db)
        .await?
        .len() as u64;
    Ok(ok("Department updated successfully", views::department(model, count)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    let model = department_in_org(&state.db, hr.organization_id(), id).await?;
    let txn = state.db.begin().await?;
    employee::Entity::update_many()
        .col_expr(employee::Column::DepartmentId, Expr::value(Option::<Uuid>::None))
        .filter(employee::Column::DepartmentId.eq(model.id))
        .exec(&txn)
        .await?;
    department::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;
    info!(department_id = %id, "department deleted");
    Ok(done("Department deleted successfully"))
}
