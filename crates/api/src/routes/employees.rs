use std::collections::HashMap;

use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch},
};
use chrono::Utc;
use ems_types::{
    employee::{Employee, EmployeeRef, ProfileChanges, UpdateEmployee},
    hr::Permission,
};
use entity::{department, employee};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::{Envelope, done, employee_in_org, normalize_email, ok, required, trimmed};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, EmployeePrincipal, HrPrincipal, PathParam},
    routes::departments::department_in_org,
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list))
        .route("/all-employees-ids", get(list_ids))
        .route("/update-employee", patch(update))
        .route("/delete-employee/{id}", delete(remove))
        .route("/by-HR/{id}", get(by_hr))
        .route("/by-employee", get(own_profile))
        .route("/update-profile", patch(update_own_profile))
}

async fn department_names<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
) -> ApiResult<HashMap<Uuid, String>> {
    Ok(department::Entity::find()
        .filter(department::Column::OrganizationId.eq(organization_id))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model.name))
        .collect())
}

async fn with_department<C: ConnectionTrait>(db: &C, model: employee::Model) -> ApiResult<Employee> {
    let name = match model.department_id {
        Some(id) => department::Entity::find_by_id(id).one(db).await?.map(|d| d.name),
        None => None,
    };
    Ok(views::employee(model, name))
}

async fn list(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<Employee>>> {
    let org = hr.organization_id();
    let departments = department_names(&state.db, org).await?;
    let data = employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(org))
        .order_by_asc(employee::Column::LastName)
        .order_by_asc(employee::Column::FirstName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|model| {
            let name = model.department_id.and_then(|id| departments.get(&id).cloned());
            views::employee(model, name)
        })
        .collect();
    Ok(ok("Employees fetched successfully", data))
}

async fn list_ids(State(state): State<AppState>, hr: HrPrincipal) -> ApiResult<Envelope<Vec<EmployeeRef>>> {
    let data = employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(hr.organization_id()))
        .order_by_asc(employee::Column::FirstName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::employee_ref)
        .collect();
    Ok(ok("Employee ids fetched successfully", data))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<UpdateEmployee>,
) -> ApiResult<Envelope<Employee>> {
    hr.require(Permission::EditEmployee)?;
    let org = hr.organization_id();
    let existing = employee_in_org(&state.db, org, body.employee_id).await?;
    let changes = body.updated_employee;
    let mut active: employee::ActiveModel = existing.clone().into();

    if let Some(email) = changes.email {
        let email = normalize_email(&email)?;
        if email != existing.email {
            let taken = employee::Entity::find()
                .filter(employee::Column::Email.eq(email.clone()))
                .one(&state.db)
                .await?
                .is_some();
            if taken {
                return Err(ApiError::conflict("Email is already in use"));
            }
        }
        active.email = Set(email);
    }
    if let Some(code) = changes.employee_code {
        let code = trimmed(Some(code));
        if code.is_some() && code != existing.employee_code {
            let taken = employee::Entity::find()
                .filter(employee::Column::EmployeeCode.eq(code.clone()))
                .one(&state.db)
                .await?
                .is_some();
            if taken {
                return Err(ApiError::conflict("Employee code is already in use"));
            }
        }
        active.employee_code = Set(code);
    }
    if let Some(department_id) = changes.department_id {
        department_in_org(&state.db, org, department_id).await?;
        active.department_id = Set(Some(department_id));
    }
    if let Some(manager_id) = changes.manager_id {
        if manager_id == existing.id {
            return Err(ApiError::bad_request("An employee cannot manage themselves"));
        }
        employee_in_org(&state.db, org, manager_id).await?;
        active.manager_id = Set(Some(manager_id));
    }
    if let Some(value) = changes.first_name {
        active.first_name = Set(required(&value, "firstName")?);
    }
    if let Some(value) = changes.last_name {
        active.last_name = Set(required(&value, "lastName")?);
    }
    if let Some(value) = changes.contact_number {
        active.contact_number = Set(required(&value, "contactNumber")?);
    }
    if let Some(value) = changes.position {
        active.position = Set(trimmed(Some(value)));
    }
    if let Some(value) = changes.date_of_birth {
        active.date_of_birth = Set(Some(value));
    }
    if let Some(value) = changes.gender {
        active.gender = Set(Some(value));
    }
    if let Some(value) = changes.address {
        active.address = Set(trimmed(Some(value)));
    }
    if let Some(value) = changes.joining_date {
        active.joining_date = Set(Some(value));
    }
    if let Some(value) = changes.employment_type {
        active.employment_type = Set(value);
    }
    if let Some(value) = changes.work_location {
        active.work_location = Set(trimmed(Some(value)));
    }
    if let Some(value) = changes.status {
        active.status = Set(value);
    }
    if let Some(contact) = changes.emergency_contact {
        active.emergency_name = Set(trimmed(Some(contact.name)));
        active.emergency_relationship = Set(trimmed(Some(contact.relationship)));
        active.emergency_phone = Set(trimmed(Some(contact.phone)));
    }
    if let Some(skills) = changes.skills {
        active.skills = Set(employee::encode_skills(&skills));
    }
    if let Some(education) = changes.education {
        active.education = Set(employee::encode_education(&education));
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    info!(employee_id = %model.id, hr_id = %hr.id(), "employee updated");
    Ok(ok(
        "Employee updated successfully",
        with_department(&state.db, model).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::DeleteEmployee)?;
    let model = employee_in_org(&state.db, hr.organization_id(), id).await?;
    employee::Entity::delete_by_id(model.id).exec(&state.db).await?;
    info!(employee_id = %id, hr_id = %hr.id(), "employee deleted");
    Ok(done("Employee deleted successfully"))
}

async fn by_hr(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<Employee>> {
    let model = employee_in_org(&state.db, hr.organization_id(), id).await?;
    Ok(ok(
        "Employee fetched successfully",
        with_department(&state.db, model).await?,
    ))
}

async fn own_profile(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
) -> ApiResult<Envelope<Employee>> {
    Ok(ok(
        "Profile fetched successfully",
        with_department(&state.db, principal.employee).await?,
    ))
}

async fn update_own_profile(
    State(state): State<AppState>,
    principal: EmployeePrincipal,
    Body(changes): Body<ProfileChanges>,
) -> ApiResult<Envelope<Employee>> {
    let mut active: employee::ActiveModel = principal.employee.into();
    if let Some(value) = changes.first_name {
        active.first_name = Set(required(&value, "firstName")?);
    }
    if let Some(value) = changes.last_name {
        active.last_name = Set(required(&value, "lastName")?);
    }
    if let Some(value) = changes.contact_number {
        active.contact_number = Set(required(&value, "contactNumber")?);
    }
    if let Some(value) = changes.date_of_birth {
        active.date_of_birth = Set(Some(value));
    }
    if let Some(value) = changes.gender {
        active.gender = Set(Some(value));
    }
    if let Some(value) = changes.address {
        active.address = Set(trimmed(Some(value)));
    }
    if let Some(contact) = changes.emergency_contact {
        active.emergency_name = Set(trimmed(Some(contact.name)));
        active.emergency_relationship = Set(trimmed(Some(contact.relationship)));
        active.emergency_phone = Set(trimmed(Some(contact.phone)));
    }
    if let Some(skills) = changes.skills {
        active.skills = Set(employee::encode_skills(&skills));
    }
    if let Some(education) = changes.education {
        active.education = Set(employee::encode_education(&education));
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok(
        "Profile updated successfully",
        with_department(&state.db, model).await?,
    ))
}
