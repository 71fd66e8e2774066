use axum::{
    Router,
    extract::State,
    routing::{get, put},
};
use chrono::Utc;
use ems_types::organization::{OrganizationInfo, OrganizationUpdate};
use entity::organization;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, QueryFilter,
};
use tracing::info;

use super::{Envelope, normalize_email, ok, required};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Body, HrPrincipal},
    state::AppState,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(details))
        .route("/update", put(update))
}

async fn current(state: &AppState, hr: &HrPrincipal) -> ApiResult<organization::Model> {
    organization::Entity::find_by_id(hr.organization_id())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Organization not found"))
}

async fn details(
    State(state): State<AppState>,
    hr: HrPrincipal,
) -> ApiResult<Envelope<OrganizationInfo>> {
    let model = current(&state, &hr).await?;
    Ok(ok("Organization fetched successfully", views::organization(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<OrganizationUpdate>,
) -> ApiResult<Envelope<OrganizationInfo>> {
    hr.require_admin()?;
    let existing = current(&state, &hr).await?;

    let name = body.name.as_deref().map(|name| required(name, "name")).transpose()?;
    let url = body
        .organization_url
        .as_deref()
        .map(|url| required(url, "OrganizationURL"))
        .transpose()?;
    let mail = body.organization_mail.as_deref().map(normalize_email).transpose()?;

    // Names, URLs and mails stay unique across organizations.
    let mut unique = Condition::any();
    if let Some(name) = &name {
        unique = unique.add(organization::Column::Name.eq(name.clone()));
    }
    if let Some(url) = &url {
        unique = unique.add(organization::Column::Url.eq(url.clone()));
    }
    if let Some(mail) = &mail {
        unique = unique.add(organization::Column::Mail.eq(mail.clone()));
    }
    if !unique.is_empty() {
        let clash = organization::Entity::find()
            .filter(organization::Column::Id.ne(existing.id))
            .filter(unique)
            .one(&state.db)
            .await?;
        if let Some(other) = clash {
            let field = if name.as_deref() == Some(other.name.as_str()) {
                "name"
            } else if url.as_deref() == Some(other.url.as_str()) {
                "OrganizationURL"
            } else {
                "OrganizationMail"
            };
            return Err(ApiError::conflict(format!("{field} already exists")));
        }
    }

    let mut active: organization::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = body.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(url) = url {
        active.url = Set(url);
    }
    if let Some(mail) = mail {
        active.mail = Set(mail);
    }
    if let Some(policies) = body.policies {
        active.policies = Set(policies.trim().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    info!(organization_id = %model.id, hr_id = %hr.id(), "organization updated");
    Ok(ok("Organization updated successfully", views::organization(model)))
}
