use axum::{
    Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use ems_types::{
    calendar::{CalendarEvent, CalendarEventUpdate, NewCalendarEvent},
    hr::Permission,
};
use entity::calendar_event;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::{Created, Envelope, created, done, ok, required, trimmed};
use crate::{
    error::{ApiError, ApiResult},
    extract::{AnyPrincipal, Body, HrPrincipal, PathParam},
    state::AppState,
    views,
};

const DEFAULT_AUDIENCE: &str = "All";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list))
        .route("/create-event", post(create))
        .route("/update-event", patch(update))
        .route("/delete-event/{id}", delete(remove))
}

async fn event_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    id: Uuid,
) -> ApiResult<calendar_event::Model> {
    calendar_event::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Event not found"))
}

async fn list(
    State(state): State<AppState>,
    principal: AnyPrincipal,
) -> ApiResult<Envelope<Vec<CalendarEvent>>> {
    let data = calendar_event::Entity::find()
        .filter(calendar_event::Column::OrganizationId.eq(principal.organization_id()))
        .order_by_asc(calendar_event::Column::EventDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(views::calendar_event)
        .collect();
    Ok(ok("Events fetched successfully", data))
}

async fn create(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<NewCalendarEvent>,
) -> ApiResult<Created<CalendarEvent>> {
    hr.require(Permission::ManageCalendar)?;
    let now = Utc::now();
    let model = calendar_event::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(hr.organization_id()),
        title: Set(required(&body.title, "title")?),
        description: Set(body.description.trim().to_string()),
        event_date: Set(body.event_date),
        audience: Set(trimmed(body.audience).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.db)
    .await?;
    Ok(created("Event created successfully", views::calendar_event(model)))
}

async fn update(
    State(state): State<AppState>,
    hr: HrPrincipal,
    Body(body): Body<CalendarEventUpdate>,
) -> ApiResult<Envelope<CalendarEvent>> {
    hr.require(Permission::ManageCalendar)?;
    let existing = event_in_org(&state.db, hr.organization_id(), body.event_id).await?;
    let mut active: calendar_event::ActiveModel = existing.into();
    if let Some(title) = body.title {
        active.title = Set(required(&title, "title")?);
    }
    if let Some(description) = body.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(date) = body.event_date {
        active.event_date = Set(date);
    }
    if let Some(audience) = body.audience {
        active.audience = Set(trimmed(Some(audience)).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()));
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.db).await?;
    Ok(ok("Event updated successfully", views::calendar_event(model)))
}

async fn remove(
    State(state): State<AppState>,
    hr: HrPrincipal,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Envelope<()>> {
    hr.require(Permission::ManageCalendar)?;
    let model = event_in_org(&state.db, hr.organization_id(), id).await?;
    calendar_event::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    Ok(done("Event deleted successfully"))
}
