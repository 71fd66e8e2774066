//! Notifications socket. A connection joins its organization room and its
//! own user room and receives every event published to either.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use ems_types::notification::{DASHBOARD_REFRESH, HR_DASHBOARD_REFRESH, NotificationEvent};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    extract::AnyPrincipal,
    notify::{NotificationHub, Room},
    state::AppState,
};

pub async fn upgrade(
    State(state): State<AppState>,
    principal: AnyPrincipal,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| serve(socket, state.hub, principal))
}

async fn serve(socket: WebSocket, hub: NotificationHub, principal: AnyPrincipal) {
    let rooms = vec![
        Room::Organization(principal.organization_id()),
        Room::User(principal.id()),
    ];
    let mut subscription = hub.subscribe(rooms);
    info!(user_id = %principal.id(), portal = %principal.portal(), "notification socket opened");

    let (mut sink, mut stream) = socket.split();
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "unserializable notification dropped");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let user_id = principal.id();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => handle_frame(&hub, &principal, text.as_str()),
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    info!(%user_id, "notification socket closed");
}

fn handle_frame(hub: &NotificationHub, principal: &AnyPrincipal, text: &str) {
    let frame = match serde_json::from_str::<NotificationEvent>(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "malformed client frame");
            return;
        }
    };
    match (frame.event.as_str(), principal) {
        (HR_DASHBOARD_REFRESH, AnyPrincipal::Hr(hr)) => {
            hub.to_org(hr.organization_id(), DASHBOARD_REFRESH, frame.data);
        }
        (HR_DASHBOARD_REFRESH, AnyPrincipal::Employee(_)) => {
            warn!(user_id = %principal.id(), "dashboard refresh from employee ignored");
        }
        (other, _) => debug!(event = other, "client event ignored"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ems_types::{Portal, auth::TokenClaims, notification::LEAVE_UPDATED};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use serde_json::json;

    use super::*;
    use crate::{
        extract::{EmployeePrincipal, HrPrincipal},
        seed::{SeededRecords, seed_demo},
    };

    async fn seeded() -> SeededRecords {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        seed_demo(&db, Utc::now().date_naive()).await.unwrap()
    }

    fn claims(sub: uuid::Uuid, portal: Portal, org: uuid::Uuid) -> TokenClaims {
        TokenClaims {
            sub,
            portal,
            role: portal.as_str().to_string(),
            org,
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[tokio::test]
    async fn hr_refresh_frame_is_relayed_to_the_organization() {
        let records = seeded().await;
        let profile = records.hr_profiles[0].clone();
        let org = profile.organization_id;
        let hr = AnyPrincipal::Hr(HrPrincipal {
            claims: claims(profile.id, Portal::Hr, org),
            profile,
        });
        let hub = NotificationHub::new();
        let mut org_room = hub.subscribe(vec![Room::Organization(org)]);

        handle_frame(&hub, &hr, r#"{"event":"hr:dashboard:refresh","data":{"from":"hr"}}"#);

        let event = org_room.next().await.unwrap();
        assert_eq!(event.event, DASHBOARD_REFRESH);
        assert_eq!(event.data["from"], "hr");
    }

    #[tokio::test]
    async fn employee_refresh_frame_and_garbage_are_dropped() {
        let records = seeded().await;
        let member = records.employees[0].clone();
        let org = member.organization_id;
        let employee = AnyPrincipal::Employee(EmployeePrincipal {
            claims: claims(member.id, Portal::Employee, org),
            employee: member,
        });
        let hub = NotificationHub::new();
        let mut org_room = hub.subscribe(vec![Room::Organization(org)]);

        handle_frame(&hub, &employee, r#"{"event":"hr:dashboard:refresh","data":{}}"#);
        handle_frame(&hub, &employee, "not json");
        // A later event must be the first thing the room sees.
        hub.to_org(org, LEAVE_UPDATED, json!({ "marker": true }));

        let event = org_room.next().await.unwrap();
        assert_eq!(event.event, LEAVE_UPDATED);
        assert_eq!(event.data["marker"], true);
    }
}
