//! Fan-out of real-time events to websocket connections.

use std::fmt;

use ems_types::notification::NotificationEvent;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Room {
    Organization(Uuid),
    User(Uuid),
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::Organization(id) => write!(f, "org:{id}"),
            Room::User(id) => write!(f, "user:{id}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Delivery {
    pub room: Room,
    pub event: NotificationEvent,
}

#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Delivery>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Returns the number of live subscribers that saw the event.
    pub fn publish(&self, room: Room, event: NotificationEvent) -> usize {
        // no subscribers is not an error
        self.sender.send(Delivery { room, event }).unwrap_or(0)
    }

    pub fn to_org(&self, organization_id: Uuid, event: &str, data: Value) -> usize {
        self.publish(
            Room::Organization(organization_id),
            NotificationEvent::new(event, data),
        )
    }

    pub fn to_user(&self, user_id: Uuid, event: &str, data: Value) -> usize {
        self.publish(Room::User(user_id), NotificationEvent::new(event, data))
    }

    pub fn subscribe(&self, rooms: Vec<Room>) -> Subscription {
        Subscription {
            rooms,
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct Subscription {
    rooms: Vec<Room>,
    receiver: broadcast::Receiver<Delivery>,
}

impl Subscription {
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Next event for one of the joined rooms; `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<NotificationEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(delivery) if self.rooms.contains(&delivery.room) => return Some(delivery.event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_types::notification::{DASHBOARD_REFRESH, LEAVE_UPDATED};
    use serde_json::json;

    #[test]
    fn room_names() {
        let id = Uuid::nil();
        assert_eq!(
            Room::Organization(id).to_string(),
            "org:00000000-0000-0000-0000-000000000000"
        );
        assert!(Room::User(id).to_string().starts_with("user:"));
    }

    #[tokio::test]
    async fn subscribers_only_see_their_rooms() {
        let hub = NotificationHub::new();
        let org = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut sub = hub.subscribe(vec![Room::Organization(org), Room::User(user)]);

        hub.to_org(other_org, DASHBOARD_REFRESH, json!({}));
        hub.to_user(user, LEAVE_UPDATED, json!({"status": "Approved"}));
        hub.to_org(org, DASHBOARD_REFRESH, json!({}));

        let first = sub.next().await.unwrap();
        assert_eq!(first.event, LEAVE_UPDATED);
        assert_eq!(first.data["status"], "Approved");
        let second = sub.next().await.unwrap();
        assert_eq!(second.event, DASHBOARD_REFRESH);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let hub = NotificationHub::new();
        assert_eq!(hub.to_org(Uuid::new_v4(), DASHBOARD_REFRESH, json!({})), 0);
    }
}
