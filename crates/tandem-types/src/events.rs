use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    FinanceItem, ItineraryItem, LifeVisionItem, Memory, Message, Person, Profile, RequestItem,
    Task, TaskComment, UnknownVariant,
};

/// One confirmed mutation of a single row, as rebroadcast on the feed.
/// This is the authoritative shape clients reconcile against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "record")]
pub enum Change<T> {
    Inserted(T),
    Updated(T),
    Deleted { id: Uuid },
}

impl<T> Change<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Change<U> {
        match self {
            Change::Inserted(r) => Change::Inserted(f(r)),
            Change::Updated(r) => Change::Updated(f(r)),
            Change::Deleted { id } => Change::Deleted { id },
        }
    }
}

/// The record collections a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Messages,
    Tasks,
    TaskComments,
    Requests,
    Memories,
    Itineraries,
    Finances,
    Visions,
}

impl Collection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Messages => "messages",
            Collection::Tasks => "tasks",
            Collection::TaskComments => "task_comments",
            Collection::Requests => "requests",
            Collection::Memories => "memories",
            Collection::Itineraries => "itineraries",
            Collection::Finances => "finances",
            Collection::Visions => "life_visions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profiles" => Ok(Collection::Profiles),
            "messages" => Ok(Collection::Messages),
            "tasks" => Ok(Collection::Tasks),
            "task_comments" => Ok(Collection::TaskComments),
            "requests" => Ok(Collection::Requests),
            "memories" => Ok(Collection::Memories),
            "itineraries" => Ok(Collection::Itineraries),
            "finances" => Ok(Collection::Finances),
            "life_visions" => Ok(Collection::Visions),
            other => Err(UnknownVariant {
                type_name: "Collection",
                value: other.to_string(),
            }),
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Events sent from the gateway to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedEvent {
    /// Identify accepted; the connection is live.
    Ready { profile_id: Uuid, display_name: Person },

    /// The partner connected or disconnected.
    Presence { person: Person, online: bool },

    Profile(Change<Profile>),
    Message(Change<Message>),
    Task(Change<Task>),
    TaskComment(Change<TaskComment>),
    Request(Change<RequestItem>),
    Memory(Change<Memory>),
    Itinerary(Change<ItineraryItem>),
    Finance(Change<FinanceItem>),
    Vision(Change<LifeVisionItem>),
}

impl FeedEvent {
    /// The collection this event is scoped to. `None` means global:
    /// delivered to every connection regardless of subscriptions.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            FeedEvent::Ready { .. } | FeedEvent::Presence { .. } => None,
            FeedEvent::Profile(_) => Some(Collection::Profiles),
            FeedEvent::Message(_) => Some(Collection::Messages),
            FeedEvent::Task(_) => Some(Collection::Tasks),
            FeedEvent::TaskComment(_) => Some(Collection::TaskComments),
            FeedEvent::Request(_) => Some(Collection::Requests),
            FeedEvent::Memory(_) => Some(Collection::Memories),
            FeedEvent::Itinerary(_) => Some(Collection::Itineraries),
            FeedEvent::Finance(_) => Some(Collection::Finances),
            FeedEvent::Vision(_) => Some(Collection::Visions),
        }
    }

    /// For comment events, the parent task id — the equality predicate a
    /// connection's comment watch filters on. Comment rows are never
    /// deleted individually (only via task cascade), so every comment
    /// event carries its record and therefore its task id.
    pub fn comment_task_id(&self) -> Option<Uuid> {
        match self {
            FeedEvent::TaskComment(Change::Inserted(c))
            | FeedEvent::TaskComment(Change::Updated(c)) => Some(c.task_id),
            _ => None,
        }
    }
}

/// Commands sent from a client to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Must be the first frame on a new connection.
    Identify { profile_id: Uuid },

    /// Replace the set of collections this connection receives events for.
    Subscribe { collections: Vec<Collection> },

    /// Also receive comment events for one task (an open detail view).
    WatchComments { task_id: Uuid },

    /// Stop receiving comment events for that task.
    UnwatchComments { task_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_event_wire_shape() {
        let ev: Change<u32> = Change::Deleted { id: Uuid::nil() };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["op"], "Deleted");
        assert_eq!(json["record"]["id"], Uuid::nil().to_string());
    }

    #[test]
    fn ready_and_presence_are_global() {
        let ev = FeedEvent::Presence {
            person: Person::Lala,
            online: true,
        };
        assert_eq!(ev.collection(), None);
    }
}
