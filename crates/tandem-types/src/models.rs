use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A string that is not one of the closed set of values a text-backed enum
/// accepts. Owner fields in the store must always be one of the two known
/// names (or "Both" for assignment); anything else is rejected at the edge.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {type_name} value: {value:?}")]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub value: String,
}

/// Closed text-backed enums, stored in SQLite as their exact text form and
/// serialized the same way on the wire.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        type_name: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

text_enum! {
    /// The two people this whole system exists for.
    Person {
        Lulu => "Lulu",
        Lala => "Lala",
    }
}

impl Person {
    /// The other one.
    pub const fn partner(&self) -> Person {
        match self {
            Person::Lulu => Person::Lala,
            Person::Lala => Person::Lulu,
        }
    }

    /// Theme color assigned when a profile is first created.
    pub const fn default_theme(&self) -> &'static str {
        match self {
            Person::Lulu => "#f43f5e",
            Person::Lala => "#4f46e5",
        }
    }
}

text_enum! {
    /// Who a task is for. "Both" is a real value, not a missing one.
    Assignee {
        Lulu => "Lulu",
        Lala => "Lala",
        Both => "Both",
    }
}

impl Assignee {
    pub const fn includes(&self, person: Person) -> bool {
        match (self, person) {
            (Assignee::Both, _) => true,
            (Assignee::Lulu, Person::Lulu) => true,
            (Assignee::Lala, Person::Lala) => true,
            _ => false,
        }
    }
}

impl From<Person> for Assignee {
    fn from(p: Person) -> Self {
        match p {
            Person::Lulu => Assignee::Lulu,
            Person::Lala => Assignee::Lala,
        }
    }
}

text_enum! {
    MessageKind {
        Text => "text",
        Image => "image",
        Audio => "audio",
    }
}

text_enum! {
    TaskStatus {
        Pending => "pending",
        Completed => "completed",
    }
}

impl TaskStatus {
    pub const fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

text_enum! {
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

text_enum! {
    RequestKind {
        Date => "date",
        Gift => "gift",
        Attention => "attention",
        Chore => "chore",
    }
}

text_enum! {
    RequestStatus {
        Pending => "pending",
        Accepted => "accepted",
        Completed => "completed",
    }
}

text_enum! {
    GoalKind {
        Saving => "saving",
        Expense => "expense",
    }
}

text_enum! {
    VisionCategory {
        Career => "Career",
        Living => "Living",
        Health => "Health",
        Dreams => "Dreams",
    }
}

// -- Records --

/// One of the two profile rows. The PIN is a plaintext convenience gate,
/// not a credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Person,
    pub pin: String,
    pub theme_color: Option<String>,
    pub current_mood: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A chat message. For image/audio messages `content` is the media URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Person,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub harmony_softened: bool,
    /// Per-person emoji, e.g. Lulu -> "❤️". At most one reaction each.
    #[serde(default)]
    pub reactions: BTreeMap<Person, String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Assignee,
    pub created_by: Person,
    pub status: TaskStatus,
    pub priority: Priority,
    pub is_shared: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author: Person,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestItem {
    pub id: Uuid,
    pub from_user: Person,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub details: String,
    pub status: RequestStatus,
    pub target_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceItem {
    pub id: Uuid,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub created_at: DateTime<Utc>,
}

/// `done` is a real column. Earlier data encoded completion as a text
/// prefix on `content`; the migration rewrites those rows once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeVisionItem {
    pub id: Uuid,
    pub category: VisionCategory,
    pub content: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}
