use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Assignee, GoalKind, ItineraryItem, MessageKind, Person, Priority, RequestItem, RequestKind,
    RequestStatus, TaskStatus, VisionCategory,
};

// -- PIN gate --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProfileRequest {
    pub display_name: Person,
    pub pin: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub display_name: Person,
    pub pin: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub sender: Person,
    pub content: String,
    #[serde(rename = "type", default = "default_message_kind")]
    pub kind: MessageKind,
    /// Ask the harmony rewrite to soften the text before storing it.
    #[serde(default)]
    pub soften: bool,
}

fn default_message_kind() -> MessageKind {
    MessageKind::Text
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetReactionRequest {
    pub person: Person,
    /// `None` clears this person's reaction.
    pub emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkReadRequest {
    pub reader: Person,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub marked: usize,
}

// -- Tasks & comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Assignee,
    pub created_by: Person,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetTaskStatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub author: Person,
    pub content: String,
}

// -- Requests --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRequestRequest {
    pub from_user: Person,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub details: String,
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetRequestStatusRequest {
    pub status: RequestStatus,
}

// -- Memories --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMemoryRequest {
    pub title: String,
    pub date: NaiveDate,
    pub photos: Vec<String>,
    pub description: Option<String>,
}

// -- Itinerary --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateItineraryRequest {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

// -- Finances --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFinanceRequest {
    pub title: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(rename = "type")]
    pub kind: GoalKind,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetAmountRequest {
    pub current_amount: f64,
}

// -- Life visions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateVisionRequest {
    pub category: VisionCategory,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetDoneRequest {
    pub done: bool,
}

// -- Profiles --

/// Partial update; absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub current_mood: Option<String>,
    pub theme_color: Option<String>,
    pub avatar_url: Option<String>,
}

// -- Uploads --

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

// -- Dashboard summary --

#[derive(Debug, Serialize, Deserialize)]
pub struct Summary {
    pub pending_tasks: u64,
    pub next_event: Option<ItineraryItem>,
    pub total_saved: f64,
    pub pending_requests: Vec<RequestItem>,
    pub moods: BTreeMap<Person, String>,
}

// -- Errors --

/// Machine-readable failure kinds, stable across the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// A required table does not exist; the client shows its setup screen.
    SchemaMissing,
    /// Single-row lookup found nothing. For profile probes this means
    /// "new user", not a failure.
    NotFound,
    /// A uniqueness rule was violated (PIN taken, profile exists).
    Conflict,
    /// The request itself is malformed.
    Invalid,
    Internal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
}
