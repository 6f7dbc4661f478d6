use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::Database;
use tandem_types::models::{
    FinanceItem, ItineraryItem, LifeVisionItem, Memory, Message, Person, Profile, RequestItem,
    RequestStatus, Task, TaskComment, TaskStatus,
};

impl Database {
    // -- Profiles --

    pub fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO profiles (id, display_name, pin, theme_color, current_mood, avatar_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    profile.id.to_string(),
                    profile.display_name.as_str(),
                    profile.pin,
                    profile.theme_color,
                    profile.current_mood,
                    profile.avatar_url,
                    profile.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_profile_by_name(&self, name: Person) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} WHERE display_name = ?1"))?;
            stmt.query_row([name.as_str()], map_profile).optional()
        })
    }

    pub fn get_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} WHERE id = ?1"))?;
            stmt.query_row([id.to_string()], map_profile).optional()
        })
    }

    pub fn pin_in_use(&self, pin: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let count: u64 =
                conn.query_row("SELECT COUNT(*) FROM profiles WHERE pin = ?1", [pin], |row| {
                    row.get(0)
                })?;
            Ok(count > 0)
        })
    }

    pub fn all_profiles(&self) -> Result<Vec<Profile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} ORDER BY display_name"))?;
            collect(stmt.query_map([], map_profile)?)
        })
    }

    /// Deletes only the profile row. Everything the person ever wrote
    /// references them by name, so their content survives a reset.
    pub fn delete_profile(&self, name: Person) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM profiles WHERE display_name = ?1",
                [name.as_str()],
            )?;
            Ok(n > 0)
        })
    }

    /// Partial update; `None` fields are left untouched. Returns the row
    /// as stored afterwards.
    pub fn update_profile(
        &self,
        name: Person,
        mood: Option<&str>,
        theme_color: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE profiles SET
                    current_mood = COALESCE(?1, current_mood),
                    theme_color  = COALESCE(?2, theme_color),
                    avatar_url   = COALESCE(?3, avatar_url)
                 WHERE display_name = ?4",
                rusqlite::params![mood, theme_color, avatar_url, name.as_str()],
            )?;
            let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} WHERE display_name = ?1"))?;
            stmt.query_row([name.as_str()], map_profile).optional()
        })
    }

    // -- Messages --

    pub fn insert_message(&self, msg: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, sender, content, type, harmony_softened, reactions, read_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    msg.id.to_string(),
                    msg.sender.as_str(),
                    msg.content,
                    msg.kind.as_str(),
                    msg.harmony_softened,
                    serde_json::to_string(&msg.reactions)?,
                    msg.read_at.map(|t| t.to_rfc3339()),
                    msg.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Newest `limit` messages, newest first. `before` is a created_at
    /// cursor for fetching older pages.
    pub fn get_messages(&self, limit: u32, before: Option<&str>) -> Result<Vec<Message>> {
        self.with_conn(|conn| match before {
            Some(cursor) => {
                let mut stmt = conn.prepare(&format!(
                    "{MESSAGE_SELECT} WHERE created_at < ?1 ORDER BY created_at DESC LIMIT ?2"
                ))?;
                collect(stmt.query_map(rusqlite::params![cursor, limit], map_message)?)
            }
            None => {
                let mut stmt =
                    conn.prepare(&format!("{MESSAGE_SELECT} ORDER BY created_at DESC LIMIT ?1"))?;
                collect(stmt.query_map([limit], map_message)?)
            }
        })
    }

    /// Set or clear one person's emoji on a message. Returns the updated
    /// row, or None if the message is gone.
    pub fn set_reaction(
        &self,
        id: Uuid,
        person: Person,
        emoji: Option<&str>,
    ) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{MESSAGE_SELECT} WHERE id = ?1"))?;
            let Some(mut msg) = stmt.query_row([id.to_string()], map_message).optional()? else {
                return Ok(None);
            };

            match emoji {
                Some(e) => {
                    msg.reactions.insert(person, e.to_string());
                }
                None => {
                    msg.reactions.remove(&person);
                }
            }

            conn.execute(
                "UPDATE messages SET reactions = ?1 WHERE id = ?2",
                rusqlite::params![serde_json::to_string(&msg.reactions)?, id.to_string()],
            )?;
            Ok(Some(msg))
        })
    }

    /// Stamp read_at on the partner's unread messages. Returns the rows
    /// that were stamped.
    pub fn mark_read(&self, reader: Person, at: DateTime<Utc>) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE messages SET read_at = ?1
                 WHERE sender != ?2 AND read_at IS NULL",
                rusqlite::params![at.to_rfc3339(), reader.as_str()],
            )?;
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT} WHERE read_at = ?1 ORDER BY created_at"
            ))?;
            collect(stmt.query_map([at.to_rfc3339()], map_message)?)
        })
    }

    // -- Tasks --

    pub fn insert_task(&self, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (id, title, description, assigned_to, created_by, status, priority, is_shared, due_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                rusqlite::params![
                    task.id.to_string(),
                    task.title,
                    task.description,
                    task.assigned_to.as_str(),
                    task.created_by.as_str(),
                    task.status.as_str(),
                    task.priority.as_str(),
                    task.is_shared,
                    task.due_date.map(|t| t.to_rfc3339()),
                    task.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{TASK_SELECT} ORDER BY created_at DESC"))?;
            collect(stmt.query_map([], map_task)?)
        })
    }

    pub fn set_task_status(&self, id: Uuid, status: TaskStatus) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                rusqlite::params![status.as_str(), id.to_string()],
            )?;
            let mut stmt = conn.prepare(&format!("{TASK_SELECT} WHERE id = ?1"))?;
            stmt.query_row([id.to_string()], map_task).optional()
        })
    }

    /// Comments go with it (ON DELETE CASCADE).
    pub fn delete_task(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM tasks WHERE id = ?1", [id.to_string()])?;
            Ok(n > 0)
        })
    }

    pub fn pending_task_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE status = 'pending'",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // -- Task comments --

    pub fn insert_comment(&self, comment: &TaskComment) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO task_comments (id, task_id, author, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    comment.id.to_string(),
                    comment.task_id.to_string(),
                    comment.author.as_str(),
                    comment.content,
                    comment.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_comments(&self, task_id: Uuid) -> Result<Vec<TaskComment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_id, author, content, created_at
                 FROM task_comments WHERE task_id = ?1 ORDER BY created_at",
            )?;
            collect(stmt.query_map([task_id.to_string()], map_comment)?)
        })
    }

    // -- Requests --

    pub fn insert_request(&self, req: &RequestItem) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO requests (id, from_user, type, details, status, target_date, completed_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    req.id.to_string(),
                    req.from_user.as_str(),
                    req.kind.as_str(),
                    req.details,
                    req.status.as_str(),
                    req.target_date.map(|t| t.to_rfc3339()),
                    req.completed_at.map(|t| t.to_rfc3339()),
                    req.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_requests(&self) -> Result<Vec<RequestItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{REQUEST_SELECT} ORDER BY created_at DESC"))?;
            collect(stmt.query_map([], map_request)?)
        })
    }

    pub fn pending_requests(&self) -> Result<Vec<RequestItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{REQUEST_SELECT} WHERE status = 'pending' ORDER BY created_at DESC"
            ))?;
            collect(stmt.query_map([], map_request)?)
        })
    }

    pub fn set_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<RequestItem>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE requests SET status = ?1, completed_at = ?2 WHERE id = ?3",
                rusqlite::params![
                    status.as_str(),
                    completed_at.map(|t| t.to_rfc3339()),
                    id.to_string()
                ],
            )?;
            let mut stmt = conn.prepare(&format!("{REQUEST_SELECT} WHERE id = ?1"))?;
            stmt.query_row([id.to_string()], map_request).optional()
        })
    }

    // -- Memories --

    pub fn insert_memory(&self, memory: &Memory) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO memories (id, title, date, photos, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    memory.id.to_string(),
                    memory.title,
                    memory.date.to_string(),
                    serde_json::to_string(&memory.photos)?,
                    memory.description,
                    memory.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Most recent first; created_at breaks ties so the newest upload for
    /// a month shows up on top.
    pub fn list_memories(&self) -> Result<Vec<Memory>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MEMORY_SELECT} ORDER BY date DESC, created_at DESC"
            ))?;
            collect(stmt.query_map([], map_memory)?)
        })
    }

    pub fn delete_memory(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM memories WHERE id = ?1", [id.to_string()])?;
            Ok(n > 0)
        })
    }

    // -- Itinerary --

    pub fn insert_itinerary(&self, item: &ItineraryItem) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO itineraries (id, title, date, time, location, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    item.id.to_string(),
                    item.title,
                    item.date.to_string(),
                    item.time,
                    item.location,
                    item.notes,
                    item.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_itineraries(&self) -> Result<Vec<ItineraryItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{ITINERARY_SELECT} ORDER BY date, time"))?;
            collect(stmt.query_map([], map_itinerary)?)
        })
    }

    pub fn next_itinerary(&self, today: NaiveDate) -> Result<Option<ItineraryItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{ITINERARY_SELECT} WHERE date >= ?1 ORDER BY date, time LIMIT 1"
            ))?;
            stmt.query_row([today.to_string()], map_itinerary).optional()
        })
    }

    pub fn delete_itinerary(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM itineraries WHERE id = ?1", [id.to_string()])?;
            Ok(n > 0)
        })
    }

    // -- Finances --

    pub fn insert_finance(&self, item: &FinanceItem) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO finances (id, title, target_amount, current_amount, type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    item.id.to_string(),
                    item.title,
                    item.target_amount,
                    item.current_amount,
                    item.kind.as_str(),
                    item.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_finances(&self) -> Result<Vec<FinanceItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{FINANCE_SELECT} ORDER BY created_at DESC"))?;
            collect(stmt.query_map([], map_finance)?)
        })
    }

    pub fn set_finance_amount(&self, id: Uuid, amount: f64) -> Result<Option<FinanceItem>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE finances SET current_amount = ?1 WHERE id = ?2",
                rusqlite::params![amount, id.to_string()],
            )?;
            let mut stmt = conn.prepare(&format!("{FINANCE_SELECT} WHERE id = ?1"))?;
            stmt.query_row([id.to_string()], map_finance).optional()
        })
    }

    pub fn delete_finance(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM finances WHERE id = ?1", [id.to_string()])?;
            Ok(n > 0)
        })
    }

    pub fn total_saved(&self) -> Result<f64> {
        self.with_conn(|conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(current_amount), 0) FROM finances WHERE type = 'saving'",
                [],
                |row| row.get(0),
            )?;
            Ok(total)
        })
    }

    // -- Life visions --

    pub fn insert_vision(&self, vision: &LifeVisionItem) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO life_visions (id, category, content, done, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    vision.id.to_string(),
                    vision.category.as_str(),
                    vision.content,
                    vision.done,
                    vision.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_visions(&self) -> Result<Vec<LifeVisionItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{VISION_SELECT} ORDER BY created_at DESC"))?;
            collect(stmt.query_map([], map_vision)?)
        })
    }

    pub fn set_vision_done(&self, id: Uuid, done: bool) -> Result<Option<LifeVisionItem>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE life_visions SET done = ?1 WHERE id = ?2",
                rusqlite::params![done, id.to_string()],
            )?;
            let mut stmt = conn.prepare(&format!("{VISION_SELECT} WHERE id = ?1"))?;
            stmt.query_row([id.to_string()], map_vision).optional()
        })
    }

    pub fn delete_vision(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM life_visions WHERE id = ?1", [id.to_string()])?;
            Ok(n > 0)
        })
    }
}

// -- Column lists --

const PROFILE_SELECT: &str = "SELECT id, display_name, pin, theme_color, current_mood, avatar_url, created_at FROM profiles";
const MESSAGE_SELECT: &str = "SELECT id, sender, content, type, harmony_softened, reactions, read_at, created_at FROM messages";
const TASK_SELECT: &str = "SELECT id, title, description, assigned_to, created_by, status, priority, is_shared, due_date, created_at FROM tasks";
const REQUEST_SELECT: &str = "SELECT id, from_user, type, details, status, target_date, completed_at, created_at FROM requests";
const MEMORY_SELECT: &str = "SELECT id, title, date, photos, description, created_at FROM memories";
const ITINERARY_SELECT: &str =
    "SELECT id, title, date, time, location, notes, created_at FROM itineraries";
const FINANCE_SELECT: &str =
    "SELECT id, title, target_amount, current_amount, type, created_at FROM finances";
const VISION_SELECT: &str = "SELECT id, category, content, done, created_at FROM life_visions";

// -- Row mappers --

fn map_profile(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: text_col(row, 0)?,
        display_name: text_col(row, 1)?,
        pin: row.get(2)?,
        theme_color: row.get(3)?,
        current_mood: row.get(4)?,
        avatar_url: row.get(5)?,
        created_at: utc_col(row, 6)?,
    })
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    let reactions_json: String = row.get(5)?;
    Ok(Message {
        id: text_col(row, 0)?,
        sender: text_col(row, 1)?,
        content: row.get(2)?,
        kind: text_col(row, 3)?,
        harmony_softened: row.get(4)?,
        reactions: serde_json::from_str(&reactions_json).map_err(|e| conversion(5, e))?,
        read_at: opt_utc_col(row, 6)?,
        created_at: utc_col(row, 7)?,
    })
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: text_col(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        assigned_to: text_col(row, 3)?,
        created_by: text_col(row, 4)?,
        status: text_col(row, 5)?,
        priority: text_col(row, 6)?,
        is_shared: row.get(7)?,
        due_date: opt_utc_col(row, 8)?,
        created_at: utc_col(row, 9)?,
    })
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<TaskComment> {
    Ok(TaskComment {
        id: text_col(row, 0)?,
        task_id: text_col(row, 1)?,
        author: text_col(row, 2)?,
        content: row.get(3)?,
        created_at: utc_col(row, 4)?,
    })
}

fn map_request(row: &Row<'_>) -> rusqlite::Result<RequestItem> {
    Ok(RequestItem {
        id: text_col(row, 0)?,
        from_user: text_col(row, 1)?,
        kind: text_col(row, 2)?,
        details: row.get(3)?,
        status: text_col(row, 4)?,
        target_date: opt_utc_col(row, 5)?,
        completed_at: opt_utc_col(row, 6)?,
        created_at: utc_col(row, 7)?,
    })
}

fn map_memory(row: &Row<'_>) -> rusqlite::Result<Memory> {
    let photos_json: String = row.get(3)?;
    Ok(Memory {
        id: text_col(row, 0)?,
        title: row.get(1)?,
        date: text_col(row, 2)?,
        photos: serde_json::from_str(&photos_json).map_err(|e| conversion(3, e))?,
        description: row.get(4)?,
        created_at: utc_col(row, 5)?,
    })
}

fn map_itinerary(row: &Row<'_>) -> rusqlite::Result<ItineraryItem> {
    Ok(ItineraryItem {
        id: text_col(row, 0)?,
        title: row.get(1)?,
        date: text_col(row, 2)?,
        time: row.get(3)?,
        location: row.get(4)?,
        notes: row.get(5)?,
        created_at: utc_col(row, 6)?,
    })
}

fn map_finance(row: &Row<'_>) -> rusqlite::Result<FinanceItem> {
    Ok(FinanceItem {
        id: text_col(row, 0)?,
        title: row.get(1)?,
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        kind: text_col(row, 4)?,
        created_at: utc_col(row, 5)?,
    })
}

fn map_vision(row: &Row<'_>) -> rusqlite::Result<LifeVisionItem> {
    Ok(LifeVisionItem {
        id: text_col(row, 0)?,
        category: text_col(row, 1)?,
        content: row.get(2)?,
        done: row.get(3)?,
        created_at: utc_col(row, 4)?,
    })
}

// -- Parsing helpers --

fn conversion(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

/// Parse a TEXT column through FromStr (ids, enums, dates).
fn text_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| conversion(idx, e))
}

fn utc_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    parse_utc(&s).map_err(|e| conversion(idx, e))
}

fn opt_utc_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(s) => Ok(Some(parse_utc(&s).map_err(|e| conversion(idx, e))?)),
        None => Ok(None),
    }
}

/// We write RFC 3339; rows written by SQLite's datetime('now') come back
/// as "YYYY-MM-DD HH:MM:SS" without a timezone, so accept that too.
fn parse_utc(s: &str) -> chrono::ParseResult<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().or_else(|_| {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
    })
}

fn collect<T>(
    rows: impl Iterator<Item = std::result::Result<T, rusqlite::Error>>,
) -> Result<Vec<T>> {
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
