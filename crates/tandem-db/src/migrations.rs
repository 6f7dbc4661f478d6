use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            id              TEXT PRIMARY KEY,
            display_name    TEXT NOT NULL UNIQUE,
            pin             TEXT NOT NULL UNIQUE,
            theme_color     TEXT,
            current_mood    TEXT,
            avatar_url      TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS messages (
            id                  TEXT PRIMARY KEY,
            sender              TEXT NOT NULL,
            content             TEXT NOT NULL,
            type                TEXT NOT NULL DEFAULT 'text',
            harmony_softened    INTEGER NOT NULL DEFAULT 0,
            reactions           TEXT NOT NULL DEFAULT '{}',
            read_at             TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_created
            ON messages(created_at);

        CREATE TABLE IF NOT EXISTS tasks (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            description     TEXT,
            assigned_to     TEXT NOT NULL,
            created_by      TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending',
            priority        TEXT NOT NULL DEFAULT 'medium',
            is_shared       INTEGER NOT NULL DEFAULT 1,
            due_date        TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_comments (
            id          TEXT PRIMARY KEY,
            task_id     TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            author      TEXT NOT NULL,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_task_comments_task
            ON task_comments(task_id, created_at);

        CREATE TABLE IF NOT EXISTS requests (
            id              TEXT PRIMARY KEY,
            from_user       TEXT NOT NULL,
            type            TEXT NOT NULL,
            details         TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending',
            target_date     TEXT,
            completed_at    TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS memories (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            date            TEXT NOT NULL,
            photos          TEXT NOT NULL DEFAULT '[]',
            description     TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS itineraries (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            date        TEXT NOT NULL,
            time        TEXT,
            location    TEXT,
            notes       TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_itineraries_date
            ON itineraries(date);

        CREATE TABLE IF NOT EXISTS finances (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            target_amount   REAL NOT NULL DEFAULT 0,
            current_amount  REAL NOT NULL DEFAULT 0,
            type            TEXT NOT NULL DEFAULT 'saving',
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS life_visions (
            id          TEXT PRIMARY KEY,
            category    TEXT NOT NULL,
            content     TEXT NOT NULL,
            done        INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        -- Legacy rows encoded completion as a text prefix on content.
        -- Rewrite them once into the dedicated column.
        UPDATE life_visions
            SET done = 1,
                content = replace(content, '✅ [DONE] ', '')
            WHERE content LIKE '✅ [DONE] %';
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
