use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

// comments.thesis_project_id and user_likes.thesis_project_id deliberately
// carry no foreign key: a comment may be filed against a project id the
// store has never seen. Committee pairs are not unique either.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            username      TEXT,
            name          TEXT NOT NULL,
            last_name     TEXT NOT NULL,
            email         TEXT NOT NULL,
            is_confirmed  INTEGER NOT NULL DEFAULT 0,
            token         TEXT,
            role          TEXT NOT NULL DEFAULT 'user',
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            expires_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS thesis_projects (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            url_pdf     TEXT NOT NULL,
            url_img     TEXT,
            status      TEXT NOT NULL DEFAULT 'pending',
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT,
            user_id     TEXT NOT NULL REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_projects_author
            ON thesis_projects(user_id, created_at);

        CREATE TABLE IF NOT EXISTS committee_members (
            id                 TEXT PRIMARY KEY,
            user_id            TEXT NOT NULL REFERENCES users(id),
            thesis_project_id  TEXT NOT NULL REFERENCES thesis_projects(id),
            created_at         TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_committee_project
            ON committee_members(thesis_project_id);

        CREATE TABLE IF NOT EXISTS comments (
            id                 TEXT PRIMARY KEY,
            content            TEXT NOT NULL,
            user_id            TEXT NOT NULL REFERENCES users(id),
            is_visible         INTEGER NOT NULL DEFAULT 1,
            thesis_project_id  TEXT NOT NULL,
            comment_parent_id  TEXT,
            created_at         TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_project
            ON comments(thesis_project_id, created_at);

        CREATE TABLE IF NOT EXISTS user_likes (
            id                 TEXT PRIMARY KEY,
            user_id            TEXT NOT NULL REFERENCES users(id),
            thesis_project_id  TEXT NOT NULL,
            created_at         TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, thesis_project_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_project
            ON user_likes(thesis_project_id);
        ",
    )?;

    info!("Store migrations complete");
    Ok(())
}
