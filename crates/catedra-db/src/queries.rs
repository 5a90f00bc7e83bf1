use anyhow::Result;
use rusqlite::Connection;

use crate::Database;
use crate::models::{CommentRow, LikeRow, ProjectRow, SessionRow, UserRow};

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.url_pdf, p.url_img, p.status, \
     p.created_at, p.updated_at, p.user_id, u.name, u.last_name, u.role";

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, last_name, email, password_hash, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, name, last_name, email, password_hash, role),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Sessions --

    pub fn create_session(&self, id: &str, user_id: &str, expires_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)",
                (id, user_id, expires_at),
            )?;
            Ok(())
        })
    }

    /// Fetch a session by id, treating expired rows as absent.
    pub fn get_session(&self, id: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, expires_at FROM sessions
                 WHERE id = ?1 AND datetime(expires_at) > datetime('now')",
            )?;

            let row = stmt
                .query_row([id], |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        expires_at: row.get(2)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- Projects --

    pub fn insert_project(
        &self,
        id: &str,
        title: &str,
        description: &str,
        url_pdf: &str,
        url_img: Option<&str>,
        user_id: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO thesis_projects (id, title, description, url_pdf, url_img, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, title, description, url_pdf, url_img, user_id],
            )?;
            Ok(())
        })
    }

    pub fn get_project_with_author(&self, project_id: &str) -> Result<Option<ProjectRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PROJECT_COLUMNS}
                 FROM thesis_projects p
                 INNER JOIN users u ON u.id = p.user_id
                 WHERE p.id = ?1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt.query_row([project_id], map_project_row).optional()?;
            Ok(row)
        })
    }

    /// Every project, most recent first. Admin view.
    pub fn get_all_projects(&self) -> Result<Vec<ProjectRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PROJECT_COLUMNS}
                 FROM thesis_projects p
                 INNER JOIN users u ON u.id = p.user_id
                 ORDER BY p.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], map_project_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Projects the viewer authored or sits on the committee of, most
    /// recent first. A project with several committee rows for the same
    /// viewer still comes back once.
    pub fn get_projects_visible_to(&self, viewer_id: &str) -> Result<Vec<ProjectRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PROJECT_COLUMNS}
                 FROM thesis_projects p
                 INNER JOIN users u ON u.id = p.user_id
                 WHERE p.user_id = ?1
                    OR EXISTS (
                        SELECT 1 FROM committee_members cm
                        WHERE cm.thesis_project_id = p.id AND cm.user_id = ?1
                    )
                 ORDER BY p.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([viewer_id], map_project_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Likes --

    /// Batch-fetch like rows for a set of project ids.
    pub fn get_likes_for_projects(&self, project_ids: &[String]) -> Result<Vec<LikeRow>> {
        if project_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=project_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT id, user_id, thesis_project_id, created_at
                 FROM user_likes WHERE thesis_project_id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = project_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(LikeRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        thesis_project_id: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Record a like. A (user, project) pair may like at most once; a
    /// repeat insert leaves the store untouched. Returns whether a row was
    /// actually added.
    pub fn insert_like(&self, id: &str, user_id: &str, project_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO user_likes (id, user_id, thesis_project_id)
                 VALUES (?1, ?2, ?3)",
                (id, user_id, project_id),
            )?;
            Ok(changed > 0)
        })
    }

    /// Remove a like if present. Returns whether a row was removed.
    pub fn delete_like(&self, user_id: &str, project_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM user_likes WHERE user_id = ?1 AND thesis_project_id = ?2",
                (user_id, project_id),
            )?;
            Ok(changed > 0)
        })
    }

    // -- Comments --

    pub fn insert_comment(
        &self,
        id: &str,
        content: &str,
        user_id: &str,
        project_id: &str,
        parent_id: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, content, user_id, thesis_project_id, comment_parent_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, content, user_id, project_id, parent_id],
            )?;
            Ok(())
        })
    }

    pub fn get_comments_by_project(&self, project_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| query_comments(conn, project_id))
    }

    // -- Committee --

    pub fn add_committee_member(&self, id: &str, user_id: &str, project_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO committee_members (id, user_id, thesis_project_id)
                 VALUES (?1, ?2, ?3)",
                (id, user_id, project_id),
            )?;
            Ok(())
        })
    }
}

fn map_project_row(row: &rusqlite::Row) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        url_pdf: row.get(3)?,
        url_img: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        user_id: row.get(8)?,
        author_name: row.get(9)?,
        author_last_name: row.get(10)?,
        author_role: row.get(11)?,
    })
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, password_hash, username, name, last_name, email, is_confirmed, token, role,
                created_at
         FROM users WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                password_hash: row.get(1)?,
                username: row.get(2)?,
                name: row.get(3)?,
                last_name: row.get(4)?,
                email: row.get(5)?,
                is_confirmed: row.get(6)?,
                token: row.get(7)?,
                role: row.get(8)?,
                created_at: row.get(9)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_comments(conn: &Connection, project_id: &str) -> Result<Vec<CommentRow>> {
    // INNER JOIN: a comment whose author vanished is not worth showing
    let mut stmt = conn.prepare(
        "SELECT c.id, c.content, c.user_id, c.is_visible, c.thesis_project_id,
                c.comment_parent_id, c.created_at, u.name, u.last_name, u.role
         FROM comments c
         INNER JOIN users u ON u.id = c.user_id
         WHERE c.thesis_project_id = ?1
         ORDER BY c.created_at ASC",
    )?;

    let rows = stmt
        .query_map([project_id], |row| {
            Ok(CommentRow {
                id: row.get(0)?,
                content: row.get(1)?,
                user_id: row.get(2)?,
                is_visible: row.get(3)?,
                thesis_project_id: row.get(4)?,
                comment_parent_id: row.get(5)?,
                created_at: row.get(6)?,
                author_name: row.get(7)?,
                author_last_name: row.get(8)?,
                author_role: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
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
