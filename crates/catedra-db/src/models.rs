//! Row types mapping directly to SQLite rows. Kept separate from the
//! catedra-types wire models so the storage layer stays independent.

pub struct UserRow {
    pub id: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub is_confirmed: bool,
    pub token: Option<String>,
    pub role: String,
    pub created_at: String,
}

pub struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub expires_at: String,
}

/// A project row with its author's summary columns joined on.
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url_pdf: String,
    pub url_img: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub user_id: String,
    pub author_name: String,
    pub author_last_name: String,
    pub author_role: String,
}

/// A comment row with its author's summary columns joined on.
pub struct CommentRow {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub is_visible: bool,
    pub thesis_project_id: String,
    pub comment_parent_id: Option<String>,
    pub created_at: String,
    pub author_name: String,
    pub author_last_name: String,
    pub author_role: String,
}

pub struct LikeRow {
    pub id: String,
    pub user_id: String,
    pub thesis_project_id: String,
    pub created_at: String,
}
