use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Stored as plain text; anything that is not an admin reads
/// back as a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_db(raw: &str) -> Role {
        match raw {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Committee review status of a thesis project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProjectStatus {
    pub fn from_db(raw: &str) -> ProjectStatus {
        match raw {
            "approved" => ProjectStatus::Approved,
            "rejected" => ProjectStatus::Rejected,
            _ => ProjectStatus::Pending,
        }
    }
}

/// Minimal author info joined onto comments and project views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub role: Role,
}

/// A thesis project together with its author summary and like aggregates,
/// exactly as pushed to subscribers.
///
/// `user_like_ids` is the set of users who liked the project (empty when
/// nobody has) and `is_liked_by_the_user_auth` is the membership test for
/// whichever viewer the query was run on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url_pdf: String,
    pub url_img: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: String,
    pub user: AuthorSummary,
    pub likes: usize,
    pub user_like_ids: Vec<String>,
    pub is_liked_by_the_user_auth: bool,
}

/// A comment with its author summary. The list clients receive is flat;
/// `comment_parent_id` is carried for reply threading but never used to
/// group rows server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub is_visible: bool,
    pub thesis_project_id: String,
    pub comment_parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: AuthorSummary,
}
