use std::collections::HashMap;
use std::sync::Arc;

use catedra_db::Database;
use catedra_db::models::ProjectRow;
use catedra_types::events::CreateProjectPayload;
use catedra_types::models::{AuthorSummary, ProjectStatus, ProjectView, Role};

use crate::{ServiceError, id, parse_timestamp, run_blocking};

/// One project with its like aggregates, or `None` if the id is unknown.
/// `viewer_id` only feeds the membership flag; it does not gate access.
pub async fn find_one_project(
    db: &Arc<Database>,
    project_id: &str,
    viewer_id: &str,
) -> Result<Option<ProjectView>, ServiceError> {
    let store = db.clone();
    let pid = project_id.to_string();
    let found = run_blocking(move || {
        let Some(row) = store.get_project_with_author(&pid)? else {
            return Ok(None);
        };
        let likes = store.get_likes_for_projects(std::slice::from_ref(&pid))?;
        Ok(Some((row, likes)))
    })
    .await?;

    Ok(found.map(|(row, likes)| {
        let user_like_ids: Vec<String> = likes.into_iter().map(|l| l.user_id).collect();
        assemble_view(row, user_like_ids, viewer_id)
    }))
}

/// Role-scoped project list, most recent first. Regular users see what
/// they authored or review; admins see everything.
pub async fn projects_by_user(
    db: &Arc<Database>,
    viewer_id: &str,
    viewer_role: Role,
) -> Result<Vec<ProjectView>, ServiceError> {
    let store = db.clone();
    let viewer = viewer_id.to_string();
    let (rows, like_rows) = run_blocking(move || {
        let rows = match viewer_role {
            Role::Admin => store.get_all_projects()?,
            Role::User => store.get_projects_visible_to(&viewer)?,
        };
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let likes = store.get_likes_for_projects(&ids)?;
        Ok((rows, likes))
    })
    .await?;

    // Group liking users by project; the batch comes back unordered.
    let mut likes_by_project: HashMap<String, Vec<String>> = HashMap::new();
    for like in like_rows {
        likes_by_project
            .entry(like.thesis_project_id)
            .or_default()
            .push(like.user_id);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let user_like_ids = likes_by_project.remove(&row.id).unwrap_or_default();
            assemble_view(row, user_like_ids, viewer_id)
        })
        .collect())
}

/// Register a project. Status starts out pending; the committee decides
/// the rest elsewhere. Returns the new project id.
pub async fn create_project(
    db: &Arc<Database>,
    payload: CreateProjectPayload,
) -> Result<String, ServiceError> {
    let store = db.clone();
    let project_id = id::generate();
    let pid = project_id.clone();
    run_blocking(move || {
        store.insert_project(
            &pid,
            &payload.title,
            &payload.description,
            &payload.url_pdf,
            payload.url_img.as_deref(),
            &payload.user_auth_id,
        )
    })
    .await?;

    Ok(project_id)
}

fn assemble_view(row: ProjectRow, user_like_ids: Vec<String>, viewer_id: &str) -> ProjectView {
    let is_liked = user_like_ids.iter().any(|uid| uid == viewer_id);
    let created_at = parse_timestamp(&row.created_at, &format!("project '{}'", row.id));
    let updated_at = row
        .updated_at
        .as_deref()
        .map(|raw| parse_timestamp(raw, &format!("project '{}'", row.id)));

    ProjectView {
        user: AuthorSummary {
            id: row.user_id.clone(),
            name: row.author_name,
            last_name: row.author_last_name,
            role: Role::from_db(&row.author_role),
        },
        likes: user_like_ids.len(),
        is_liked_by_the_user_auth: is_liked,
        user_like_ids,
        id: row.id,
        title: row.title,
        description: row.description,
        url_pdf: row.url_pdf,
        url_img: row.url_img,
        status: ProjectStatus::from_db(&row.status),
        created_at,
        updated_at,
        user_id: row.user_id,
    }
}
