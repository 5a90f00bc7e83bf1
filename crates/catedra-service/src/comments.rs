use std::sync::Arc;

use catedra_db::Database;
use catedra_db::models::CommentRow;
use catedra_types::events::CreateCommentPayload;
use catedra_types::models::{AuthorSummary, CommentView, Role};

use crate::{ServiceError, id, parse_timestamp, run_blocking};

/// Insert a comment. The project id is taken as given — the store holds no
/// foreign key for it and no existence check is made here.
pub async fn create_comment(
    db: &Arc<Database>,
    payload: CreateCommentPayload,
) -> Result<(), ServiceError> {
    let store = db.clone();
    let comment_id = id::generate();
    run_blocking(move || {
        store.insert_comment(
            &comment_id,
            &payload.content,
            &payload.user_id,
            &payload.project_id,
            None,
        )
    })
    .await
}

/// All comments on a project, oldest first, each with its author summary.
/// Hidden comments come back too; visibility is carried as data, not
/// filtered here.
pub async fn comments_by_project(
    db: &Arc<Database>,
    project_id: &str,
) -> Result<Vec<CommentView>, ServiceError> {
    let store = db.clone();
    let pid = project_id.to_string();
    let rows = run_blocking(move || store.get_comments_by_project(&pid)).await?;

    Ok(rows.into_iter().map(view_from_row).collect())
}

fn view_from_row(row: CommentRow) -> CommentView {
    let created_at = parse_timestamp(&row.created_at, &format!("comment '{}'", row.id));
    CommentView {
        user: AuthorSummary {
            id: row.user_id.clone(),
            name: row.author_name,
            last_name: row.author_last_name,
            role: Role::from_db(&row.author_role),
        },
        id: row.id,
        content: row.content,
        user_id: row.user_id,
        is_visible: row.is_visible,
        thesis_project_id: row.thesis_project_id,
        comment_parent_id: row.comment_parent_id,
        created_at,
    }
}
