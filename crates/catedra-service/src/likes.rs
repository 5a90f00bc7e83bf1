use std::sync::Arc;

use catedra_db::Database;

use crate::{ServiceError, id, run_blocking};

/// Record that a user likes a project. Liking twice is a no-op; returns
/// whether a row was actually added.
pub async fn like_project(
    db: &Arc<Database>,
    user_id: &str,
    project_id: &str,
) -> Result<bool, ServiceError> {
    let store = db.clone();
    let like_id = id::generate();
    let uid = user_id.to_string();
    let pid = project_id.to_string();
    run_blocking(move || store.insert_like(&like_id, &uid, &pid)).await
}

/// Withdraw a like if present. Returns whether a row was removed.
pub async fn unlike_project(
    db: &Arc<Database>,
    user_id: &str,
    project_id: &str,
) -> Result<bool, ServiceError> {
    let store = db.clone();
    let uid = user_id.to_string();
    let pid = project_id.to_string();
    run_blocking(move || store.delete_like(&uid, &pid)).await
}
