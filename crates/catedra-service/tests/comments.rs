use std::sync::Arc;

use catedra_db::Database;
use catedra_service::comments;
use catedra_types::events::CreateCommentPayload;
use catedra_types::models::{AuthorSummary, Role};

fn store() -> Arc<Database> {
    let db = Database::open_in_memory().unwrap();
    db.create_user("u1", "Ana", "Molina", "ana@uni.edu", "hash", "user")
        .unwrap();
    db.insert_project(
        "p1",
        "Compilers",
        "An investigation",
        "https://files.uni.edu/thesis.pdf",
        None,
        "u1",
    )
    .unwrap();
    Arc::new(db)
}

fn payload(project_id: &str, content: &str) -> CreateCommentPayload {
    CreateCommentPayload {
        project_id: project_id.into(),
        content: content.into(),
        user_id: "u1".into(),
    }
}

#[tokio::test]
async fn comment_comes_back_with_author_summary() {
    let db = store();
    comments::create_comment(&db, payload("p1", "hi")).await.unwrap();

    let list = comments::comments_by_project(&db, "p1").await.unwrap();
    assert_eq!(list.len(), 1);

    let comment = &list[0];
    assert_eq!(comment.content, "hi");
    assert_eq!(comment.thesis_project_id, "p1");
    assert!(comment.is_visible);
    assert!(comment.comment_parent_id.is_none());
    assert_eq!(
        comment.user,
        AuthorSummary {
            id: "u1".into(),
            name: "Ana".into(),
            last_name: "Molina".into(),
            role: Role::User,
        }
    );
}

#[tokio::test]
async fn comment_on_unregistered_project_is_kept() {
    let db = store();
    comments::create_comment(&db, payload("ghost", "anyone here?"))
        .await
        .unwrap();

    let list = comments::comments_by_project(&db, "ghost").await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].content, "anyone here?");
}

#[tokio::test]
async fn replies_come_back_flat() {
    let db = store();
    comments::create_comment(&db, payload("p1", "first")).await.unwrap();
    let parent_id = comments::comments_by_project(&db, "p1").await.unwrap()[0]
        .id
        .clone();

    db.insert_comment("c2", "re: first", "u1", "p1", Some(&parent_id))
        .unwrap();

    let list = comments::comments_by_project(&db, "p1").await.unwrap();
    assert_eq!(list.len(), 2);

    let reply = list.iter().find(|c| c.id == "c2").unwrap();
    assert_eq!(reply.comment_parent_id.as_deref(), Some(parent_id.as_str()));
}

#[tokio::test]
async fn hidden_comments_are_still_returned() {
    let db = store();
    db.insert_comment("c1", "rude remark", "u1", "p1", None).unwrap();
    db.with_conn(|conn| {
        conn.execute("UPDATE comments SET is_visible = 0 WHERE id = 'c1'", [])?;
        Ok(())
    })
    .unwrap();

    let list = comments::comments_by_project(&db, "p1").await.unwrap();
    assert_eq!(list.len(), 1);
    assert!(!list[0].is_visible);
}

#[tokio::test]
async fn project_without_comments_is_an_empty_list() {
    let db = store();
    let list = comments::comments_by_project(&db, "p1").await.unwrap();
    assert!(list.is_empty());
}
