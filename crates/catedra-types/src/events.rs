use serde::{Deserialize, Serialize};

use crate::models::{CommentView, ProjectView, Role};

/// Messages sent FROM client TO server over the socket.
///
/// Wire shape is `{"type": "...", "payload": {...}}` with kebab-case tags
/// and camelCase payload fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    GetComments(GetCommentsPayload),
    CreateComment(CreateCommentPayload),
    GetProjects(GetProjectsPayload),
    CreateProject(CreateProjectPayload),
    CreateUserLike(UserLikePayload),
    DeleteUserLike(UserLikePayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCommentsPayload {
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    pub project_id: String,
    pub content: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectsPayload {
    pub user_auth_id: String,
    pub user_auth_role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    pub user_auth_id: String,
    pub user_auth_role: Role,
    pub title: String,
    pub description: String,
    pub url_img: Option<String>,
    pub url_pdf: String,
}

/// Shared by create-user-like and delete-user-like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLikePayload {
    pub user_id: String,
    pub project_id: String,
}

/// Events pushed FROM server TO topic subscribers. There is no
/// request-response correlation; a push is the whole answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerEvent {
    GetComments(Vec<CommentView>),
    GetProjects(Vec<ProjectView>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorSummary;
    use chrono::Utc;

    #[test]
    fn inbound_frames_parse_from_wire_json() {
        let raw = r#"{"type":"get-comments","payload":{"projectId":"p1"}}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::GetComments(p) => assert_eq!(p.project_id, "p1"),
            other => panic!("parsed as {other:?}"),
        }

        let raw = r#"{"type":"create-comment","payload":{"projectId":"p1","content":"hi","userId":"u1"}}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::CreateComment(p) => {
                assert_eq!(p.project_id, "p1");
                assert_eq!(p.content, "hi");
                assert_eq!(p.user_id, "u1");
            }
            other => panic!("parsed as {other:?}"),
        }

        let raw = r#"{"type":"get-projects","payload":{"userAuthId":"u1","userAuthRole":"admin"}}"#;
        match serde_json::from_str::<ClientMessage>(raw).unwrap() {
            ClientMessage::GetProjects(p) => {
                assert_eq!(p.user_auth_id, "u1");
                assert_eq!(p.user_auth_role, Role::Admin);
            }
            other => panic!("parsed as {other:?}"),
        }

        let raw = r#"{"type":"create-user-like","payload":{"userId":"u2","projectId":"p1"}}"#;
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(raw).unwrap(),
            ClientMessage::CreateUserLike(_)
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let raw = r#"{"type":"drop-tables","payload":{}}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn outbound_events_serialize_as_type_plus_payload() {
        let event = ServerEvent::GetComments(vec![CommentView {
            id: "c1".into(),
            content: "hi".into(),
            user_id: "u1".into(),
            is_visible: true,
            thesis_project_id: "p1".into(),
            comment_parent_id: None,
            created_at: Utc::now(),
            user: AuthorSummary {
                id: "u1".into(),
                name: "Ana".into(),
                last_name: "Molina".into(),
                role: Role::User,
            },
        }]);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "get-comments");
        assert_eq!(value["payload"][0]["thesisProjectId"], "p1");
        assert_eq!(value["payload"][0]["isVisible"], true);
        assert_eq!(value["payload"][0]["user"]["lastName"], "Molina");
        assert_eq!(value["payload"][0]["user"]["role"], "user");
    }
}
