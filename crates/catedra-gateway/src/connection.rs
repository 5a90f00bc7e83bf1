use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{error, info, warn};
use uuid::Uuid;

use catedra_service::{ServiceError, comments, likes, projects};
use catedra_types::events::{ClientMessage, ServerEvent};
use catedra_types::models::Role;

use crate::GatewayState;
use crate::topics::{COMMENT_TOPIC, projects_topic};

/// Server pings every 15 seconds; two missed pongs (~30s) drop the
/// connection.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Drive a socket whose session was already resolved at the upgrade layer.
/// The connection is subscribed to the shared comment feed and to its own
/// project feed, and stays on those two topics for its whole life.
pub async fn handle_connection(socket: WebSocket, state: GatewayState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();

    let conn_id = Uuid::new_v4();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    state
        .topics
        .register(COMMENT_TOPIC, conn_id, tx.clone())
        .await;
    state
        .topics
        .register(&projects_topic(&user_id), conn_id, tx)
        .await;

    info!("user {} connected ({})", user_id, conn_id);

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received;

    // Forward topic payloads to the client, with heartbeat.
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = rx.recv() => {
                    let Some(payload) = result else { break };
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("heartbeat timeout, dropping connection {}", conn_id);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read frames from the client and dispatch them one by one.
    let recv_state = state.clone();
    let recv_user = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => dispatch(&recv_state, message).await,
                    Err(e) => {
                        warn!(
                            "user {} sent a malformed frame: {} -- raw: {}",
                            recv_user,
                            e,
                            &text[..text.len().min(200)]
                        );
                    }
                },
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.topics.unregister(conn_id).await;
    info!("user {} disconnected ({})", user_id, conn_id);
}

/// Route one inbound message. Storage failures are logged and swallowed
/// here — the connection survives, the client just gets no push for that
/// request.
pub async fn dispatch(state: &GatewayState, message: ClientMessage) {
    match message {
        ClientMessage::GetComments(p) => {
            if let Err(e) = publish_comments(state, &p.project_id).await {
                error!("get-comments for '{}' failed: {}", p.project_id, e);
            }
        }

        ClientMessage::CreateComment(p) => {
            let project_id = p.project_id.clone();
            let result = async {
                comments::create_comment(&state.db, p).await?;
                publish_comments(state, &project_id).await
            }
            .await;
            if let Err(e) = result {
                error!("create-comment for '{}' failed: {}", project_id, e);
            }
        }

        ClientMessage::GetProjects(p) => {
            if let Err(e) = publish_projects(state, &p.user_auth_id, p.user_auth_role).await {
                error!("get-projects for '{}' failed: {}", p.user_auth_id, e);
            }
        }

        ClientMessage::CreateProject(p) => {
            let author_id = p.user_auth_id.clone();
            match projects::create_project(&state.db, p).await {
                Ok(project_id) => info!("user {} registered project {}", author_id, project_id),
                Err(e) => error!("create-project by '{}' failed: {}", author_id, e),
            }
        }

        ClientMessage::CreateUserLike(p) => {
            if let Err(e) = likes::like_project(&state.db, &p.user_id, &p.project_id).await {
                error!("create-user-like on '{}' failed: {}", p.project_id, e);
            }
        }

        ClientMessage::DeleteUserLike(p) => {
            if let Err(e) = likes::unlike_project(&state.db, &p.user_id, &p.project_id).await {
                error!("delete-user-like on '{}' failed: {}", p.project_id, e);
            }
        }
    }
}

/// Re-fetch the authoritative comment list and push it to the shared feed.
/// No diffing; the full list is the payload.
async fn publish_comments(state: &GatewayState, project_id: &str) -> Result<(), ServiceError> {
    let comments = comments::comments_by_project(&state.db, project_id).await?;
    let event = ServerEvent::GetComments(comments);
    let payload = serde_json::to_string(&event).unwrap();
    state.topics.broadcast(COMMENT_TOPIC, payload).await;
    Ok(())
}

/// Re-fetch the role-scoped project list and push it to the subject user's
/// feed. The topic comes from the payload's subject id, not from the
/// connection that asked.
async fn publish_projects(
    state: &GatewayState,
    user_auth_id: &str,
    role: Role,
) -> Result<(), ServiceError> {
    let projects = projects::projects_by_user(&state.db, user_auth_id, role).await?;
    let event = ServerEvent::GetProjects(projects);
    let payload = serde_json::to_string(&event).unwrap();
    state
        .topics
        .broadcast(&projects_topic(user_auth_id), payload)
        .await;
    Ok(())
}
