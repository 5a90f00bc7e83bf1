use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::trace;
use uuid::Uuid;

/// The single shared comment feed every connection joins. A push carries
/// the comments of whichever project was requested last; clients filter by
/// project themselves.
pub const COMMENT_TOPIC: &str = "comment";

/// Per-user project feed.
pub fn projects_topic(user_id: &str) -> String {
    format!("projects-{user_id}")
}

/// Named broadcast channels and the connections subscribed to each.
///
/// All mutation goes through register/unregister/broadcast; there is no
/// re-subscription protocol. Connections register once at open and are
/// dropped from every topic at close.
#[derive(Clone)]
pub struct TopicRegistry {
    inner: Arc<RwLock<HashMap<String, HashMap<Uuid, mpsc::UnboundedSender<String>>>>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe a connection's outbound channel to a topic.
    pub async fn register(&self, topic: &str, conn_id: Uuid, tx: mpsc::UnboundedSender<String>) {
        let mut topics = self.inner.write().await;
        topics
            .entry(topic.to_string())
            .or_default()
            .insert(conn_id, tx);
    }

    /// Drop a connection from every topic, pruning topics left empty.
    pub async fn unregister(&self, conn_id: Uuid) {
        let mut topics = self.inner.write().await;
        topics.retain(|_, subscribers| {
            subscribers.remove(&conn_id);
            !subscribers.is_empty()
        });
    }

    /// Hand a serialized payload to every subscriber of a topic. Returns
    /// how many connections it reached; a topic nobody holds reaches zero.
    pub async fn broadcast(&self, topic: &str, payload: String) -> usize {
        let topics = self.inner.read().await;
        let Some(subscribers) = topics.get(topic) else {
            return 0;
        };

        let mut delivered = 0;
        for tx in subscribers.values() {
            if tx.send(payload.clone()).is_ok() {
                delivered += 1;
            }
        }
        trace!("broadcast on '{}' reached {} connections", topic, delivered);
        delivered
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}
