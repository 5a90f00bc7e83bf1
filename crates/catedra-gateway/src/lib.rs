pub mod connection;
pub mod topics;

use std::sync::Arc;

use catedra_db::Database;

use crate::topics::TopicRegistry;

/// Shared handles every connection task needs.
#[derive(Clone)]
pub struct GatewayState {
    pub db: Arc<Database>,
    pub topics: TopicRegistry,
}

impl GatewayState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            topics: TopicRegistry::new(),
        }
    }
}
