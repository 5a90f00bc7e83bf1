use std::sync::Arc;

use catedra_db::Database;

use crate::{ServiceError, run_blocking};

/// Name of the cookie carrying the session id at connect time.
pub const SESSION_COOKIE: &str = "auth_session";

/// Identity resolved from a session cookie.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: String,
    pub user_id: String,
}

/// Look up the session id a connecting socket presented. Unknown or
/// expired sessions are fatal to the connection; nothing gets subscribed.
pub async fn resolve_session(
    db: &Arc<Database>,
    session_id: &str,
) -> Result<AuthSession, ServiceError> {
    let store = db.clone();
    let sid = session_id.to_string();
    let row = run_blocking(move || store.get_session(&sid)).await?;

    match row {
        Some(session) => Ok(AuthSession {
            session_id: session.id,
            user_id: session.user_id,
        }),
        None => Err(ServiceError::SessionInvalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const STAMP: &str = "%Y-%m-%d %H:%M:%S";

    fn store_with_user() -> Arc<Database> {
        let db = Database::open_in_memory().unwrap();
        db.create_user("u1", "Ana", "Molina", "ana@uni.edu", "hash", "user")
            .unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn unknown_session_is_invalid() {
        let db = store_with_user();
        let err = resolve_session(&db, "never-issued").await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionInvalid));
    }

    #[tokio::test]
    async fn expired_session_is_invalid() {
        let db = store_with_user();
        let stale = (Utc::now() - Duration::hours(1)).format(STAMP).to_string();
        db.create_session("s1", "u1", &stale).unwrap();

        let err = resolve_session(&db, "s1").await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionInvalid));
    }

    #[tokio::test]
    async fn live_session_resolves_to_its_user() {
        let db = store_with_user();
        let fresh = (Utc::now() + Duration::days(30)).format(STAMP).to_string();
        db.create_session("s1", "u1", &fresh).unwrap();

        let auth = resolve_session(&db, "s1").await.unwrap();
        assert_eq!(auth.session_id, "s1");
        assert_eq!(auth.user_id, "u1");
    }
}
