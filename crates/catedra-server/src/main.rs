use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use catedra_gateway::{GatewayState, connection};
use catedra_service::{ServiceError, session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catedra=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("CATEDRA_DB_PATH").unwrap_or_else(|_| "catedra.db".into());
    let host = std::env::var("CATEDRA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CATEDRA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init store and shared state
    let db = Arc::new(catedra_db::Database::open(&PathBuf::from(&db_path))?);
    let state = GatewayState::new(db);

    let app = Router::new()
        .route("/ws", get(ws_upgrade))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Catedra portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve the session cookie before upgrading. An unknown or expired
/// session never reaches the socket loop and never subscribes to anything.
async fn ws_upgrade(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(session_id) = session_cookie(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match session::resolve_session(&state.db, &session_id).await {
        Ok(auth) => ws
            .on_upgrade(move |socket| connection::handle_connection(socket, state, auth.user_id))
            .into_response(),
        Err(ServiceError::SessionInvalid) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            error!("session lookup failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == session::SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let headers = headers_with_cookie("theme=dark; auth_session=s123; lang=es");
        assert_eq!(session_cookie(&headers).as_deref(), Some("s123"));
    }

    #[test]
    fn missing_cookie_yields_none() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_cookie(&headers), None);
    }
}
