use crate::game::{GameState, PlayerId, RoleKnowledge};
use crate::session::SessionHandle;
use crate::time::iso8601;
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Json, Router,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;

/// Length of the ids minted for players joining from the lobby link.
const PLAYER_ID_LEN: usize = 6;

pub fn make_router(session: SessionHandle) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/restart", get(restart))
        .route("/join", get(join))
        .route("/roles/:player_id", get(get_roles))
        .route("/pastgames", get(get_past_games))
        .with_state(session)
}

pub async fn listen(port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("could not bind to port {}", port))?;
    log::info!("API listening on {}", listener.local_addr()?);
    Ok(listener)
}

async fn get_state(State(session): State<SessionHandle>) -> Result<Json<GameState>, StatusCode> {
    let session = session.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(session.game().clone()))
}

async fn restart(State(session): State<SessionHandle>) -> Result<Redirect, StatusCode> {
    let mut session = session.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    session.restart();
    Ok(Redirect::to("/"))
}

async fn join() -> Redirect {
    Redirect::to(&format!("/?isHand=true&playerId={}", random_player_id()))
}

async fn get_roles(
    State(session): State<SessionHandle>,
    Path(player_id): Path<String>,
) -> Result<Json<RoleKnowledge>, StatusCode> {
    let session = session.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    session
        .role_knowledge(&PlayerId(player_id))
        .map(Json)
        .map_err(|_| StatusCode::NOT_FOUND)
}

async fn get_past_games(State(session): State<SessionHandle>) -> Result<Json<impl Serialize>, StatusCode> {
    let session = session.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let games: Vec<_> = session
        .past_games()
        .into_iter()
        .map(|(id, stats)| {
            json!({
                "id": id,
                "players": stats.players,
                "started": iso8601(stats.started),
                "finished": iso8601(stats.finished),
                "outcome": stats.outcome,
                "winner": stats.winner,
            })
        })
        .collect();

    Ok(Json(json!({
        "games": games
    })))
}

/// Mints a fresh player id for someone joining from the lobby link.
fn random_player_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PLAYER_ID_LEN)
        .map(char::from)
        .collect()
}
