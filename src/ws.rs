use crate::error::GameError;
use crate::game::Event;
use crate::session::SessionHandle;
use futures_util::{select, FutureExt, SinkExt, StreamExt, TryStreamExt};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

#[derive(Error, Debug, PartialEq)]
enum WsError {
    #[error("violation of the application-layer protocol")]
    ProtocolError,
    #[error("the game session is unavailable")]
    SessionUnavailable,
    #[error("{0}")]
    GameError(#[from] GameError),
}

pub async fn accept_connection(stream: TcpStream, session: SessionHandle) {
    log::info!("Accepted new connection");

    let Ok(stream) = tokio_tungstenite::accept_async(stream).await else {
        log::error!("Error occured during websocket handshake");
        return;
    };
    let (mut write, read) = stream.split();
    let mut read = read.fuse();

    let Ok(mut updates) = session.lock().map(|mut session| session.subscribe()) else {
        log::error!("Could not subscribe to a poisoned session");
        return;
    };

    loop {
        select! {
            msg = read.try_next() => {
                let msg = match msg {
                    Ok(Some(Message::Text(msg))) => msg,
                    Ok(Some(Message::Ping(_) | Message::Pong(_))) => continue,
                    _ => break,
                };
                if let Err(err) = process_message(&msg, &session) {
                    log::warn!("Rejected message {}: {}", &msg, err);
                    let reply = json!({
                        "type": "error",
                        "error": err.to_string()
                    });
                    write.send(Message::Text(reply.to_string())).await.ok();
                }
            },
            changed = updates.changed().fuse() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().to_string();
                if write.send(Message::Text(state)).await.is_err() {
                    log::error!("Could not send websockets message");
                    break;
                }
            }
        }
    }
    log::info!("Connection closed");
}

/// Parses a websockets message from the client.
fn parse_event(msg: &str) -> Result<Event, WsError> {
    let event: Event = serde_json::from_str(msg).map_err(|_| WsError::ProtocolError)?;
    // The clock belongs to the server
    if event == Event::ClockTick {
        return Err(WsError::ProtocolError);
    }
    Ok(event)
}

/// Applies a client's event to the game.
fn process_message(msg: &str, session: &SessionHandle) -> Result<(), WsError> {
    let event = parse_event(msg)?;
    let mut session = session.lock().map_err(|_| WsError::SessionUnavailable)?;
    session.dispatch(&event)?;
    Ok(())
}
