//! WebSocket connection loop for hub clients.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered hub events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage};
use super::subscription::SubscriptionManager;
use crate::api::dto::ProbeResponse;
use crate::app_state::AppState;
use crate::domain::{CelebrationReason, HubEvent, ProbeSnapshot, ServerAddress};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Sends the current probe state once on connect.
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<HubEvent>,
    state: AppState,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::all();

    let hello = WsMessage::event(probe_state_payload(&state.probe_service.current()));
    if send_message(&mut ws_tx, &hello).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match parse_command(&text) {
                            Ok((id, command)) => execute_command(id, command, &mut subs, &state).await,
                            Err(err) => err,
                        };
                        if send_message(&mut ws_tx, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "ws client read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(hub_event) => {
                        if subs.matches(hub_event.topic()) {
                            let payload = serde_json::to_value(&hub_event).unwrap_or_default();
                            if send_message(&mut ws_tx, &WsMessage::event(payload)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

async fn send_message<S>(ws_tx: &mut S, msg: &WsMessage) -> Result<(), axum::Error>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).unwrap_or_default();
    ws_tx.send(Message::text(json)).await
}

/// Parses a client text frame into its command id and command.
///
/// Returns the error reply to send when the frame is not a valid command:
/// code 400 for malformed JSON or arguments, 404 for unknown commands.
pub fn parse_command(text: &str) -> Result<(String, WsCommand), WsMessage> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return Err(WsMessage::error(String::new(), 400, "malformed JSON"));
    };

    let name = msg.payload.get("command").and_then(|v| v.as_str());
    if !name.is_some_and(|name| WsCommand::NAMES.iter().any(|known| *known == name)) {
        return Err(WsMessage::error(msg.id, 404, "unknown command"));
    }

    match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => Ok((msg.id, command)),
        Err(err) => Err(WsMessage::error(
            msg.id,
            400,
            &format!("invalid command arguments: {err}"),
        )),
    }
}

/// Executes a parsed command and returns the reply.
pub async fn execute_command(
    id: String,
    command: WsCommand,
    subs: &mut SubscriptionManager,
    state: &AppState,
) -> WsMessage {
    match command {
        WsCommand::Subscribe { topics } => {
            subs.subscribe(&topics);
            WsMessage::response(id, serde_json::json!({ "topics": subs.topics() }))
        }
        WsCommand::Unsubscribe { topics } => {
            subs.unsubscribe(&topics);
            WsMessage::response(id, serde_json::json!({ "topics": subs.topics() }))
        }
        WsCommand::Probe { server_url } => {
            let address = match server_url {
                Some(raw) => ServerAddress::new(raw),
                None => state.settings.address().await,
            };
            let snapshot = state.probe_service.start_probe(&address).await;
            WsMessage::response(id, probe_state_payload(&snapshot))
        }
        WsCommand::Celebrate => {
            state.celebration.trigger(CelebrationReason::Manual);
            WsMessage::response(
                id,
                serde_json::json!({
                    "active": state.celebration.is_active(),
                    "duration_ms": state.celebration.duration().as_millis() as u64,
                }),
            )
        }
        WsCommand::GetState => {
            WsMessage::response(id, probe_state_payload(&state.probe_service.current()))
        }
    }
}

fn probe_state_payload(snapshot: &ProbeSnapshot) -> serde_json::Value {
    serde_json::json!({
        "event_type": "probe_state",
        "probe": ProbeResponse::from(snapshot),
    })
}
