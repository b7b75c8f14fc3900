//! Local stand-ins for a remote voice server, shared by unit tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use tokio::net::TcpListener;

/// How the fake voice server treats each chat socket.
#[derive(Debug, Clone, Copy)]
pub(crate) enum VoiceServerBehaviour {
    /// Sends the readiness frame right away, then more traffic.
    Handshake,
    /// Sends the readiness frame after a delay.
    HandshakeAfter(Duration),
    /// Sends a frame with a non-zero first byte and stays open.
    WrongMarker,
    /// Accepts the socket and never sends anything.
    Silent,
    /// Sends a close frame right after the upgrade.
    CloseImmediately,
    /// Serves no chat route at all.
    NotFound,
}

/// Starts a fake voice server on an ephemeral local port.
#[allow(clippy::panic)]
pub(crate) async fn spawn_voice_server(behaviour: VoiceServerBehaviour) -> SocketAddr {
    let app = match behaviour {
        VoiceServerBehaviour::NotFound => Router::new(),
        _ => Router::new().route(
            "/api/chat",
            get(move |ws: WebSocketUpgrade| async move {
                ws.on_upgrade(move |socket| serve_chat_socket(socket, behaviour))
            }),
        ),
    };

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("fake voice server failed to bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("fake voice server has no local address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Returns a local address with nothing listening on it.
#[allow(clippy::panic)]
pub(crate) async fn unused_local_addr() -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind probe listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("probe listener has no local address");
    };
    drop(listener);
    addr
}

async fn serve_chat_socket(mut socket: WebSocket, behaviour: VoiceServerBehaviour) {
    match behaviour {
        VoiceServerBehaviour::Handshake => {
            let _ = socket.send(Message::Binary(vec![0x00, 0x01, 0x02].into())).await;
            let _ = socket.send(Message::Binary(vec![0x00].into())).await;
        }
        VoiceServerBehaviour::HandshakeAfter(delay) => {
            tokio::time::sleep(delay).await;
            let _ = socket.send(Message::Binary(vec![0x00].into())).await;
        }
        VoiceServerBehaviour::WrongMarker => {
            let _ = socket.send(Message::Binary(vec![0x01, 0x00].into())).await;
        }
        VoiceServerBehaviour::CloseImmediately => {
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
        VoiceServerBehaviour::Silent | VoiceServerBehaviour::NotFound => {}
    }
    while let Some(Ok(_)) = socket.recv().await {}
}
