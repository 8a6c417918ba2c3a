use crate::models::SurfaceEvent;
use crate::state::SurfaceAppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

/// WebSocket handler streaming surface events to the page
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SurfaceAppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SurfaceAppState) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the initial snapshot so no change slips between them
    let mut events = state.event_bus.subscribe();
    tracing::debug!(
        clients = state.event_bus.subscriber_count(),
        "WebSocket client connected"
    );

    let initial = SurfaceEvent::StateChanged(state.controller.snapshot());
    if let Ok(msg) = serde_json::to_string(&initial) {
        if sender.send(Message::Text(msg)).await.is_err() {
            return;
        }
    }

    // Event forwarding task
    let store = state.store.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // Older snapshots are stale anyway; resync with the latest
                    tracing::debug!(skipped, "WebSocket client lagged, resyncing");
                    SurfaceEvent::StateChanged(store.snapshot())
                }
                Err(RecvError::Closed) => break,
            };

            match serde_json::to_string(&event) {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                }
            }
        }
    });

    // Receive task (handle client close/pings)
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                Message::Ping(data) => {
                    // Pong is handled automatically by axum
                    tracing::trace!("Received ping: {:?}", data);
                }
                Message::Text(text) => {
                    tracing::trace!("Ignoring client message: {}", text);
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            tracing::debug!("Receive task completed");
            send_task.abort();
        }
    }
}
