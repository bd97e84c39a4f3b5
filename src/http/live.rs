//! Live viewer channel over WebSocket.
//!
//! # Responsibilities
//! - Upgrade `GET /logs/ws` and register the viewer with the hub
//! - Drain the viewer's queue onto the socket, one bounded write at a time
//! - Read inbound frames only to notice the viewer going away
//!
//! # Connection States
//! ```text
//! Connecting ──upgrade ok──▶ Registered ──▶ Listening ──close/error──▶ Closed
//!     │                        (initial snapshot queued)
//!     └──upgrade failed──▶ logged, abandoned
//! ```
//!
//! # Design Decisions
//! - Writer and reader run as separate tasks; whichever ends first stops
//!   the other
//! - A write that exceeds the push timeout closes the viewer so one wedged
//!   socket cannot hold a queue open forever
//! - The read loop never touches the hub lock

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;

use crate::capture::CaptureHub;
use crate::http::server::AppState;

/// `GET /logs/ws`
pub async fn live_channel(
    State(state): State<AppState>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Live channel upgrade rejected");
            return rejection.into_response();
        }
    };

    let hub = state.hub.clone();
    let push_timeout = state.push_timeout;
    ws.on_failed_upgrade(|e| tracing::warn!(error = %e, "Live channel upgrade failed"))
        .on_upgrade(move |socket| serve_viewer(socket, hub, push_timeout))
}

async fn serve_viewer(socket: WebSocket, hub: CaptureHub, push_timeout: Duration) {
    let mut subscription = hub.subscribe();
    let id = subscription.id();
    tracing::info!(subscriber_id = %id, "Live viewer connected");

    let (mut sink, mut stream) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(payload) = subscription.recv().await {
            let message = Message::Text(payload.to_string().into());
            match tokio::time::timeout(push_timeout, sink.send(message)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(subscriber_id = %id, error = %e, "Push failed");
                    return;
                }
                Err(_) => {
                    tracing::warn!(subscriber_id = %id, timeout = ?push_timeout, "Push timed out");
                    return;
                }
            }
        }
        // Queue closed: the hub evicted this viewer.
        let _ = tokio::time::timeout(push_timeout, sink.close()).await;
    });

    let mut reader = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    hub.unsubscribe(id);
    tracing::info!(subscriber_id = %id, "Live viewer disconnected");
}
