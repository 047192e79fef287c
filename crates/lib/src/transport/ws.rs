//! The persistent streaming surface.
//!
//! Each upgraded socket gets a random identity and joins the
//! connection registry; a dedicated task reads its messages. Every
//! successfully parsed message is tagged with the connection's
//! identity and enqueued for the state actor. Replies and broadcasts
//! come back through the [`Broadcaster`](crate::broadcast::Broadcaster)
//! asynchronously, never from the read loop itself.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tracing::{debug, error, info};

use crate::{
    protocol::Request,
    registry::{ConnectionId, ConnectionSink},
    transport::errors::TransportError,
};

use super::AppState;

pub(super) async fn upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| connection(socket, app))
}

/// Write half of one socket. The mutex makes broadcast writes from
/// notifier tasks safe against each other; failures surface to the
/// caller so the broadcaster can drop the connection.
struct SocketSink {
    writer: tokio::sync::Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl ConnectionSink for SocketSink {
    async fn send(&self, message: &str) -> crate::Result<()> {
        self.writer
            .lock()
            .await
            .send(Message::Text(message.into()))
            .await
            .map_err(|e| {
                TransportError::SocketSend {
                    reason: e.to_string(),
                }
                .into()
            })
    }

    async fn close(&self) {
        let _ = self.writer.lock().await.send(Message::Close(None)).await;
    }
}

async fn connection(socket: WebSocket, app: AppState) {
    let (writer, mut reader) = socket.split();
    let id = ConnectionId::generate();
    let sink: Arc<dyn ConnectionSink> = Arc::new(SocketSink {
        writer: tokio::sync::Mutex::new(writer),
    });
    app.registry.register(id.clone(), Arc::clone(&sink));
    info!(connection = %id, "streaming connection opened");

    while let Some(inbound) = reader.next().await {
        let message = match inbound {
            Ok(message) => message,
            Err(e) => {
                // Going-away closes arrive as Close frames; anything
                // surfacing here is an abnormal transport failure.
                error!(connection = %id, "socket read failed: {e}");
                break;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => {
                debug!(connection = %id, "peer closed");
                break;
            }
            // Pings and pongs are answered by axum; binary is ignored.
            _ => continue,
        };

        let mut request: Request = match serde_json::from_str(&text) {
            Ok(request) => request,
            Err(e) => {
                debug!(connection = %id, "unparseable message: {e}");
                if send_parse_error(sink.as_ref(), &e.to_string())
                    .await
                    .is_err()
                {
                    error!(connection = %id, "failed to report parse error");
                    break;
                }
                continue;
            }
        };

        request.originator = Some(id.clone());
        if app.state.submit(request).await.is_err() {
            // State actor is gone; nothing left to serve.
            break;
        }
    }

    app.registry.deregister(&id);
    info!(connection = %id, "streaming connection closed");
}

/// A message that never parsed has no request to complete, so the
/// error goes back bare, in the same shape completed requests use.
async fn send_parse_error(sink: &dyn ConnectionSink, error: &str) -> crate::Result<()> {
    let reply = serde_json::json!({ "error": error });
    sink.send(&reply.to_string()).await
}
