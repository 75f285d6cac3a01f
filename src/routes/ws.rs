//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
  info!(target: "vocab_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(conn = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: AppState) {
  info!(target: "vocab_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "vocab_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => {
            debug!(target: "vocab_backend", payload = %trunc_for_log(&txt, 200), "WS invalid JSON");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "vocab_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "vocab_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let result = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,

    ClientWsMessage::Quiz => quiz_snapshot(state).await.map(|quiz| ServerWsMessage::Quiz { quiz }),

    ClientWsMessage::Answer { status, word_id } => submit_answer(state, status, word_id.as_deref())
      .await
      .map(|(outcome, quiz)| {
        info!(target: "quiz", word_id = %outcome.word_id, next = outcome.next_index, "WS answer applied");
        ServerWsMessage::Answered { outcome, quiz }
      }),

    ClientWsMessage::Reset => reset_all(state).await.map(|quiz| ServerWsMessage::Quiz { quiz }),

    ClientWsMessage::Dashboard => dashboard_stats(state).await.map(|stats| ServerWsMessage::Dashboard { stats }),
  };
  result.unwrap_or_else(|e| ServerWsMessage::Error { message: e.message().to_string() })
}
