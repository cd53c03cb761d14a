//! WebSocket handler
//!
//! Upgrades `/ws?token=...` connections, authenticating before the upgrade.
//! After the handshake the client speaks `ClientMessage` frames (`join` /
//! `leave`) and receives `GatewayEvent` frames for every room it has joined.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use rooms_core::{GatewayEvent, Snowflake};
use rooms_gateway::ClientMessage;

use crate::response::ApiError;
use crate::state::AppState;

/// Channel buffer size for outgoing events
const EVENT_BUFFER_SIZE: usize = 100;

/// Query parameters for the WebSocket upgrade
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

/// WebSocket upgrade handler
///
/// GET /ws?token=...
///
/// The token is validated before the upgrade; a bad token gets a plain 401
/// instead of a handshake.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let claims = state
        .jwt_service()
        .validate_token(&query.token)
        .map_err(|e| {
            tracing::warn!(error = %e, "WebSocket auth failed");
            ApiError::InvalidAuthFormat
        })?;
    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user ID in token");
        ApiError::InvalidAuthFormat
    })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, socket, user_id)))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: AppState, socket: WebSocket, user_id: Snowflake) {
    let session_id = Uuid::new_v4().to_string();

    let (tx, mut rx) = tokio::sync::mpsc::channel::<GatewayEvent>(EVENT_BUFFER_SIZE);
    state
        .connection_manager()
        .add_connection(session_id.clone(), user_id, tx);

    tracing::info!(session_id = %session_id, user_id = %user_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Forward gateway events to the socket
    let session_id_send = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::debug!(
                            session_id = %session_id_send,
                            "Failed to send event to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(session_id = %session_id_send, error = %e, "Failed to serialize event");
                }
            }
        }

        // Close the socket when the channel is closed
        let _ = ws_sink.close().await;
    });

    // Process client frames
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if handle_client_frame(&state_recv, &session_id_recv, user_id, &text)
                        .await
                        .is_err()
                    {
                        // Protocol error closes the connection
                        return;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary frames not supported"
                    );
                    return;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return;
                }
                Err(e) => {
                    tracing::debug!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    return;
                }
            }
        }
    });

    // Either direction ending tears the connection down
    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }

    state.connection_manager().remove_connection(&session_id).await;
    tracing::info!(session_id = %session_id, "WebSocket connection closed");
}

/// Handle one text frame from the client
///
/// `join` is honored only for existing groups the user belongs to; an
/// unauthorized join is silently ignored so probing for rooms reveals
/// nothing. An unparseable frame is a protocol error.
async fn handle_client_frame(
    state: &AppState,
    session_id: &str,
    user_id: Snowflake,
    text: &str,
) -> Result<(), ()> {
    let message = match ClientMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "Failed to parse client frame");
            return Err(());
        }
    };

    match message {
        ClientMessage::Join { group_id } => {
            if may_join(state, user_id, group_id).await {
                state.connection_manager().join_room(session_id, group_id).await;
                tracing::debug!(session_id = %session_id, group_id = %group_id, "Joined room");
            } else {
                tracing::debug!(
                    session_id = %session_id,
                    group_id = %group_id,
                    "Join refused"
                );
            }
        }
        ClientMessage::Leave { group_id } => {
            state.connection_manager().leave_room(session_id, group_id).await;
            tracing::debug!(session_id = %session_id, group_id = %group_id, "Left room");
        }
    }

    Ok(())
}

/// Check that the group exists and the user is authorized for it
async fn may_join(state: &AppState, user_id: Snowflake, group_id: Snowflake) -> bool {
    let ctx = state.service_context();

    let group = match ctx.group_repo().find_by_id(group_id).await {
        Ok(Some(group)) => group,
        Ok(None) => return false,
        Err(e) => {
            tracing::warn!(group_id = %group_id, error = %e, "Membership check failed");
            return false;
        }
    };

    if group.is_privileged(user_id) {
        return true;
    }
    if matches!(ctx.group_repo().is_member(group_id, user_id).await, Ok(true)) {
        return true;
    }
    matches!(ctx.user_repo().is_owner(user_id).await, Ok(true))
}
