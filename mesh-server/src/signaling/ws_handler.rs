use crate::{RoomCommand, SignalingService};
use axum::Json;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use mesh_core::{ParticipantId, SignalMessage};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let participant_id = ParticipantId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, participant_id, service))
}

pub async fn health_handler(State(service): State<SignalingService>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "connections": service.connection_count(),
    }))
}

async fn handle_socket(socket: WebSocket, participant_id: ParticipantId, service: SignalingService) {
    info!("New WebSocket connection: {}", participant_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(participant_id.clone(), tx);
    service.send_signal(
        &participant_id,
        &SignalMessage::Welcome {
            id: participant_id.clone(),
        },
    );
    service.send_signal(
        &participant_id,
        &SignalMessage::IceConfig {
            ice_servers: service.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let participant_id = participant_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => {
                            let Some(cmd) = command_for(&participant_id, signal) else {
                                continue;
                            };
                            if let Err(e) = service.room_cmd_tx.send(cmd).await {
                                error!("Room died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid SignalMessage from {}: {:?}", participant_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(&participant_id);
    let _ = service
        .room_cmd_tx
        .send(RoomCommand::Leave {
            participant_id: participant_id.clone(),
        })
        .await;
    info!("WebSocket disconnected: {}", participant_id);
}

fn command_for(participant_id: &ParticipantId, signal: SignalMessage) -> Option<RoomCommand> {
    match signal.into_envelope() {
        Ok(envelope) => Some(RoomCommand::Forward {
            participant_id: participant_id.clone(),
            envelope,
        }),
        Err(SignalMessage::Join { display_name }) => {
            info!("{} wants to join as '{}'", participant_id, display_name);
            Some(RoomCommand::Join {
                participant_id: participant_id.clone(),
                display_name,
            })
        }
        Err(other) => {
            debug!("Ignoring unexpected {:?} from {}", other, participant_id);
            None
        }
    }
}
