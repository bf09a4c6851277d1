use crate::room::{Room, RoomCommand};
use crate::signaling::{SignalingOutput, SignalingService, health_handler, ws_handler};
use axum::Router;
use axum::routing::get;
use mesh_core::IceServerConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const ROOM_COMMAND_BUFFER: usize = 100;

/// Creates the signaling service and starts the single room loop behind it.
pub fn spawn_room(ice_servers: Vec<IceServerConfig>) -> (SignalingService, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<RoomCommand>(ROOM_COMMAND_BUFFER);
    let service = SignalingService::new(tx, ice_servers);
    let output: Arc<dyn SignalingOutput> = Arc::new(service.clone());

    let room = Room::new(rx, output);
    let handle = tokio::spawn(room.run());

    (service, handle)
}

pub fn build_router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(service)
}
