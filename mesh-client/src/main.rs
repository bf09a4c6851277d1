use anyhow::{Context, Result};
use clap::Parser;
use mesh_client::{
    ClientCommand, ClientConfig, ClientError, PeerSessionManager, RtcConnector, SessionEvent,
    transport,
};
use mesh_core::utils::default_ice_servers;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use webrtc::api::media_engine::MIME_TYPE_OPUS;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClientConfig::parse();
    info!("Starting mesh-peer v{} as '{}'", env!("CARGO_PKG_VERSION"), config.display_name);

    // Checked before joining so an unsupported engine never takes a seat.
    let connector = RtcConnector::new(default_ice_servers())?;
    if config.audio {
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            "audio".to_owned(),
            "mesh-peer".to_owned(),
        ));
        connector
            .add_local_track(track)
            .await
            .context("failed to attach local audio")?;
    }

    let channel = transport::connect(&config.server_url).await?;
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            log_event(&event);
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ending call");
            let _ = command_tx.send(ClientCommand::EndCall);
        }
    });

    let manager = PeerSessionManager::new(
        connector,
        config.display_name,
        channel.outbound,
        events_tx,
    );
    match manager.run(channel.inbound, command_rx).await {
        Ok(()) => Ok(()),
        Err(ClientError::RoomFull(message)) => {
            warn!("{}", message);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::Welcomed { local_id } => info!("Joined as {}", local_id),
        SessionEvent::PeerJoined { id, display_name } => info!("{} ({}) is here", display_name, id),
        SessionEvent::PeerRenamed { id, display_name } => info!("{} is {}", id, display_name),
        SessionEvent::ConnectionStateChanged { id, state } => info!("{}: {:?}", id, state),
        SessionEvent::RemoteTrack { id, track_id, kind } => {
            info!("Receiving {} track {} from {}", kind, track_id, id)
        }
        SessionEvent::PeerLeft { id } => info!("{} left", id),
        SessionEvent::RoomFull { message } => warn!("{}", message),
        SessionEvent::ConnectionError { reason } => warn!("Connection error: {}", reason),
        SessionEvent::CallEnded => info!("Call ended"),
    }
}
