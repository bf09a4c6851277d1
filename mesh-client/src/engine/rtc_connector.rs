use anyhow::Result;
use async_trait::async_trait;
use mesh_core::{IceServerConfig, ParticipantId};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

use crate::engine::rtc_link::candidate_from_init;
use crate::engine::{EngineEvent, PeerConnector, RtcLink};
use crate::error::ClientError;
use crate::session::ConnectionState;

type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

struct ConnectorInner {
    api: API,
    ice_servers: Mutex<Vec<IceServerConfig>>,
    local_tracks: Mutex<Vec<LocalTrack>>,
    live: Mutex<Vec<Weak<RTCPeerConnection>>>,
}

/// Builds webrtc-rs peer connections sharing one media engine and one set of
/// local tracks.
#[derive(Clone)]
pub struct RtcConnector {
    inner: Arc<ConnectorInner>,
}

impl RtcConnector {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Result<Self, ClientError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()
            .map_err(|e| ClientError::Unsupported(e.to_string()))?;
        let registry = register_default_interceptors(Registry::new(), &mut m)
            .map_err(|e| ClientError::Unsupported(e.to_string()))?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self {
            inner: Arc::new(ConnectorInner {
                api,
                ice_servers: Mutex::new(ice_servers),
                local_tracks: Mutex::new(Vec::new()),
                live: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Attaches a local track to every future connection and to every live one.
    /// Live connections then ask for renegotiation through `NegotiationNeeded`.
    pub async fn add_local_track(&self, track: LocalTrack) -> Result<()> {
        self.inner.local_tracks.lock().await.push(track.clone());

        let mut live = self.inner.live.lock().await;
        live.retain(|pc| pc.strong_count() > 0);
        for pc in live.iter().filter_map(Weak::upgrade) {
            pc.add_track(track.clone()).await?;
        }
        Ok(())
    }

    async fn rtc_configuration(&self) -> RTCConfiguration {
        let ice_servers = self
            .inner
            .ice_servers
            .lock()
            .await
            .iter()
            .map(|s| RTCIceServer {
                urls: s.urls.clone(),
                username: s.username.clone().unwrap_or_default(),
                credential: s.credential.clone().unwrap_or_default(),
            })
            .collect();

        RTCConfiguration {
            ice_servers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PeerConnector for RtcConnector {
    type Link = RtcLink;

    async fn set_ice_servers(&self, servers: Vec<IceServerConfig>) {
        info!("Using {} ICE server entries", servers.len());
        *self.inner.ice_servers.lock().await = servers;
    }

    async fn connect(
        &self,
        remote: &ParticipantId,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<RtcLink> {
        let config = self.rtc_configuration().await;
        let peer_connection = Arc::new(self.inner.api.new_peer_connection(config).await?);

        let state_tx = events.clone();
        let uid_state = remote.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let uid = uid_state.clone();

                Box::pin(async move {
                    debug!("Peer connection state for {}: {:?}", uid, s);
                    let _ = tx.send(EngineEvent::StateChanged {
                        remote: uid,
                        state: map_state(s),
                    });
                })
            },
        ));

        let ice_tx = events.clone();
        let uid_ice = remote.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let uid = uid_ice.clone();

            Box::pin(async move {
                // None marks the end of gathering.
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        let _ = tx.send(EngineEvent::CandidateDiscovered {
                            remote: uid,
                            candidate: candidate_from_init(init),
                        });
                    }
                    Err(e) => warn!("Unserializable local candidate for {}: {}", uid, e),
                }
            })
        }));

        let neg_tx = events.clone();
        let uid_neg = remote.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = neg_tx.clone();
            let uid = uid_neg.clone();

            Box::pin(async move {
                let _ = tx.send(EngineEvent::NegotiationNeeded { remote: uid });
            })
        }));

        let track_tx = events;
        let uid_track = remote.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let uid = uid_track.clone();

                Box::pin(async move {
                    let _ = tx.send(EngineEvent::RemoteTrack {
                        remote: uid,
                        track_id: track.id(),
                        kind: track.kind().to_string(),
                    });
                })
            },
        ));

        for track in self.inner.local_tracks.lock().await.iter() {
            peer_connection.add_track(track.clone()).await?;
        }

        let mut live = self.inner.live.lock().await;
        live.retain(|pc| pc.strong_count() > 0);
        live.push(Arc::downgrade(&peer_connection));

        Ok(RtcLink {
            remote_id: remote.clone(),
            peer_connection,
        })
    }

    async fn stop_media(&self) {
        let dropped = std::mem::take(&mut *self.inner.local_tracks.lock().await);
        debug!("Released {} local tracks", dropped.len());
    }
}

fn map_state(s: RTCPeerConnectionState) -> ConnectionState {
    match s {
        RTCPeerConnectionState::Unspecified | RTCPeerConnectionState::New => ConnectionState::New,
        RTCPeerConnectionState::Connecting => ConnectionState::Connecting,
        RTCPeerConnectionState::Connected => ConnectionState::Connected,
        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
        RTCPeerConnectionState::Failed => ConnectionState::Failed,
        RTCPeerConnectionState::Closed => ConnectionState::Closed,
    }
}
