mod config;
pub mod engine;
mod error;
mod events;
mod manager;
pub mod session;
pub mod transport;

pub use config::*;
pub use engine::{EngineEvent, PeerConnector, PeerLink, RtcConnector, RtcLink};
pub use error::*;
pub use events::*;
pub use manager::*;
pub use session::{ConnectionState, NegotiationSession, NegotiationState};
pub use transport::{SignalingChannel, TransportEvent};
