use clap::Parser;
use mesh_core::IceServerConfig;
use mesh_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(name = "mesh-server")]
#[command(about = "Signaling relay for a single six-seat mesh call room")]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    #[arg(long, env = "MESH_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// STUN servers handed to clients
    #[arg(
        long = "stun-url",
        env = "MESH_STUN_URLS",
        value_delimiter = ',',
        default_values_t = [DEFAULT_STUN_ADDR.to_string(), DEFAULT_STUN_ADDR_2.to_string()]
    )]
    pub stun_urls: Vec<String>,

    #[arg(long, env = "TURN_URL")]
    pub turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    pub turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL")]
    pub turn_credential: Option<String>,
}

impl ServerConfig {
    /// ICE servers announced to every client in `IceConfig`.
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        let mut servers = Vec::new();

        if !self.stun_urls.is_empty() {
            servers.push(IceServerConfig {
                urls: self.stun_urls.clone(),
                username: None,
                credential: None,
            });
        }

        if let Some(turn_url) = &self.turn_url {
            servers.push(IceServerConfig {
                urls: vec![turn_url.clone()],
                username: self.turn_username.clone(),
                credential: self.turn_credential.clone(),
            });
        }

        servers
    }
}
