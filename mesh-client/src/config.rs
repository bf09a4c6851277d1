use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "mesh-peer")]
#[command(about = "Joins the mesh call room and negotiates a direct session with every member")]
pub struct ClientConfig {
    /// Signaling endpoint
    #[arg(long, env = "MESH_SERVER_URL", default_value = "ws://127.0.0.1:3000/ws")]
    pub server_url: String,

    /// Name shown to the other participants
    #[arg(long, env = "MESH_DISPLAY_NAME", default_value = "guest")]
    pub display_name: String,

    /// Offer a (silent) Opus audio track so sessions carry a media section
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub audio: bool,
}
