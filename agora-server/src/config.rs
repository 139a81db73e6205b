use agora_core::{DEFAULT_MAX_CAPACITY, DEFAULT_SPAWN_POSITION, Position};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_capacity: usize,
    /// Reject joins past `max_capacity` instead of only reporting them.
    pub enforce_capacity: bool,
    pub presence_interval: Duration,
    pub transcript_path: PathBuf,
    pub transcript_poll_interval: Duration,
    pub static_dir: Option<PathBuf>,
    pub spawn_position: Position,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = env::var("AGORA_BIND_ADDR")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(defaults.bind_addr);
        let max_capacity = env::var("AGORA_MAX_CAPACITY")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(defaults.max_capacity);
        let enforce_capacity = env::var("AGORA_ENFORCE_CAPACITY")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.enforce_capacity);
        let presence_interval = env::var("AGORA_PRESENCE_INTERVAL_MS")
            .ok()
            .and_then(|val| val.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.presence_interval);
        let transcript_path = env::var("AGORA_TRANSCRIPT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.transcript_path);
        let transcript_poll_interval = env::var("AGORA_TRANSCRIPT_POLL_MS")
            .ok()
            .and_then(|val| val.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.transcript_poll_interval);
        let static_dir = env::var("AGORA_STATIC_DIR").ok().map(PathBuf::from);

        Self {
            bind_addr,
            max_capacity,
            enforce_capacity,
            presence_interval,
            transcript_path,
            transcript_poll_interval,
            static_dir,
            spawn_position: defaults.spawn_position,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_capacity: DEFAULT_MAX_CAPACITY,
            enforce_capacity: false,
            presence_interval: Duration::from_millis(100),
            transcript_path: PathBuf::from("STT.txt"),
            transcript_poll_interval: Duration::from_millis(250),
            static_dir: None,
            spawn_position: DEFAULT_SPAWN_POSITION,
        }
    }
}
