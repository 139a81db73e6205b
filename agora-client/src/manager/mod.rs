mod client_event;
mod connection_manager;
mod peer_link;

pub use client_event::*;
pub use connection_manager::*;
pub use peer_link::*;
