pub use agora_core::model::PeerId;

pub mod model {
    pub use agora_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use agora_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use agora_client::*;
}
