mod channel_hub;
mod relay;
mod ws_handler;

pub use channel_hub::*;
pub use relay::*;
pub use ws_handler::*;
