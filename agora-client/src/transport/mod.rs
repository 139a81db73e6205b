mod media_transport;
mod transport_event;

pub use media_transport::*;
pub use transport_event::*;
