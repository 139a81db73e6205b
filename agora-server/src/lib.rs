mod config;
mod error;
mod router;
mod session;
mod signaling;
mod transcript;

pub use config::*;
pub use error::*;
pub use router::*;
pub use session::*;
pub use signaling::*;
pub use transcript::*;
