mod error;
mod manager;
mod session;
mod transport;

pub use error::*;
pub use manager::*;
pub use session::*;
pub use transport::*;
