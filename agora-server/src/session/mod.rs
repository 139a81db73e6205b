mod capacity;
mod coordinator;
mod presence;
mod registry;
mod session_command;
mod session_handle;

pub use capacity::*;
pub use coordinator::*;
pub use presence::*;
pub use registry::*;
pub use session_command::*;
pub use session_handle::*;
