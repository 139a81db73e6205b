mod backend;
mod store;

pub use backend::*;
pub use store::*;
