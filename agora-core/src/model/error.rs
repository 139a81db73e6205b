use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid peer id: {0}")]
    InvalidPeerId(String),
}
