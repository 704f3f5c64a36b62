use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GardenError {
    /// The catalog has no kind with this name.
    #[error("Unknown plant type: {0}")]
    InvalidArgument(String),
}
