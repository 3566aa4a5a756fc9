use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockerError {
    #[error("Position {index} is out of range for a collection of {len} boxes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot swap position {0} with itself")]
    SamePosition(usize),

    #[error("Drag event received without a drag in progress")]
    DegenerateDrag,

    #[error("Invalid box data: {0}")]
    InvalidBoxData(#[from] serde_json::Error),
}
