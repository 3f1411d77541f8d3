use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pin number: {0}")]
    InvalidPin(String),

    #[error("Duplicate pin assignment: GPIO {pin} used for {first} and {second}")]
    DuplicatePin {
        pin: u8,
        first: String,
        second: String,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
