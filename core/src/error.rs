use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Please specify a delivery location first!")]
    MissingAddress,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Unknown menu item: {0}")]
    UnknownItem(String),

    #[error("Geolocation unavailable: {0}")]
    Geolocation(String),

    #[error("Model error: {0}")]
    Model(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Channel send error")]
    ChannelSend,
}

pub type Result<T> = std::result::Result<T, CampusError>;
