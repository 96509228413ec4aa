use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Price tick parse error: {0}")]
    Parse(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
