use thiserror::Error;

use crate::values::MotionTypeKey;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{property:?} animation requires a card-capable target")]
    NotCardCapable { property: MotionTypeKey },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
