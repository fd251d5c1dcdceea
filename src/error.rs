//! Error type shared by every lolikit command.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("could not serialize settings: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(
        "abort: This command should run within a loli directory.\n  \
         Which defined by a \".loli\" folder in project root dir.\n  \
         If no exists yet, you may want to create a empty one."
    )]
    NoProject,

    /// The external program could not be launched.
    #[error("\"{0}\" not found")]
    OpenerNotFound(String),

    #[error("invalid opener command: {0}")]
    InvalidOpener(String),

    #[error("{0}")]
    Message(String),
}

impl From<dialoguer::Error> for LoliError {
    fn from(err: dialoguer::Error) -> Self {
        LoliError::Io(std::io::Error::other(err))
    }
}

impl From<String> for LoliError {
    fn from(msg: String) -> Self {
        LoliError::Message(msg)
    }
}

impl From<&str> for LoliError {
    fn from(msg: &str) -> Self {
        LoliError::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoliError>;
