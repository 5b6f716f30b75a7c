#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown uri: {0}")]
    UnknownKey(String),

    #[error("Corpus contains no webpages")]
    EmptyCorpus,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
