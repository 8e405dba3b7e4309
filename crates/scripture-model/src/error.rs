use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown book: {0}")]
    UnknownBook(String),

    #[error("invalid reference '{0}': expected \"<book> <chapter>[:<verse>]\"")]
    InvalidReference(String),
}
