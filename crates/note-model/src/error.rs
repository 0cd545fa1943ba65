use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid header alias table: {0}")]
    Lexicon(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, NoteError>;
