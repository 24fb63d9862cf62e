use thiserror::Error;

/// Errors raised while loading or resolving fonts.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid font data")]
    InvalidFont,

    #[error("no installed font matches families {0:?}")]
    FamilyNotFound(Vec<String>),
}

pub type Result<T> = std::result::Result<T, FontError>;
