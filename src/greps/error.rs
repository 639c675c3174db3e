use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrepsError {
    #[error("Unknown Unicode character name: {0}")]
    UnknownCodepointName(String),

    #[error("Invalid regular expression: {0}")]
    Compile(String),

    #[error("No active match to replace. Use find next first.")]
    NoActiveMatch,

    #[error("Replacement failed: {0}")]
    Expansion(String),

    #[error("Text store error: {0}")]
    StoreIo(String),

    #[error("Pattern matching failed: {0}")]
    MatchFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl GrepsError {
    /// Errors the user can fix by editing the pattern or replacement text.
    ///
    /// The CLI renders these as warnings instead of failing the process.
    pub fn is_user_warning(&self) -> bool {
        matches!(
            self,
            GrepsError::UnknownCodepointName(_)
                | GrepsError::Compile(_)
                | GrepsError::NoActiveMatch
                | GrepsError::Expansion(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GrepsError>;
