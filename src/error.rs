use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not resolve a writable application data directory")]
    DataDir,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database schema version {found} is newer than this build supports ({supported})")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to open url: {0}")]
    OpenFailed(String),

    #[error("another instance is already running")]
    AlreadyRunning,
}
