//! Error type shared by the store backends and the dictionary facade.
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("store error: {0}")]
    Store(#[from] redb::Error),

    #[error("payload codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("fst error: {0}")]
    Fst(#[from] fst::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization failed: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("stored key is not valid UTF-8")]
    InvalidKey,

    #[error("fst artifacts disagree: {keys} keys but {payloads} payload lists")]
    ArtifactMismatch { keys: usize, payloads: usize },

    #[error("fst key points at missing payload {0}")]
    MissingPayload(u64),
}

pub type Result<T> = std::result::Result<T, Error>;

macro_rules! from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(e: $ty) -> Self {
                    Error::Store(e.into())
                }
            }
        )*
    };
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
