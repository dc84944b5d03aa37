use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Remote(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("connecting failed: {0}")]
pub struct ConnectError(#[from] pub ServiceError);

#[derive(Debug, Error, Clone, PartialEq)]
#[error("disconnecting failed: {0}")]
pub struct DisconnectError(#[from] pub ServiceError);

#[derive(Debug, Error, Clone, PartialEq)]
#[error("fetching mailboxes failed: {0}")]
pub struct FetchError(#[from] pub ServiceError);

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct MutationError(#[from] pub ServiceError);
