use std::error::Error as StdError;

/// Result type of signing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The endpoint is empty, malformed, or not an HTTP(S) URL.
    #[error("invalid request endpoint `{endpoint}`: {reason}")]
    EndpointInvalid {
        /// The rejected endpoint.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Required fields are empty.
    #[error("request validation failed, missing: {}", .missing.join(", "))]
    ValidationFailed {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },
    /// An operation ran in a state that does not allow it.
    #[error("signing precondition violated: {0}")]
    SigningPrecondition(&'static str),
    /// The request was changed after its protocol parameters were prepared.
    #[error("request already prepared; re-initialize it before changing it")]
    AlreadyPrepared,
}

/// Errors raised by [`OAuthManager`](crate::OAuthManager).
#[derive(Debug, thiserror::Error)]
pub enum ManagerError<E>
where
    E: StdError + 'static,
{
    /// The request could not be signed.
    #[error(transparent)]
    Request(#[from] Error),
    /// A produced header value was rejected.
    #[error("invalid header: {0}")]
    InvalidHeader(#[source] http::Error),
    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(#[source] E),
}
