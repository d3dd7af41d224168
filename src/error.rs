use thiserror::Error;

/// Client-side error taxonomy shared by the gateway, the session, and the
/// resource stores.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The login endpoint rejected the credentials.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Transport-level failure before any HTTP status was received.
    #[error("Network failure: {0}")]
    Network(String),

    /// A 401 outside the post-login grace period forced the session down.
    #[error("Session expired")]
    SessionExpired,

    /// Any other HTTP error, passed through unchanged.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response payload: {0}")]
    Payload(String),

    /// Request rejected client-side before it was sent.
    #[error("{0}")]
    InvalidInput(String),
}
