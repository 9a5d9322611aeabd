//! Error types for the eFD client.

/// Errors that can occur when talking to the eFD portal.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// The portal returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The session cookies were rejected, or the portal bounced the request
    /// back to the consent page.
    #[error("Authentication required: session is missing or expired")]
    AuthenticationRequired,
    /// The search endpoint answered, but with a `result` other than `"ok"`.
    #[error("Unexpected search result: {0}")]
    UnexpectedResult(String),
    /// A filing link points away from the portal; the session is never sent
    /// to another origin.
    #[error("Link is outside the portal: {0}")]
    ForeignLink(String),
}
