//! Request-scoped session credentials.

/// The csrf token and session id of an already-established portal session.
///
/// Acquiring these (accepting the consent statement in a browser) happens
/// outside this crate; the client only replays them on every request.
#[derive(Clone, Debug)]
pub struct Session {
    pub csrf_token: String,
    pub session_id: String,
}

impl Session {
    pub fn new(csrf_token: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            csrf_token: csrf_token.into(),
            session_id: session_id.into(),
        }
    }

    /// Returns `true` when either credential is blank.
    pub fn is_empty(&self) -> bool {
        self.csrf_token.trim().is_empty() || self.session_id.trim().is_empty()
    }

    /// Value for the `Cookie` header.
    pub fn cookie_header(&self) -> String {
        format!(
            "csrftoken={}; sessionid={}",
            self.csrf_token, self.session_id
        )
    }
}
