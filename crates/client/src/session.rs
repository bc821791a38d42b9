//! Authenticated session state.

/// Bearer token plus authorization flag for one MEATER Cloud account.
///
/// Owned by a [`crate::MeaterClient`]; there is no process-wide session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user_id: Option<String>,
    authorized: bool,
}

impl Session {
    /// Session authorized with a token obtained elsewhere.
    /// The token is trusted as-is; the backend will reject it with 401 if stale.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id: None,
            authorized: true,
        }
    }

    pub(crate) fn from_login(token: String, user_id: Option<String>) -> Self {
        Self {
            token: Some(token),
            user_id,
            authorized: true,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// User id reported by the login response, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Token to attach to a request, only while authorized.
    pub(crate) fn bearer(&self) -> Option<&str> {
        if self.authorized { self.token() } else { None }
    }

    /// Drop the token and authorization flag.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}
