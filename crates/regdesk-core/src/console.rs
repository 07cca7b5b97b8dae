//! Console authentication session.
//!
//! The console is gated by a static operator credential pair; there is no
//! server-side account system. The session is an explicit object handed to
//! whatever surface drives the console, initialized at login and torn down
//! at logout.

use serde::{Deserialize, Serialize};

/// Operator credentials the console accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The built-in operator account.
    pub fn operator_default() -> Self {
        Self::new("admin", "admin")
    }
}

/// Authentication state for one console session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleSession {
    authenticated: bool,
}

impl ConsoleSession {
    /// Fresh, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt login; the flag is only set on a credential match.
    pub fn login(&mut self, expected: &Credentials, username: &str, password: &str) -> bool {
        self.authenticated = expected.username == username && expected.password == password;
        self.authenticated
    }

    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Tear the session down.
    pub fn logout(&mut self) {
        self.authenticated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_with_matching_credentials() {
        let mut session = ConsoleSession::new();
        assert!(!session.is_authenticated());

        assert!(session.login(&Credentials::operator_default(), "admin", "admin"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_login_rejects_wrong_credentials() {
        let mut session = ConsoleSession::new();
        assert!(!session.login(&Credentials::operator_default(), "admin", "hunter2"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_failed_login_clears_prior_session() {
        let mut session = ConsoleSession::new();
        session.login(&Credentials::operator_default(), "admin", "admin");
        session.login(&Credentials::operator_default(), "admin", "wrong");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout() {
        let mut session = ConsoleSession::new();
        session.login(&Credentials::operator_default(), "admin", "admin");
        session.logout();
        assert!(!session.is_authenticated());
    }
}
