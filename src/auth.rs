//! Who is acting
//!
//! Identity is resolved by an injected provider rather than a global
//! session. The identity protocol itself lives outside this crate.

use crate::model::UserId;

/// Resolves the user on whose behalf an API call runs.
pub trait AuthProvider: Send + Sync {
    /// The acting user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<UserId>;
}

/// A provider bound to one fixed user (or to nobody).
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    pub fn user(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bind to `user` if given, trimming blanks away.
    pub fn from_option(user: Option<String>) -> Self {
        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(UserId::from);
        Self { user }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_user() {
        assert_eq!(StaticAuth::user("alice").current_user(), Some(UserId::from("alice")));
        assert_eq!(StaticAuth::anonymous().current_user(), None);
    }

    #[test]
    fn blank_user_is_anonymous() {
        assert_eq!(StaticAuth::from_option(Some("  ".into())).current_user(), None);
        assert_eq!(
            StaticAuth::from_option(Some(" bob ".into())).current_user(),
            Some(UserId::from("bob"))
        );
    }
}
