use std::future::Future;

/// Signed-in user as seen by the billing API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    /// Forwarded upstream as the session credential
    pub access_token: String,
}

/// Source of the current user, if any.
///
/// `None` is the anonymous case, never an error.
pub trait IdentityProvider {
    fn current_identity(&self) -> impl Future<Output = Option<UserIdentity>> + Send;
}

impl IdentityProvider for UserIdentity {
    async fn current_identity(&self) -> Option<UserIdentity> {
        Some(self.clone())
    }
}

impl IdentityProvider for Option<UserIdentity> {
    async fn current_identity(&self) -> Option<UserIdentity> {
        self.clone()
    }
}
