//! The opaque credential backend named in the interface contract:
//! `verify(accountId, password) -> bool`.

/// Pluggable authentication predicate consulted once per connection at the
/// `AwaitAuth` step.
pub trait Authenticator: Send + Sync {
    fn verify(&self, account_id: &str, password: &str) -> bool;

    /// The tenant id a successfully authenticated connection is scoped to.
    /// Defaults to the account id presented at auth time.
    fn tenant_for(&self, account_id: &str) -> String {
        account_id.to_string()
    }
}

/// Bypasses credential checking entirely. Activated by `AuthConfig
/// { disable_auth: true }` / `VERNIYMQ_AUTH_DISABLE_AUTH=true`.
pub struct DisabledAuthenticator;

impl Authenticator for DisabledAuthenticator {
    fn verify(&self, _account_id: &str, _password: &str) -> bool {
        true
    }

    fn tenant_for(&self, _account_id: &str) -> String {
        DISABLED_AUTH_TENANT_ID.to_string()
    }
}

/// The fixed test tenant id assumed for every connection while auth is
/// disabled, per the interface contract.
pub const DISABLED_AUTH_TENANT_ID: &str = "test-tenant";

/// A fixed-credential backend, useful for local development and the
/// integration test suite. Not intended for production use: an
/// implementer should back this with a secret-store interface instead.
pub struct StaticAuthenticator {
    account_id: String,
    password: String,
}

impl StaticAuthenticator {
    pub fn new(account_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            password: password.into(),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, account_id: &str, password: &str) -> bool {
        account_id == self.account_id && password == self.password
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
