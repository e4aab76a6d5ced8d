//! Scoped client state for one signed-in admin.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, info};

use crate::errors::{Error, Result};
use crate::investments::{CycleStore, InvestmentCycle};
use crate::users::User;

/// Opaque bearer token issued by the external auth provider.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token. Blank tokens are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Unauthenticated);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// State container created at startup and passed to whatever needs it.
///
/// Holds the token, the signed-in profile and the cycle cache. Signing out
/// wipes all three.
///
/// Every sign-in and sign-out starts a new generation. A listing fetched
/// under an older generation is never written to the cache.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<AccessToken>>,
    user: RwLock<Option<User>>,
    cycles: Arc<CycleStore>,
    generation: AtomicU64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, token: AccessToken, user: Option<User>) {
        if let Some(u) = &user {
            info!("Signed in as {}", u.display_name());
        } else {
            debug!("Signed in without a loaded profile");
        }
        let mut current = self.token.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(token);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }

    pub fn set_user(&self, user: User) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        {
            let mut current = self.token.write().unwrap_or_else(|e| e.into_inner());
            *current = None;
            self.generation.fetch_add(1, Ordering::SeqCst);
            *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
            self.cycles.clear();
        }
        info!("Signed out, session state cleared");
    }

    /// Token for the next gateway call.
    pub fn access_token(&self) -> Result<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(Error::Unauthenticated)
    }

    /// Token for the next gateway call plus the generation it belongs to.
    pub fn credentials(&self) -> Result<(AccessToken, u64)> {
        let current = self.token.read().unwrap_or_else(|e| e.into_inner());
        let token = current.clone().ok_or(Error::Unauthenticated)?;
        Ok((token, self.generation.load(Ordering::SeqCst)))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Replaces the cached cycles unless the session changed since
    /// `generation`. Returns whether the cache was written.
    pub fn store_cycles(&self, generation: u64, cycles: Vec<InvestmentCycle>) -> bool {
        // Held so a concurrent sign-in or sign-out cannot interleave.
        let _current = self.token.read().unwrap_or_else(|e| e.into_inner());
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.cycles.replace(cycles);
        true
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn cycles(&self) -> Arc<CycleStore> {
        Arc::clone(&self.cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(matches!(AccessToken::new("   "), Err(Error::Unauthenticated)));
        let token = AccessToken::new(" abc ").unwrap();
        assert_eq!(token.expose(), "abc");
        assert_eq!(token.bearer(), "Bearer abc");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("super-secret").unwrap();
        assert!(!format!("{:?}", token).contains("super-secret"));
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let session = Session::new();
        assert!(matches!(session.access_token(), Err(Error::Unauthenticated)));

        session.sign_in(AccessToken::new("t").unwrap(), None);
        assert!(session.is_signed_in());
        session.cycles().replace(Vec::new());
        assert_eq!(session.cycles().refresh_count(), 1);

        session.sign_out();
        assert!(!session.is_signed_in());
        assert!(session.user().is_none());
        assert_eq!(session.cycles().refresh_count(), 0);
    }

    #[test]
    fn test_listing_from_previous_generation_is_discarded() {
        let session = Session::new();
        session.sign_in(AccessToken::new("t").unwrap(), None);
        let (_, generation) = session.credentials().unwrap();

        assert!(session.store_cycles(generation, Vec::new()));
        assert_eq!(session.cycles().refresh_count(), 1);

        session.sign_out();
        assert!(!session.store_cycles(generation, Vec::new()));
        assert_eq!(session.cycles().refresh_count(), 0);

        session.sign_in(AccessToken::new("t2").unwrap(), None);
        assert!(!session.store_cycles(generation, Vec::new()));
        assert_ne!(session.generation(), generation);
        assert_eq!(session.cycles().refresh_count(), 0);
    }
}
