use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Token to identity resolution
pub trait AuthStore: Send + Sync {
    fn resolve_identity(&self, auth_token: &str) -> Option<String>;
    /// Issue a new token for `username`
    fn create_auth(&self, username: &str) -> String;
    fn delete_auth(&self, auth_token: &str) -> bool;
    fn clear(&self);
}

/// Tokens held in process memory
#[derive(Default)]
pub struct MemoryAuthStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStore for MemoryAuthStore {
    fn resolve_identity(&self, auth_token: &str) -> Option<String> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.get(auth_token).cloned()
    }

    fn create_auth(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(token.clone(), username.to_string());
        token
    }

    fn delete_auth(&self, auth_token: &str) -> bool {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.remove(auth_token).is_some()
    }

    fn clear(&self) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_resolve_until_deleted() {
        let auth = MemoryAuthStore::new();
        let token = auth.create_auth("alice");
        assert_eq!(auth.resolve_identity(&token).as_deref(), Some("alice"));
        assert!(auth.delete_auth(&token));
        assert!(!auth.delete_auth(&token));
        assert_eq!(auth.resolve_identity(&token), None);
    }

    #[test]
    fn each_login_gets_a_distinct_token() {
        let auth = MemoryAuthStore::new();
        let first = auth.create_auth("alice");
        let second = auth.create_auth("alice");
        assert_ne!(first, second);
        auth.clear();
        assert_eq!(auth.resolve_identity(&first), None);
        assert_eq!(auth.resolve_identity("nonsense"), None);
    }
}
