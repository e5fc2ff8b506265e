//! Admin bearer check

use crate::config::SecurityConfig;
use crate::infrastructure::crypto::constant_time_equal;

/// Gate for admin-only operations (key creation and administration).
///
/// An empty configured secret disables admin operations entirely.
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.admin_bearer.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Constant-time comparison of the presented bearer token.
    pub fn authorize(&self, bearer_token: Option<&str>) -> bool {
        match bearer_token {
            Some(token) if self.is_enabled() => constant_time_equal(token, &self.secret),
            _ => false,
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(secret: &str) -> AdminGate {
        AdminGate::new(&SecurityConfig {
            secret_key: "s".into(),
            key_pepper: "p".into(),
            admin_bearer: secret.into(),
        })
    }

    #[test]
    fn accepts_only_the_exact_secret() {
        let g = gate("admin-secret");
        assert!(g.authorize(Some("admin-secret")));
        assert!(!g.authorize(Some("admin-secreT")));
        assert!(!g.authorize(Some("admin-secret ")));
        assert!(!g.authorize(Some("")));
        assert!(!g.authorize(None));
    }

    #[test]
    fn empty_secret_disables_admin() {
        let g = gate("");
        assert!(!g.is_enabled());
        assert!(!g.authorize(Some("")));
        assert!(!g.authorize(None));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        assert!(!format!("{:?}", gate("hunter2")).contains("hunter2"));
    }
}
