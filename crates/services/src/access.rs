//! Secret-based gating of the generator and the authorized-only features.

use crate::config::QuizConfig;

/// What the current operator may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    /// May generate problem sets.
    pub generator: bool,
    /// May see question ids, save results, view analytics and add questions.
    pub authorized: bool,
}

impl Access {
    /// Full access, for trusted local use and tests.
    #[must_use]
    pub fn full() -> Self {
        Self {
            generator: true,
            authorized: true,
        }
    }
}

/// Compares submitted secrets against the configured ones, exactly.
///
/// An unconfigured secret never matches.
#[derive(Clone, Default)]
pub struct AccessGate {
    access_key: Option<String>,
    password: Option<String>,
}

impl AccessGate {
    #[must_use]
    pub fn new(access_key: Option<String>, password: Option<String>) -> Self {
        let nonblank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Self {
            access_key: nonblank(access_key),
            password: nonblank(password),
        }
    }

    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.access_key.clone(), config.password.clone())
    }

    /// Set `access.generator` from the submitted key. Returns the new flag.
    pub fn unlock_generator(&self, access: &mut Access, key: &str) -> bool {
        access.generator = secret_matches(self.access_key.as_deref(), key);
        if !access.generator {
            tracing::warn!("generator access key rejected");
        }
        access.generator
    }

    /// Set `access.authorized` from the submitted password. Returns the new flag.
    pub fn authenticate(&self, access: &mut Access, password: &str) -> bool {
        access.authorized = secret_matches(self.password.as_deref(), password);
        if !access.authorized {
            tracing::warn!("password rejected");
        }
        access.authorized
    }
}

fn secret_matches(expected: Option<&str>, submitted: &str) -> bool {
    expected.is_some_and(|secret| secret == submitted)
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("access_key_set", &self.access_key.is_some())
            .field("password_set", &self.password.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(Some("key-123".into()), Some("pw".into()))
    }

    #[test]
    fn correct_secrets_grant_flags() {
        let mut access = Access::default();
        assert!(gate().unlock_generator(&mut access, "key-123"));
        assert!(gate().authenticate(&mut access, "pw"));
        assert_eq!(access, Access::full());
    }

    #[test]
    fn secrets_compare_exactly() {
        let gate = AccessGate::new(None, Some("pass phrase ".into()));
        let mut access = Access::default();
        assert!(gate.authenticate(&mut access, "pass phrase "));
        assert!(!gate.authenticate(&mut access, "pass phrase"));
        assert!(!gate.authenticate(&mut access, " pass phrase "));
    }

    #[test]
    fn wrong_secret_revokes_flag() {
        let mut access = Access::full();
        assert!(!gate().authenticate(&mut access, "nope"));
        assert!(access.generator);
        assert!(!access.authorized);
    }

    #[test]
    fn unconfigured_gate_never_unlocks() {
        let gate = AccessGate::new(None, Some("  ".into()));
        let mut access = Access::default();
        assert!(!gate.unlock_generator(&mut access, ""));
        assert!(!gate.authenticate(&mut access, ""));
        assert!(!gate.authenticate(&mut access, "  "));
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", gate());
        assert!(!rendered.contains("key-123"));
    }
}
