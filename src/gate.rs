//! Shared-passphrase access gate for the structured scan mode.
//!
//! The gate holds no state. [`Session`] carries the authenticated flag and
//! the code that unlocked it, so callers pass it explicitly and can persist
//! it as a URL query.

use url::form_urlencoded;

use crate::types::ScanMode;

/// Query parameter carrying the access code.
pub const CODE_PARAM: &str = "code";

/// Static passphrase check.
#[derive(Clone)]
pub struct AccessGate {
    passphrase: String,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Whether `code` matches the passphrase, ignoring case and surrounding
    /// whitespace.
    pub fn matches(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && code.to_lowercase() == self.passphrase.trim().to_lowercase()
    }

    /// Pure access predicate over the stored flag and a provided code.
    pub fn check(&self, stored: bool, provided: Option<&str>) -> bool {
        stored || provided.is_some_and(|code| self.matches(code))
    }
}

/// Per-user gate state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub access_code: Option<String>,
}

impl Session {
    /// Read the access code from a URL query string (with or without the
    /// leading `?`). The session is not authenticated until
    /// [`Session::unlock`] accepts the code.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let access_code = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == CODE_PARAM)
            .map(|(_, value)| value.into_owned());
        Self {
            authenticated: false,
            access_code,
        }
    }

    /// Check `provided` (or the code already carried by the session) and
    /// mark the session authenticated on success. Returns the new state.
    pub fn unlock(&mut self, gate: &AccessGate, provided: Option<&str>) -> bool {
        let candidate = provided.or(self.access_code.as_deref());
        if gate.check(self.authenticated, candidate) {
            if let Some(code) = candidate {
                self.access_code = Some(code.trim().to_string());
            }
            self.authenticated = true;
        }
        self.authenticated
    }

    /// Query string that restores this session on refresh, e.g.
    /// `code=open+sesame`. `None` until the session is authenticated.
    pub fn to_query(&self) -> Option<String> {
        if !self.authenticated {
            return None;
        }
        let code = self.access_code.as_deref()?;
        Some(
            form_urlencoded::Serializer::new(String::new())
                .append_pair(CODE_PARAM, code)
                .finish(),
        )
    }
}

/// Whether a scan may proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No gate applies: a line-based scan, or no passphrase configured.
    Open,
    /// The gate accepted the code. `resume` is the query to persist when a
    /// fresh code was supplied.
    Granted { resume: Option<String> },
    Denied,
}

/// Decide access for one scan.
///
/// Only structured scans are gated, and only when `passphrase` is set and
/// not blank. The code comes from `code` first, then from the saved
/// `session` query.
pub fn authorize(
    mode: ScanMode,
    passphrase: Option<&str>,
    session: Option<&str>,
    code: Option<&str>,
) -> Access {
    let passphrase = match passphrase.filter(|p| !p.trim().is_empty()) {
        Some(p) if mode == ScanMode::Structured => p,
        _ => return Access::Open,
    };

    let gate = AccessGate::new(passphrase);
    let mut state = session.map(Session::from_query).unwrap_or_default();
    if !state.unlock(&gate, code) {
        return Access::Denied;
    }

    Access::Granted {
        resume: code.and_then(|_| state.to_query()),
    }
}
