//! A visibility toggle for the admin view.
//!
//! This is NOT access control. The state lives in client storage, where
//! anyone can edit it, and the default verifier compares against a pair of
//! strings known to the client. It only decides whether admin controls are
//! offered.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AccessDenied;
use crate::storage::{self, Storage};

/// The persisted shape of the gate.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct AccessState {
    pub authenticated: bool,
    pub admin: bool,
}

/// Decides which state a pair of credentials unlocks. Implement this to put a
/// real identity provider behind `AccessGate::login`.
pub trait CredentialVerifier {
    /// Returns the state to enter, or `None` if the credentials are rejected.
    fn verify(&self, username: &str, password: &str) -> Option<AccessState>;
}

/// Accepts exactly one username and password pair, granting admin.
#[derive(Clone)]
pub struct FixedCredentials {
    username: String,
    password: String,
}

pub struct AccessGate {
    storage: Rc<dyn Storage>,
    key: String,
    verifier: Box<dyn CredentialVerifier>,
    state: AccessState,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        FixedCredentials { username: username.into(), password: password.into() }
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<AccessState> {
        (username == self.username && password == self.password)
            .then_some(AccessState { authenticated: true, admin: true })
    }
}

impl AccessGate {
    pub fn open(
        storage: Rc<dyn Storage>,
        config: &Config,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Self {
        let state = load_state(storage.as_ref(), &config.auth_key);
        AccessGate { storage, key: config.auth_key.clone(), verifier, state }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    /// Admin only counts for an authenticated session.
    pub fn is_admin(&self) -> bool {
        self.state.authenticated && self.state.admin
    }

    /// Checks the credentials and, if accepted, enters and persists the state
    /// the verifier grants. A rejected attempt leaves the current state alone.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let Some(state) = self.verifier.verify(username, password) else {
            info!(username, "login rejected");
            return false;
        };
        self.state = state;
        if let Err(err) = storage::write_json(self.storage.as_ref(), &self.key, &state) {
            error!(key = %self.key, error = %err, "could not persist access state");
        }
        info!(username, admin = state.admin, "logged in");
        true
    }

    pub fn logout(&mut self) {
        self.state = AccessState::default();
        if let Err(err) = self.storage.remove(&self.key) {
            error!(key = %self.key, error = %err, "could not erase access state");
        }
        info!("logged out");
    }

    /// Guards the admin view.
    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }
}

fn load_state(storage: &dyn Storage, key: &str) -> AccessState {
    let Some(document) = storage::read_or_absent(storage, key) else {
        return AccessState::default();
    };
    match serde_json::from_str(&document) {
        Ok(state) => state,
        Err(err) => {
            warn!(key, error = %err, "stored access state is malformed, discarding it");
            storage::discard(storage, key);
            AccessState::default()
        }
    }
}
