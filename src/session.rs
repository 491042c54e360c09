//! Current-user tracking for the surrounding app. The projection engine never
//! reads any of this; it only decides what the header shows.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no user is signed in")]
    NotSignedIn,
    #[error("identity id must not be empty")]
    EmptyIdentity,
}

type Callback = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<Identity>;

    /// Registers `callback` for identity changes. The callback stays live
    /// until the returned handle is dropped or unsubscribed.
    fn subscribe(&self, callback: Box<dyn Fn(Option<&Identity>) + Send + Sync>) -> Subscription;

    fn sign_in(&self, identity: Identity) -> Result<Identity, SessionError>;

    fn sign_out(&self) -> Result<(), SessionError>;
}

#[derive(Default)]
struct SessionState {
    user: Option<Identity>,
    callbacks: BTreeMap<u64, Callback>,
    next_id: u64,
}

impl SessionState {
    fn callbacks(&self) -> Vec<Callback> {
        self.callbacks.values().cloned().collect()
    }
}

#[derive(Default)]
pub struct InMemorySession {
    state: Arc<Mutex<SessionState>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }
}

impl SessionProvider for InMemorySession {
    fn current_user(&self) -> Option<Identity> {
        self.lock().user.clone()
    }

    fn subscribe(&self, callback: Box<dyn Fn(Option<&Identity>) + Send + Sync>) -> Subscription {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.callbacks.insert(id, Arc::from(callback));
        Subscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    fn sign_in(&self, identity: Identity) -> Result<Identity, SessionError> {
        let identity = Identity {
            id: identity.id.trim().to_string(),
            email: identity
                .email
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
        };
        if identity.id.is_empty() {
            return Err(SessionError::EmptyIdentity);
        }

        let callbacks = {
            let mut state = self.lock();
            state.user = Some(identity.clone());
            state.callbacks()
        };
        log::info!("session signed in as {}", identity.id);
        notify(&callbacks, Some(&identity));
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), SessionError> {
        // Check and clear under one lock.
        let (user, callbacks) = {
            let mut state = self.lock();
            let user = state.user.take().ok_or(SessionError::NotSignedIn)?;
            (user, state.callbacks())
        };
        log::info!("session for {} signed out", user.id);
        notify(&callbacks, None);
        Ok(())
    }
}

// Callbacks run without the lock so they may query or resubscribe.
fn notify(callbacks: &[Callback], user: Option<&Identity>) {
    for callback in callbacks {
        callback(user);
    }
}

/// Handle for a registered identity callback. Dropping it releases the
/// callback.
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<SessionState>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock_state(&state).callbacks.remove(&self.id);
        }
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    // Callbacks never run under the lock.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
