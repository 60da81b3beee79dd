//! Application state and its reducer
//!
//! [`AppState`] is only ever changed through [`AppState::apply`]. The
//! controller performs I/O and feeds the outcomes in as [`StateEvent`]s; the
//! views render snapshots.

use std::rc::Rc;

use crate::{AuditLogEntry, Client, User};

pub const SESSION_TIMEOUT_MESSAGE: &str = "Connection timeout - please try logging in";
pub const SESSION_CHECK_FAILED_MESSAGE: &str = "Authentication check failed - please try logging in";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired - please log in again";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Checking,
    Authenticated(User),
    Failed(String),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_checking(&self) -> bool {
        matches!(self, SessionState::Checking)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    SessionCheckStarted,
    SignedIn(User),
    SignedOut,
    SessionCheckFailed(String),
    SessionTimedOut,
    /// The backend rejected the token of an established session.
    SessionExpired,
    ClientsLoaded(Vec<Client>),
    AuditLogLoaded(Vec<AuditLogEntry>),
    Failed(String),
    ErrorDismissed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub session: SessionState,
    pub clients: Rc<Vec<Client>>,
    pub audit_log: Rc<Vec<AuditLogEntry>>,
    /// The single user-visible error slot.
    pub error: Option<String>,
}

impl AppState {
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    fn sign_out(&mut self) {
        self.session = SessionState::Unauthenticated;
        self.clients = Rc::default();
        self.audit_log = Rc::default();
    }

    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::SessionCheckStarted => {
                self.session = SessionState::Checking;
            }
            StateEvent::SignedIn(user) => {
                self.session = SessionState::Authenticated(user);
                self.error = None;
            }
            StateEvent::SignedOut => {
                self.sign_out();
                self.error = None;
            }
            StateEvent::SessionExpired => {
                self.sign_out();
                self.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
            }
            StateEvent::SessionCheckFailed(reason) => {
                self.session = SessionState::Failed(reason);
                self.error = Some(SESSION_CHECK_FAILED_MESSAGE.to_string());
            }
            StateEvent::SessionTimedOut => {
                self.session = SessionState::Unauthenticated;
                self.error = Some(SESSION_TIMEOUT_MESSAGE.to_string());
            }
            StateEvent::ClientsLoaded(clients) => {
                self.clients = Rc::new(clients);
            }
            StateEvent::AuditLogLoaded(entries) => {
                self.audit_log = Rc::new(entries);
            }
            StateEvent::Failed(message) => {
                self.error = Some(message);
            }
            StateEvent::ErrorDismissed => {
                self.error = None;
            }
        }
    }
}
