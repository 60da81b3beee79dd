//! Session and data controller
//!
//! The controller is the only place that talks to the [`Backend`]. It owns
//! the [`AppState`], applies the outcome of every call through the reducer,
//! and tells its subscriber after each change.
//!
//! Reads follow writes: after any mutation the affected lists are fetched
//! again and replaced wholesale, so the views never show a local edit the
//! backend has not confirmed. Audit writes are best-effort; a failed one is
//! logged and otherwise ignored.

use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use futures::future::{Either, select};
use futures::pin_mut;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::audit::{self, NewAuditEntry};
use crate::backend::{Backend, BackendError, BackendResult, Query, SortOrder, Table};
use crate::config::Timeouts;
use crate::form::{SaveRequest, SaveTarget};
use crate::state::{AppState, StateEvent};
use crate::{AuditLogEntry, Client, ClientComment, ClientRecord, NewClientComment, Session, User};

/// Source of sleeps for bounding backend calls.
pub trait Timer {
    type Sleep: Future<Output = ()>;

    fn sleep(&self, duration: Duration) -> Self::Sleep;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

type Subscriber = Box<dyn Fn(&AppState)>;

pub struct Controller<B, T> {
    backend: B,
    timer: T,
    timeouts: Timeouts,
    state: RefCell<AppState>,
    subscriber: RefCell<Option<Subscriber>>,
}

impl<B: Backend, T: Timer> Controller<B, T> {
    pub fn new(backend: B, timer: T, timeouts: Timeouts) -> Self {
        Self {
            backend,
            timer,
            timeouts,
            state: RefCell::new(AppState::default()),
            subscriber: RefCell::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Registers the single listener called after every state change.
    pub fn subscribe(&self, subscriber: impl Fn(&AppState) + 'static) {
        *self.subscriber.borrow_mut() = Some(Box::new(subscriber));
    }

    pub fn unsubscribe(&self) {
        self.subscriber.borrow_mut().take();
    }

    fn dispatch(&self, event: StateEvent) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.apply(event);
            state.clone()
        };
        if let Some(subscriber) = self.subscriber.borrow().as_ref() {
            subscriber(&snapshot);
        }
    }

    fn fail(&self, message: String) {
        self.dispatch(StateEvent::Failed(message));
    }

    fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    async fn bounded<F, R>(&self, call: F, limit: Duration, what: &'static str) -> BackendResult<R>
    where
        F: Future<Output = BackendResult<R>>,
    {
        let sleep = self.timer.sleep(limit);
        pin_mut!(call);
        pin_mut!(sleep);
        match select(call, sleep).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(BackendError::Timeout(what)),
        }
    }

    /// Looks up an existing session and loads data when one is found.
    pub async fn check_session(&self) {
        info!("checking current session");
        self.dispatch(StateEvent::SessionCheckStarted);

        let lookup = self
            .bounded(
                self.backend.get_session(),
                self.timeouts.session_check,
                "Session check",
            )
            .await;

        match lookup {
            Ok(Some(session)) => self.establish(session).await,
            Ok(None) => {
                info!("no active session");
                self.dispatch(StateEvent::SignedOut);
            }
            Err(BackendError::Timeout(_)) => {
                warn!("session check timed out");
                self.dispatch(StateEvent::SessionTimedOut);
            }
            Err(err) if err.is_session_expired() => self.expire_session(&err).await,
            Err(err) => {
                error!(error = %err, "session check failed");
                self.dispatch(StateEvent::SessionCheckFailed(err.to_string()));
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ControllerError> {
        info!("attempting sign in");
        let attempt = self
            .bounded(
                self.backend.sign_in(email.trim(), password),
                self.timeouts.sign_in,
                "Sign in",
            )
            .await;

        match attempt {
            Ok(session) => {
                self.establish(session).await;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "sign in failed");
                self.fail(format!("Sign in failed: {}", err));
                Err(err.into())
            }
        }
    }

    pub async fn sign_out(&self) {
        info!("signing out");
        if let Err(err) = self.backend.sign_out().await {
            error!(error = %err, "sign out failed");
        }
        self.dispatch(StateEvent::SignedOut);
    }

    /// Handles a session change reported by the backend, e.g. a sign-in or
    /// sign-out in another tab.
    pub async fn on_session_change(&self, session: Option<Session>) {
        match session {
            Some(session) => {
                let same_user = self.current_user().is_some_and(|u| u.id == session.user.id);
                if !same_user {
                    self.establish(session).await;
                }
            }
            None => self.dispatch(StateEvent::SignedOut),
        }
    }

    /// Drops a session whose token the backend no longer accepts.
    async fn expire_session(&self, err: &BackendError) {
        warn!(error = %err, "session expired");
        if let Err(err) = self.backend.sign_out().await {
            warn!(error = %err, "failed to clear expired session");
        }
        self.dispatch(StateEvent::SessionExpired);
    }

    /// Puts a failed call in the error slot, or signs out when the failure
    /// was a rejected token.
    async fn report_failure(&self, what: &str, err: &BackendError) {
        if err.is_session_expired() {
            self.expire_session(err).await;
        } else {
            self.fail(format!("{}: {}", what, err));
        }
    }

    async fn establish(&self, session: Session) {
        info!(user_id = %session.user.id, "session established");
        self.dispatch(StateEvent::SignedIn(session.user));
        self.load_data().await;
    }

    pub async fn load_data(&self) {
        futures::join!(self.refresh_clients(), self.refresh_audit_log());
    }

    async fn fetch<R: DeserializeOwned>(&self, table: Table, query: Query, what: &'static str) -> BackendResult<Vec<R>> {
        let rows = self
            .bounded(self.backend.select(table, &query), self.timeouts.query, what)
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(BackendError::from))
            .collect()
    }

    async fn report_fetch_error(&self, table: Table, label: &str, err: BackendError) {
        if err.is_missing_table() {
            warn!(table = table.as_str(), error = %err, "table is not provisioned yet");
            return;
        }
        error!(table = table.as_str(), error = %err, "fetch failed");
        self.report_failure(&format!("Failed to load {}", label), &err)
            .await;
    }

    pub async fn refresh_clients(&self) {
        match self
            .fetch::<Client>(Table::Clients, Query::newest_first(), "Clients query")
            .await
        {
            Ok(clients) => {
                info!(count = clients.len(), "loaded clients");
                self.dispatch(StateEvent::ClientsLoaded(clients));
            }
            Err(err) => {
                self.report_fetch_error(Table::Clients, "clients", err)
                    .await
            }
        }
    }

    pub async fn refresh_audit_log(&self) {
        match self
            .fetch::<AuditLogEntry>(Table::AuditLog, Query::newest_first(), "Audit log query")
            .await
        {
            Ok(entries) => {
                info!(count = entries.len(), "loaded audit log entries");
                self.dispatch(StateEvent::AuditLogLoaded(entries));
            }
            Err(err) => {
                self.report_fetch_error(Table::AuditLog, "audit log", err)
                    .await
            }
        }
    }

    /// Comment thread for one client, oldest first. Failures yield an empty
    /// thread.
    pub async fn load_comments(&self, client_id: &str) -> Vec<ClientComment> {
        let query = Query::new()
            .eq("client_id", client_id)
            .order_by("created_at", SortOrder::Ascending);
        match self
            .fetch::<ClientComment>(Table::ClientComments, query, "Comments query")
            .await
        {
            Ok(comments) => {
                info!(client_id, count = comments.len(), "loaded comments");
                comments
            }
            Err(err) => {
                error!(client_id, error = %err, "failed to load comments");
                if err.is_session_expired() {
                    self.expire_session(&err).await;
                }
                Vec::new()
            }
        }
    }

    fn require_user(&self) -> Result<User, ControllerError> {
        self.current_user().ok_or_else(|| {
            self.fail(ControllerError::NotAuthenticated.to_string());
            ControllerError::NotAuthenticated
        })
    }

    async fn record_audit(&self, entry: NewAuditEntry) {
        let action = entry.action.clone();
        let written = match serde_json::to_value(&entry) {
            Ok(row) => self.backend.insert(Table::AuditLog, row).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = written {
            warn!(action = action.as_str(), error = %err, "audit log write failed");
        }
    }

    pub async fn save_client(&self, request: SaveRequest) -> Result<(), ControllerError> {
        let user = self.require_user()?;
        info!(name = %request.name, new = request.target.is_new(), "saving client");

        let now = Utc::now();
        let mut record = ClientRecord {
            name: request.name.clone(),
            status: request.status.clone(),
            sso_systems: request.sso_systems.clone(),
            hr_integrations: request.hr_integrations.clone(),
            tenants: request.tenants.clone(),
            tmcs: request.tmcs.clone(),
            notes: request.notes.clone(),
            comments: request.comments.clone(),
            user_id: user.id.clone(),
            created_at: None,
            updated_at: now,
        };

        let written: BackendResult<Option<String>> = match &request.target {
            SaveTarget::Existing(id) => match serde_json::to_value(&record) {
                Ok(patch) => self
                    .backend
                    .update(Table::Clients, id, patch)
                    .await
                    .map(|_| Some(id.clone())),
                Err(err) => Err(err.into()),
            },
            SaveTarget::New => {
                record.created_at = Some(now);
                match serde_json::to_value(&record) {
                    Ok(row) => self
                        .backend
                        .insert(Table::Clients, row)
                        .await
                        .map(|stored| inserted_id(&stored)),
                    Err(err) => Err(err.into()),
                }
            }
        };

        let client_id = match written {
            Ok(id) => id,
            Err(err) => {
                error!(error = %err, "failed to save client");
                self.report_failure("Failed to save client", &err).await;
                return Err(err.into());
            }
        };
        info!(client_id = client_id.as_deref().unwrap_or(""), "client saved");

        self.record_audit(audit::client_saved(&request, client_id, &user, now))
            .await;
        self.load_data().await;
        Ok(())
    }

    pub async fn delete_client(&self, client_id: &str) -> Result<(), ControllerError> {
        let user = self.require_user()?;
        let removed = self.state.borrow().client(client_id).cloned();
        info!(client_id, "deleting client");

        // Written first so the summary still describes a row that exists.
        self.record_audit(audit::client_deleted(client_id, removed.as_ref(), &user, Utc::now()))
            .await;

        if let Err(err) = self.backend.delete(Table::Clients, client_id).await {
            error!(client_id, error = %err, "failed to delete client");
            self.report_failure("Failed to delete client", &err).await;
            return Err(err.into());
        }

        info!(client_id, "client deleted");
        self.load_data().await;
        Ok(())
    }

    /// Appends to a client's comment thread. Blank text does nothing.
    pub async fn add_comment(&self, client_id: &str, text: &str) -> Result<(), ControllerError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let user = self.require_user()?;
        info!(client_id, "adding comment");

        let now = Utc::now();
        let comment = NewClientComment {
            client_id: client_id.to_string(),
            comment: text.to_string(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            created_at: now,
        };
        let written = match serde_json::to_value(&comment) {
            Ok(row) => self.backend.insert(Table::ClientComments, row).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = written {
            error!(client_id, error = %err, "failed to add comment");
            self.report_failure("Failed to add comment", &err).await;
            return Err(err.into());
        }

        self.record_audit(audit::comment_added(client_id, text, &user, now))
            .await;
        self.refresh_audit_log().await;
        Ok(())
    }

    pub fn dismiss_error(&self) {
        self.dispatch(StateEvent::ErrorDismissed);
    }
}

fn inserted_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::state::{
        SESSION_CHECK_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE, SESSION_TIMEOUT_MESSAGE, SessionState,
    };
    use crate::{AuditAction, ClientDraft, Tag};
    use serde_json::json;
    use std::rc::Rc;

    struct TokioTimer;

    impl Timer for TokioTimer {
        type Sleep = tokio::time::Sleep;

        fn sleep(&self, duration: Duration) -> Self::Sleep {
            tokio::time::sleep(duration)
        }
    }

    const EMAIL: &str = "ops@example.com";

    fn controller(backend: &MemoryBackend) -> Controller<MemoryBackend, TokioTimer> {
        Controller::new(backend.clone(), TokioTimer, Timeouts::default())
    }

    async fn signed_in(backend: &MemoryBackend) -> Controller<MemoryBackend, TokioTimer> {
        let controller = controller(backend);
        controller.sign_in(EMAIL, "hunter2").await.unwrap();
        controller
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_account(EMAIL, "hunter2")
    }

    fn draft(name: &str) -> ClientDraft {
        ClientDraft {
            name: name.to_string(),
            ..ClientDraft::default()
        }
    }

    fn audit_actions(backend: &MemoryBackend) -> Vec<String> {
        backend
            .rows(Table::AuditLog)
            .iter()
            .map(|row| row["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_check_session_without_session() {
        let backend = backend();
        let controller = controller(&backend);
        controller.check_session().await;
        assert_eq!(controller.state().session, SessionState::Unauthenticated);
        assert_eq!(controller.state().error, None);
    }

    #[tokio::test]
    async fn test_check_session_loads_data() {
        let backend = backend().signed_in_as(EMAIL);
        backend.seed(Table::Clients, vec![json!({ "name": "Acme", "status": "Active" })]);
        let controller = controller(&backend);

        controller.check_session().await;
        let state = controller.state();
        assert_eq!(state.user().map(|u| u.email.as_str()), Some(EMAIL));
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.clients[0].tmcs, Vec::<Tag>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_session_times_out() {
        let backend = backend();
        backend.hang_session();
        let controller = controller(&backend);

        controller.check_session().await;
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(state.error.as_deref(), Some(SESSION_TIMEOUT_MESSAGE));
    }

    #[tokio::test]
    async fn test_check_session_backend_failure() {
        let backend = backend();
        backend.fail_session(BackendError::Network("connection refused".to_string()));
        let controller = controller(&backend);

        controller.check_session().await;
        let state = controller.state();
        assert!(matches!(state.session, SessionState::Failed(_)));
        assert_eq!(state.error.as_deref(), Some(SESSION_CHECK_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_check_session_with_rejected_token() {
        let backend = backend().signed_in_as(EMAIL);
        backend.fail_session(BackendError::Http {
            status: 403,
            code: Some("bad_jwt".to_string()),
            message: "invalid JWT: token is expired".to_string(),
        });
        let controller = controller(&backend);

        controller.check_session().await;
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_times_out() {
        let backend = backend();
        backend.hang_sign_in();
        let controller = controller(&backend);

        let result = controller.sign_in(EMAIL, "hunter2").await;
        assert_eq!(
            result,
            Err(ControllerError::Backend(BackendError::Timeout("Sign in")))
        );
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(state.error.as_deref(), Some("Sign in failed: Sign in timeout"));
    }

    #[tokio::test]
    async fn test_bad_credentials_surface_message() {
        let backend = backend();
        let controller = controller(&backend);

        let result = controller.sign_in(EMAIL, "wrong").await;
        assert!(result.is_err());
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(
            state.error.as_deref(),
            Some("Sign in failed: Invalid login credentials")
        );

        controller.dismiss_error();
        assert_eq!(controller.state().error, None);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let backend = backend();
        let controller = controller(&backend);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        controller.subscribe(move |state| sink.borrow_mut().push(state.session.clone()));

        controller.sign_in(EMAIL, "hunter2").await.unwrap();
        assert!(matches!(
            seen.borrow().first(),
            Some(SessionState::Authenticated(_))
        ));
    }

    #[tokio::test]
    async fn test_save_new_client_refetches_and_audits() {
        let backend = backend();
        let controller = signed_in(&backend).await;

        let mut draft = draft("  Acme Travel ");
        draft.tmcs = vec![Tag::new("Concur")];
        let request = draft.submit(SaveTarget::New).unwrap();
        controller.save_client(request).await.unwrap();

        let state = controller.state();
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.clients[0].name, "Acme Travel");
        assert_eq!(state.clients[0].tmcs, vec![Tag::new("Concur")]);
        assert!(state.clients[0].created_at.is_some());

        assert_eq!(state.audit_log.len(), 1);
        assert_eq!(state.audit_log[0].action, AuditAction::ClientCreated);
        assert_eq!(state.audit_log[0].client_id.as_deref(), Some(state.clients[0].id.as_str()));
    }

    #[tokio::test]
    async fn test_update_existing_client() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        controller
            .save_client(draft("Acme").submit(SaveTarget::New).unwrap())
            .await
            .unwrap();
        let stored = controller.state().clients[0].clone();

        let mut edit = ClientDraft::from_client(&stored);
        edit.status = crate::ClientStatus::Active;
        controller
            .save_client(edit.submit(SaveTarget::for_client(Some(&stored))).unwrap())
            .await
            .unwrap();

        let state = controller.state();
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.clients[0].status, crate::ClientStatus::Active);
        assert!(audit_actions(&backend).contains(&"Client Updated".to_string()));
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_backend() {
        let backend = backend();
        let controller = signed_in(&backend).await;

        if let Ok(request) = draft("   ").submit(SaveTarget::New) {
            controller.save_client(request).await.unwrap();
        }
        assert!(backend.rows(Table::Clients).is_empty());
        assert!(backend.rows(Table::AuditLog).is_empty());
    }

    #[tokio::test]
    async fn test_save_requires_session() {
        let backend = backend();
        let controller = controller(&backend);
        let result = controller
            .save_client(draft("Acme").submit(SaveTarget::New).unwrap())
            .await;
        assert_eq!(result, Err(ControllerError::NotAuthenticated));
        assert_eq!(controller.state().error.as_deref(), Some("User not authenticated"));
        assert!(backend.rows(Table::Clients).is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_confirmed_view() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        backend.fail_table(
            Table::Clients,
            BackendError::Network("offline".to_string()),
        );

        let result = controller
            .save_client(draft("Acme").submit(SaveTarget::New).unwrap())
            .await;
        assert!(result.is_err());
        let state = controller.state();
        assert!(state.clients.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to save client: Network error: offline")
        );
        assert!(backend.rows(Table::AuditLog).is_empty());
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_save() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        backend.fail_inserts(
            Table::AuditLog,
            BackendError::Network("offline".to_string()),
        );

        controller
            .save_client(draft("Acme").submit(SaveTarget::New).unwrap())
            .await
            .unwrap();
        let state = controller.state();
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.error, None);
        assert!(backend.rows(Table::AuditLog).is_empty());
    }

    #[tokio::test]
    async fn test_delete_writes_one_audit_entry() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        let mut acme = draft("Acme");
        acme.sso_systems = vec![Tag::new("Okta")];
        controller
            .save_client(acme.submit(SaveTarget::New).unwrap())
            .await
            .unwrap();
        let id = controller.state().clients[0].id.clone();

        controller.delete_client(&id).await.unwrap();

        let deletions: Vec<_> = backend
            .rows(Table::AuditLog)
            .into_iter()
            .filter(|row| row["action"] == json!("Client Deleted"))
            .collect();
        assert_eq!(deletions.len(), 1);
        assert_eq!(deletions[0]["client_id"], json!(id));
        assert_eq!(
            deletions[0]["old_value"],
            json!("Acme - Status: Onboarding, SSO: Okta, TMCs: ")
        );

        let remaining = backend
            .select(Table::Clients, &Query::new().eq("id", id.as_str()))
            .await
            .unwrap();
        assert!(remaining.is_empty());
        assert!(controller.state().clients.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_still_audited() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        backend.seed(Table::Clients, vec![json!({ "id": "c1", "name": "Acme" })]);
        controller.refresh_clients().await;
        backend.fail_table(Table::Clients, BackendError::Network("offline".to_string()));

        assert!(controller.delete_client("c1").await.is_err());
        assert_eq!(audit_actions(&backend), vec!["Client Deleted".to_string()]);
        assert_eq!(controller.state().clients.len(), 1);
        assert!(controller.state().error.unwrap().starts_with("Failed to delete client"));
    }

    #[tokio::test]
    async fn test_comment_thread() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        backend.seed(Table::Clients, vec![json!({ "id": "c1", "name": "Acme" })]);

        controller.add_comment("c1", "  Kickoff booked ").await.unwrap();
        controller.add_comment("c1", "   ").await.unwrap();

        let thread = controller.load_comments("c1").await;
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].comment, "Kickoff booked");
        assert_eq!(thread[0].user_email, EMAIL);
        assert_eq!(audit_actions(&backend), vec!["Comment Added".to_string()]);
        assert_eq!(controller.state().audit_log.len(), 1);
        assert!(controller.load_comments("c2").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_is_not_surfaced() {
        let backend = backend();
        backend.fail_table(
            Table::AuditLog,
            BackendError::Http {
                status: 404,
                code: Some("42P01".to_string()),
                message: "relation \"public.audit_log\" does not exist".to_string(),
            },
        );
        let controller = signed_in(&backend).await;
        assert_eq!(controller.state().error, None);

        backend.fail_table(
            Table::Clients,
            BackendError::Http {
                status: 500,
                code: None,
                message: "boom".to_string(),
            },
        );
        controller.refresh_clients().await;
        assert_eq!(
            controller.state().error.as_deref(),
            Some("Failed to load clients: boom")
        );
    }

    #[tokio::test]
    async fn test_rejected_token_ends_session() {
        let backend = backend();
        backend.seed(Table::Clients, vec![json!({ "id": "c1", "name": "Acme" })]);
        let controller = signed_in(&backend).await;
        assert_eq!(controller.state().clients.len(), 1);

        backend.fail_table(
            Table::Clients,
            BackendError::Unauthorized("JWT expired".to_string()),
        );
        controller.refresh_clients().await;

        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert!(state.clients.is_empty());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(backend.get_session().await.unwrap().is_none());

        // The login form stays usable once the backend accepts tokens again
        backend.clear_failures();
        controller.sign_in(EMAIL, "hunter2").await.unwrap();
        let state = controller.state();
        assert!(state.user().is_some());
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_rejected_token_on_save_ends_session() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        backend.fail_table(
            Table::Clients,
            BackendError::Unauthorized("JWT expired".to_string()),
        );

        let result = controller
            .save_client(draft("Acme").submit(SaveTarget::New).unwrap())
            .await;
        assert!(result.is_err());
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(backend.rows(Table::AuditLog).is_empty());
    }

    #[tokio::test]
    async fn test_session_change_notifications() {
        let backend = backend();
        let controller = controller(&backend);
        backend.seed(Table::Clients, vec![json!({ "id": "c1", "name": "Acme" })]);

        let session = backend.sign_in(EMAIL, "hunter2").await.unwrap();
        controller.on_session_change(Some(session)).await;
        assert!(controller.state().user().is_some());
        assert_eq!(controller.state().clients.len(), 1);

        controller.on_session_change(None).await;
        let state = controller.state();
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert!(state.clients.is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_clears_state() {
        let backend = backend();
        let controller = signed_in(&backend).await;
        controller.sign_out().await;
        assert_eq!(controller.state().session, SessionState::Unauthenticated);
        assert!(backend.get_session().await.unwrap().is_none());
    }
}
