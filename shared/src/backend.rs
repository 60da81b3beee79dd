//! Contract with the hosted backend
//!
//! Authentication, row storage and querying all live on the other side of
//! this trait. The browser build talks to it over HTTP; tests use
//! [`crate::memory::MemoryBackend`].

use async_trait::async_trait;
use serde_json::Value;

use crate::Session;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Backend is not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("{0} timeout")]
    Timeout(&'static str),
    #[error("{0}")]
    Unauthorized(String),
}

impl BackendError {
    /// Whether the failure means the table has not been provisioned yet.
    pub fn is_missing_table(&self) -> bool {
        match self {
            BackendError::Http { code, message, .. } => {
                matches!(code.as_deref(), Some("42P01") | Some("PGRST205"))
                    || message.contains("relation")
            }
            _ => false,
        }
    }

    /// Whether the caller's token was rejected, meaning the session is gone.
    /// The auth service answers an expired token with 403 `bad_jwt`; the
    /// REST service uses `PGRST301`/`PGRST303`.
    pub fn is_session_expired(&self) -> bool {
        match self {
            BackendError::Unauthorized(_) => true,
            BackendError::Http { status, code, .. } => {
                *status == 401
                    || matches!(
                        code.as_deref(),
                        Some("bad_jwt") | Some("session_not_found") | Some("PGRST301") | Some("PGRST303")
                    )
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Clients,
    AuditLog,
    ClientComments,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Clients => "clients",
            Table::AuditLog => "audit_log",
            Table::ClientComments => "client_comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Equality filters plus an optional ordering column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, SortOrder)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    /// Newest rows first, the order every list view starts from.
    pub fn newest_first() -> Self {
        Self::new().order_by("created_at", SortOrder::Descending)
    }
}

#[async_trait(?Send)]
pub trait Backend {
    async fn get_session(&self) -> BackendResult<Option<Session>>;

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;

    async fn sign_out(&self) -> BackendResult<()>;

    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>>;

    /// Inserts one row and returns it as stored, including generated columns.
    async fn insert(&self, table: Table, row: Value) -> BackendResult<Value>;

    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()>;

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()>;
}
