//! In-process stand-in for the hosted backend
//!
//! Rows live as JSON objects per table. Handy for tests and for running the
//! UI without a provisioned project. Failures can be injected per table and
//! the session lookup or a sign-in can be made to hang.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{Backend, BackendError, BackendResult, Query, SortOrder, Table};
use crate::{Session, User};

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<(String, String, User)>,
    session: Option<Session>,
    tables: HashMap<Table, Vec<Value>>,
    table_failures: HashMap<Table, BackendError>,
    insert_failures: HashMap<Table, BackendError>,
    session_failure: Option<BackendError>,
    hang_session: bool,
    hang_sign_in: bool,
}

/// Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        self.inner
            .borrow_mut()
            .accounts
            .push((email.to_string(), password.to_string(), user));
        self
    }

    /// Starts out signed in as the given account.
    pub fn signed_in_as(self, email: &str) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            let user = inner
                .accounts
                .iter()
                .find(|(account, _, _)| account == email)
                .map(|(_, _, user)| user.clone());
            inner.session = user.map(|user| Session {
                access_token: Uuid::new_v4().to_string(),
                refresh_token: None,
                user,
            });
        }
        self
    }

    pub fn seed(&self, table: Table, rows: Vec<Value>) {
        let mut inner = self.inner.borrow_mut();
        let stored = inner.tables.entry(table).or_default();
        for mut row in rows {
            assign_id(&mut row);
            stored.push(row);
        }
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.inner
            .borrow()
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Every operation on `table` fails with `error` until cleared.
    pub fn fail_table(&self, table: Table, error: BackendError) {
        self.inner.borrow_mut().table_failures.insert(table, error);
    }

    /// Only inserts into `table` fail.
    pub fn fail_inserts(&self, table: Table, error: BackendError) {
        self.inner.borrow_mut().insert_failures.insert(table, error);
    }

    pub fn clear_failures(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.table_failures.clear();
        inner.insert_failures.clear();
        inner.session_failure = None;
    }

    pub fn fail_session(&self, error: BackendError) {
        self.inner.borrow_mut().session_failure = Some(error);
    }

    pub fn hang_session(&self) {
        self.inner.borrow_mut().hang_session = true;
    }

    pub fn hang_sign_in(&self) {
        self.inner.borrow_mut().hang_sign_in = true;
    }

    fn check(&self, table: Table) -> BackendResult<()> {
        match self.inner.borrow().table_failures.get(&table) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn assign_id(row: &mut Value) {
    if let Value::Object(map) = row {
        map.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    }
}

fn column_text(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn row_id(row: &Value) -> String {
    column_text(row, "id")
}

#[async_trait(?Send)]
impl Backend for MemoryBackend {
    async fn get_session(&self) -> BackendResult<Option<Session>> {
        let hang = self.inner.borrow().hang_session;
        if hang {
            futures::future::pending::<()>().await;
        }
        let inner = self.inner.borrow();
        match &inner.session_failure {
            Some(error) => Err(error.clone()),
            None => Ok(inner.session.clone()),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let hang = self.inner.borrow().hang_sign_in;
        if hang {
            futures::future::pending::<()>().await;
        }
        let mut inner = self.inner.borrow_mut();
        let user = inner
            .accounts
            .iter()
            .find(|(account, secret, _)| account == email && secret == password)
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| BackendError::Unauthorized("Invalid login credentials".to_string()))?;
        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            user,
        };
        inner.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.inner.borrow_mut().session = None;
        Ok(())
    }

    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>> {
        self.check(table)?;
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| column_text(row, column) == *value)
            })
            .collect();

        if let Some((column, order)) = &query.order {
            rows.sort_by(|a, b| column_text(a, column).cmp(&column_text(b, column)));
            if *order == SortOrder::Descending {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Value) -> BackendResult<Value> {
        self.check(table)?;
        if let Some(error) = self.inner.borrow().insert_failures.get(&table) {
            return Err(error.clone());
        }
        assign_id(&mut row);
        self.inner
            .borrow_mut()
            .tables
            .entry(table)
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()> {
        self.check(table)?;
        let mut inner = self.inner.borrow_mut();
        let rows = inner.tables.entry(table).or_default();
        if let Some(Value::Object(target)) = rows.iter_mut().find(|row| row_id(row) == id) {
            if let Value::Object(fields) = patch {
                target.extend(fields);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        self.check(table)?;
        self.inner
            .borrow_mut()
            .tables
            .entry(table)
            .or_default()
            .retain(|row| row_id(row) != id);
        Ok(())
    }
}
