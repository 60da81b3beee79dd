//! Audit trail entries
//!
//! Entries are append-only. Each mutating operation writes one, built here
//! so the wording stays identical across the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuditLogEntry, Client, SaveRequest, User};

/// Field name recorded for whole-record changes
pub const ALL_FIELDS: &str = "All Fields";
/// Field name recorded for thread comments
pub const COMMENTS_FIELD: &str = "Comments";
/// Entries shown in the dashboard's recent activity panel
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditAction {
    ClientCreated,
    ClientUpdated,
    ClientDeleted,
    CommentAdded,
    Other(String),
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientCreated => "Client Created",
            Self::ClientUpdated => "Client Updated",
            Self::ClientDeleted => "Client Deleted",
            Self::CommentAdded => "Comment Added",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for AuditAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Client Created" => Self::ClientCreated,
            "Client Updated" => Self::ClientUpdated,
            "Client Deleted" => Self::ClientDeleted,
            "Comment Added" => Self::CommentAdded,
            _ => Self::Other(value),
        }
    }
}

impl From<AuditAction> for String {
    fn from(action: AuditAction) -> Self {
        action.as_str().to_string()
    }
}

/// Row written to the `audit_log` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAuditEntry {
    pub client_id: Option<String>,
    pub action: AuditAction,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
    pub user_id: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

/// Builder for creating audit log entries
pub struct AuditEntryBuilder {
    action: AuditAction,
    client_id: Option<String>,
    field_name: String,
    old_value: String,
    new_value: String,
}

impl AuditEntryBuilder {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            client_id: None,
            field_name: ALL_FIELDS.to_string(),
            old_value: String::new(),
            new_value: String::new(),
        }
    }

    pub fn client(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn old_value(mut self, value: impl Into<String>) -> Self {
        self.old_value = value.into();
        self
    }

    pub fn new_value(mut self, value: impl Into<String>) -> Self {
        self.new_value = value.into();
        self
    }

    pub fn build(self, actor: &User, at: DateTime<Utc>) -> NewAuditEntry {
        NewAuditEntry {
            client_id: self.client_id,
            action: self.action,
            field_name: self.field_name,
            old_value: self.old_value,
            new_value: self.new_value,
            user_id: actor.id.clone(),
            user_email: actor.email.clone(),
            created_at: at,
        }
    }
}

/// Entry for a create or update. `client_id` is the stored row's id when
/// the backend returned one.
pub fn client_saved(
    request: &SaveRequest,
    client_id: Option<String>,
    actor: &User,
    at: DateTime<Utc>,
) -> NewAuditEntry {
    let action = if request.target.is_new() {
        AuditAction::ClientCreated
    } else {
        AuditAction::ClientUpdated
    };
    AuditEntryBuilder::new(action)
        .client(client_id)
        .new_value(format!("Client: {} (by {})", request.name, actor.email))
        .build(actor, at)
}

pub fn client_deleted(
    client_id: &str,
    removed: Option<&Client>,
    actor: &User,
    at: DateTime<Utc>,
) -> NewAuditEntry {
    AuditEntryBuilder::new(AuditAction::ClientDeleted)
        .client(Some(client_id.to_string()))
        .old_value(deletion_summary(removed))
        .new_value(format!("Deleted by {}", actor.email))
        .build(actor, at)
}

pub fn comment_added(client_id: &str, text: &str, actor: &User, at: DateTime<Utc>) -> NewAuditEntry {
    AuditEntryBuilder::new(AuditAction::CommentAdded)
        .client(Some(client_id.to_string()))
        .field(COMMENTS_FIELD)
        .new_value(format!("\"{}\" by {}", text, actor.email))
        .build(actor, at)
}

/// One-line description of a record about to be removed.
pub fn deletion_summary(client: Option<&Client>) -> String {
    let Some(client) = client else {
        return "Unknown".to_string();
    };
    let join = |tags: &[crate::Tag]| {
        tags.iter()
            .map(|tag| tag.value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{} - Status: {}, SSO: {}, TMCs: {}",
        client.name,
        client.status,
        join(&client.sso_systems),
        join(&client.tmcs)
    )
}

/// Entries recorded against one client, in log order.
pub fn for_client<'a>(entries: &'a [AuditLogEntry], client_id: &str) -> Vec<&'a AuditLogEntry> {
    entries
        .iter()
        .filter(|entry| entry.client_id.as_deref() == Some(client_id))
        .collect()
}

/// Head of a newest-first log.
pub fn recent(entries: &[AuditLogEntry], limit: usize) -> &[AuditLogEntry] {
    &entries[..entries.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientStatus, SaveTarget, Tag};

    fn actor() -> User {
        User {
            id: "u1".to_string(),
            email: "ops@example.com".to_string(),
        }
    }

    fn request(target: SaveTarget) -> SaveRequest {
        SaveRequest {
            target,
            name: "Acme".to_string(),
            status: ClientStatus::Onboarding,
            sso_systems: Vec::new(),
            hr_integrations: Vec::new(),
            tenants: Vec::new(),
            tmcs: Vec::new(),
            notes: String::new(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_save_entries() {
        let now = Utc::now();
        let created = client_saved(&request(SaveTarget::New), None, &actor(), now);
        assert_eq!(created.action, AuditAction::ClientCreated);
        assert_eq!(created.client_id, None);
        assert_eq!(created.field_name, ALL_FIELDS);
        assert_eq!(created.new_value, "Client: Acme (by ops@example.com)");

        let updated = client_saved(
            &request(SaveTarget::Existing("9".to_string())),
            Some("9".to_string()),
            &actor(),
            now,
        );
        assert_eq!(updated.action, AuditAction::ClientUpdated);
        assert_eq!(updated.client_id.as_deref(), Some("9"));
        assert_eq!(updated.user_email, "ops@example.com");
    }

    #[test]
    fn test_deletion_summary() {
        let client = Client {
            id: "9".to_string(),
            name: "Acme".to_string(),
            status: ClientStatus::Active,
            sso_systems: vec![Tag::new("Okta"), Tag::new("Ping")],
            hr_integrations: Vec::new(),
            tenants: Vec::new(),
            tmcs: vec![Tag::new("Concur")],
            notes: String::new(),
            comments: String::new(),
            created_at: None,
            updated_at: None,
            user_id: None,
        };
        assert_eq!(
            deletion_summary(Some(&client)),
            "Acme - Status: Active, SSO: Okta, Ping, TMCs: Concur"
        );
        assert_eq!(deletion_summary(None), "Unknown");

        let entry = client_deleted("9", Some(&client), &actor(), Utc::now());
        assert_eq!(entry.action, AuditAction::ClientDeleted);
        assert_eq!(entry.new_value, "Deleted by ops@example.com");
    }

    #[test]
    fn test_comment_entry() {
        let entry = comment_added("9", "Kickoff booked", &actor(), Utc::now());
        assert_eq!(entry.field_name, COMMENTS_FIELD);
        assert_eq!(entry.new_value, "\"Kickoff booked\" by ops@example.com");
        assert_eq!(
            serde_json::to_value(&entry).unwrap()["action"],
            serde_json::json!("Comment Added")
        );
    }

    #[test]
    fn test_filters() {
        let entry = |client_id: Option<&str>| AuditLogEntry {
            id: None,
            client_id: client_id.map(str::to_string),
            action: AuditAction::ClientUpdated,
            field_name: ALL_FIELDS.to_string(),
            old_value: String::new(),
            new_value: String::new(),
            user_id: None,
            user_email: None,
            created_at: None,
        };
        let log = vec![entry(Some("1")), entry(None), entry(Some("2")), entry(Some("1"))];
        assert_eq!(for_client(&log, "1").len(), 2);
        assert_eq!(for_client(&log, "3").len(), 0);
        assert_eq!(recent(&log, 3).len(), 3);
        assert_eq!(recent(&log, RECENT_ACTIVITY_LIMIT).len(), 4);
    }
}
