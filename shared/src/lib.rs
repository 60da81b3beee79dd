use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod audit;
pub mod backend;
pub mod config;
pub mod controller;
pub mod form;
pub mod listing;
pub mod memory;
pub mod pagination;
pub mod state;
pub mod stats;
pub mod tags;

pub use audit::{AuditAction, NewAuditEntry};
pub use backend::{Backend, BackendError, BackendResult, Query, SortOrder, Table};
pub use config::{BackendConfig, ConfigError, Timeouts};
pub use controller::{Controller, ControllerError, Timer};
pub use form::{ClientDraft, FormError, SaveRequest, SaveTarget};
pub use listing::{ClientQuery, SortDirection, SortField};
pub use pagination::{Page, PageLink, Paginator};
pub use state::{AppState, SessionState, StateEvent};
pub use stats::DashboardStats;
pub use tags::TagEditor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// Exchanged for a new access token once the current one expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
}

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClientStatus {
    #[default]
    Onboarding,
    Active,
    Offboarded,
    Other(String),
}

impl ClientStatus {
    /// Statuses offered by the record editor.
    pub const SELECTABLE: [ClientStatus; 3] = [
        ClientStatus::Onboarding,
        ClientStatus::Active,
        ClientStatus::Offboarded,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ClientStatus::Onboarding => "Onboarding",
            ClientStatus::Active => "Active",
            ClientStatus::Offboarded => "Offboarded",
            ClientStatus::Other(label) => label,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ClientStatus::Active => "bg-green-800 text-green-200",
            ClientStatus::Onboarding => "bg-blue-800 text-blue-200",
            ClientStatus::Offboarded => "bg-red-800 text-red-200",
            ClientStatus::Other(_) => "bg-gray-700 text-gray-200",
        }
    }
}

impl From<String> for ClientStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Onboarding" => ClientStatus::Onboarding,
            "Active" => ClientStatus::Active,
            "Offboarded" => ClientStatus::Offboarded,
            _ => ClientStatus::Other(value),
        }
    }
}

impl From<ClientStatus> for String {
    fn from(status: ClientStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four tag collections carried by every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    SsoSystems,
    HrIntegrations,
    Tenants,
    Tmcs,
}

impl TagField {
    pub const ALL: [TagField; 4] = [
        TagField::SsoSystems,
        TagField::HrIntegrations,
        TagField::Tenants,
        TagField::Tmcs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TagField::SsoSystems => "SSO Systems",
            TagField::HrIntegrations => "HR Integrations",
            TagField::Tenants => "Tenants",
            TagField::Tmcs => "TMCs",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            TagField::SsoSystems => "Type SSO system and press Enter",
            TagField::HrIntegrations => "Type HR integration and press Enter",
            TagField::Tenants => "Type tenant and press Enter",
            TagField::Tmcs => "Type TMC and press Enter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ClientStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sso_systems: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hr_integrations: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tenants: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tmcs: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
}

impl Client {
    pub fn tags(&self, field: TagField) -> &[Tag] {
        match field {
            TagField::SsoSystems => &self.sso_systems,
            TagField::HrIntegrations => &self.hr_integrations,
            TagField::Tenants => &self.tenants,
            TagField::Tmcs => &self.tmcs,
        }
    }
}

/// Row written to the `clients` table on insert or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRecord {
    pub name: String,
    pub status: ClientStatus,
    pub sso_systems: Vec<Tag>,
    pub hr_integrations: Vec<Tag>,
    pub tenants: Vec<Tag>,
    pub tmcs: Vec<Tag>,
    pub notes: String,
    pub comments: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub client_id: Option<String>,
    pub action: AuditAction,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub old_value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_value: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientComment {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub client_id: String,
    pub comment: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row written to the `client_comments` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClientComment {
    pub client_id: String,
    pub comment: String,
    pub user_id: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Signed(n) => n.to_string(),
            StringOrNumber::Unsigned(n) => n.to_string(),
        }
    }
}

// Identifiers may be uuid strings or bigint columns depending on how the
// tables were provisioned.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_null_collections_default_to_empty() {
        let client: Client = serde_json::from_value(json!({
            "id": 7,
            "name": "Acme",
            "status": "Active",
            "sso_systems": null,
            "tmcs": [{ "value": "Concur", "comment": null }],
            "notes": null,
            "created_at": "2024-03-01T10:00:00+00:00",
            "updated_at": null
        }))
        .unwrap();

        assert_eq!(client.id, "7");
        assert!(client.sso_systems.is_empty());
        assert!(client.hr_integrations.is_empty());
        assert_eq!(client.tmcs, vec![Tag::new("Concur")]);
        assert_eq!(client.notes, "");
        assert!(client.created_at.is_some());
        assert!(client.updated_at.is_none());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: ClientStatus = serde_json::from_value(json!("Paused")).unwrap();
        assert_eq!(status, ClientStatus::Other("Paused".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Paused"));
        assert_eq!(
            serde_json::to_value(ClientStatus::Offboarded).unwrap(),
            json!("Offboarded")
        );
    }

    #[test]
    fn test_audit_entry_with_null_client() {
        let entry: AuditLogEntry = serde_json::from_value(json!({
            "id": "a1",
            "client_id": null,
            "action": "Client Created",
            "field_name": "All Fields",
            "old_value": "",
            "new_value": "Client: Acme (by ops@example.com)",
            "user_id": "u1",
            "created_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(entry.client_id, None);
        assert_eq!(entry.action, AuditAction::ClientCreated);
        assert_eq!(entry.user_email, None);
    }

    #[test]
    fn test_session_from_token_response() {
        let session: Session = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": { "id": "u1", "email": "ops@example.com", "role": "authenticated" }
        }))
        .unwrap();

        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.user.email, "ops@example.com");

        // Sessions stored before refresh tokens were kept still load
        let stored: Session = serde_json::from_value(json!({
            "access_token": "jwt",
            "user": { "id": "u1", "email": "ops@example.com" }
        }))
        .unwrap();
        assert_eq!(stored.refresh_token, None);
    }
}
