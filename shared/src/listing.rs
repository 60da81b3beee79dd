//! Search and sort over the in-memory client list

use std::cmp::Ordering;

use crate::Client;

/// Delay between the last keystroke and applying the search term.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Status,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Name, SortField::Status, SortField::UpdatedAt];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Status => "status",
            SortField::UpdatedAt => "updated_at",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Status => "Status",
            SortField::UpdatedAt => "Last Updated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    fn compare(&self, a: &Client, b: &Client) -> Ordering {
        match self {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Status => a
                .status
                .as_str()
                .to_lowercase()
                .cmp(&b.status.as_str().to_lowercase()),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientQuery {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ClientQuery {
    pub fn new(search: impl Into<String>, sort_field: SortField, sort_direction: SortDirection) -> Self {
        Self {
            search: search.into(),
            sort_field,
            sort_direction,
        }
    }

    /// Case-insensitive substring match on name, status and SSO/TMC values.
    pub fn matches(&self, client: &Client) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        hit(&client.name)
            || hit(client.status.as_str())
            || client.sso_systems.iter().any(|tag| hit(&tag.value))
            || client.tmcs.iter().any(|tag| hit(&tag.value))
    }

    /// Filtered and sorted copy of `clients`. Order among equal keys is
    /// not specified.
    pub fn apply(&self, clients: &[Client]) -> Vec<Client> {
        let mut filtered: Vec<Client> = clients
            .iter()
            .filter(|client| self.matches(client))
            .cloned()
            .collect();

        let field = self.sort_field;
        match self.sort_direction {
            SortDirection::Ascending => filtered.sort_unstable_by(|a, b| field.compare(a, b)),
            SortDirection::Descending => filtered.sort_unstable_by(|a, b| field.compare(b, a)),
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientStatus, Tag};
    use chrono::{TimeZone, Utc};

    fn client(name: &str, status: ClientStatus, ssos: &[&str], tmcs: &[&str]) -> Client {
        Client {
            id: name.to_lowercase(),
            name: name.to_string(),
            status,
            sso_systems: ssos.iter().map(|v| Tag::new(*v)).collect(),
            hr_integrations: Vec::new(),
            tenants: Vec::new(),
            tmcs: tmcs.iter().map(|v| Tag::new(*v)).collect(),
            notes: String::new(),
            comments: String::new(),
            created_at: None,
            updated_at: None,
            user_id: None,
        }
    }

    fn sample() -> Vec<Client> {
        vec![
            client("globex", ClientStatus::Active, &["Azure AD"], &["Egencia"]),
            client("Acme", ClientStatus::Onboarding, &["Okta"], &["Concur"]),
            client("Initech", ClientStatus::Offboarded, &["PingFederate"], &[]),
            client("Hooli", ClientStatus::Active, &[], &["Navan"]),
        ]
    }

    fn names(clients: &[Client]) -> Vec<&str> {
        clients.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let query = ClientQuery::default();
        assert_eq!(query.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_search_hits_only_sso_owner() {
        let query = ClientQuery::new("pingfed", SortField::Name, SortDirection::Ascending);
        assert_eq!(names(&query.apply(&sample())), vec!["Initech"]);
    }

    #[test]
    fn test_search_covers_status_and_tmcs() {
        let by_status = ClientQuery::new("ONBOARD", SortField::Name, SortDirection::Ascending);
        assert_eq!(names(&by_status.apply(&sample())), vec!["Acme"]);

        let by_tmc = ClientQuery::new("navan", SortField::Name, SortDirection::Ascending);
        assert_eq!(names(&by_tmc.apply(&sample())), vec!["Hooli"]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive_and_reversible() {
        let clients = sample();
        let asc = ClientQuery::new("", SortField::Name, SortDirection::Ascending).apply(&clients);
        let desc = ClientQuery::new("", SortField::Name, SortDirection::Descending).apply(&clients);

        assert_eq!(names(&asc), vec!["Acme", "globex", "Hooli", "Initech"]);
        let mut reversed = names(&desc);
        reversed.reverse();
        assert_eq!(names(&asc), reversed);
    }

    #[test]
    fn test_sort_by_updated_at() {
        let mut clients = sample();
        clients[0].updated_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        clients[1].updated_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        clients[2].updated_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let sorted =
            ClientQuery::new("", SortField::UpdatedAt, SortDirection::Descending).apply(&clients);
        assert_eq!(names(&sorted), vec!["globex", "Initech", "Acme", "Hooli"]);
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(SortField::parse("status"), Some(SortField::Status));
        assert_eq!(SortField::parse("updated_at"), Some(SortField::UpdatedAt));
        assert_eq!(SortField::parse("tmcs"), None);
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
    }
}
