//! Client record editor
//!
//! A [`ClientDraft`] holds the form contents until submit. The only rule
//! enforced is a non-blank name; everything else is saved as typed.

use crate::{Client, ClientStatus, Tag, TagField};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter a client name")]
    NameRequired,
}

/// Where a save lands: a fresh row or an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    New,
    Existing(String),
}

impl SaveTarget {
    pub fn for_client(client: Option<&Client>) -> Self {
        match client {
            Some(client) => SaveTarget::Existing(client.id.clone()),
            None => SaveTarget::New,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, SaveTarget::New)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub status: ClientStatus,
    pub sso_systems: Vec<Tag>,
    pub hr_integrations: Vec<Tag>,
    pub tenants: Vec<Tag>,
    pub tmcs: Vec<Tag>,
    pub notes: String,
    pub comments: String,
}

impl ClientDraft {
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            status: client.status.clone(),
            sso_systems: client.sso_systems.clone(),
            hr_integrations: client.hr_integrations.clone(),
            tenants: client.tenants.clone(),
            tmcs: client.tmcs.clone(),
            notes: client.notes.clone(),
            comments: client.comments.clone(),
        }
    }

    pub fn tags(&self, field: TagField) -> &[Tag] {
        match field {
            TagField::SsoSystems => &self.sso_systems,
            TagField::HrIntegrations => &self.hr_integrations,
            TagField::Tenants => &self.tenants,
            TagField::Tmcs => &self.tmcs,
        }
    }

    pub fn set_tags(&mut self, field: TagField, tags: Vec<Tag>) {
        match field {
            TagField::SsoSystems => self.sso_systems = tags,
            TagField::HrIntegrations => self.hr_integrations = tags,
            TagField::Tenants => self.tenants = tags,
            TagField::Tmcs => self.tmcs = tags,
        }
    }

    pub fn submit(&self, target: SaveTarget) -> Result<SaveRequest, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }

        Ok(SaveRequest {
            target,
            name: name.to_string(),
            status: self.status.clone(),
            sso_systems: self.sso_systems.clone(),
            hr_integrations: self.hr_integrations.clone(),
            tenants: self.tenants.clone(),
            tmcs: self.tmcs.clone(),
            notes: self.notes.clone(),
            comments: self.comments.clone(),
        })
    }
}

/// A validated draft on its way to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub name: String,
    pub status: ClientStatus,
    pub sso_systems: Vec<Tag>,
    pub hr_integrations: Vec<Tag>,
    pub tenants: Vec<Tag>,
    pub tmcs: Vec<Tag>,
    pub notes: String,
    pub comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = ClientDraft::default();
        assert_eq!(draft.status, ClientStatus::Onboarding);
        assert!(TagField::ALL.iter().all(|field| draft.tags(*field).is_empty()));
        assert_eq!(draft.notes, "");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let draft = ClientDraft {
            name: "   ".to_string(),
            ..ClientDraft::default()
        };
        assert_eq!(draft.submit(SaveTarget::New), Err(FormError::NameRequired));
    }

    #[test]
    fn test_submit_trims_name_only() {
        let mut draft = ClientDraft {
            name: "  Acme Travel  ".to_string(),
            notes: "  spaced notes ".to_string(),
            ..ClientDraft::default()
        };
        draft.set_tags(TagField::Tmcs, vec![Tag::new(" Concur ")]);

        let request = draft
            .submit(SaveTarget::Existing("17".to_string()))
            .unwrap();
        assert_eq!(request.name, "Acme Travel");
        assert_eq!(request.notes, "  spaced notes ");
        assert_eq!(request.tmcs, vec![Tag::new(" Concur ")]);
        assert_eq!(request.target, SaveTarget::Existing("17".to_string()));
        assert!(!request.target.is_new());
    }

    #[test]
    fn test_save_target_for_client() {
        assert_eq!(SaveTarget::for_client(None), SaveTarget::New);
    }
}
