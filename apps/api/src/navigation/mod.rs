//! Navigation controller: which page a session is looking at.
//!
//! Transitions only happen on user actions. `resolve` is the render-time
//! check; it never fails and never rewrites the stored page, so `back` from
//! a stale artefact page still returns to the section it was opened from.

pub mod view;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{StateStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Section {
        key: String,
    },
    /// `return_to` is the owning section captured when the artefact was opened.
    Artifact {
        id: String,
        return_to: String,
    },
    ArtefactsManager,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavAction {
    SelectSection { key: String },
    OpenArtifact { id: String },
    OpenArtefactsManager,
    Back,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    page: Page,
    section_key: String,
}

impl Navigator {
    pub fn new(default_section_key: &str) -> Self {
        Self {
            page: Page::Section {
                key: default_section_key.to_string(),
            },
            section_key: default_section_key.to_string(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Most recently selected section; kept while other pages are open.
    pub fn current_section_key(&self) -> &str {
        &self.section_key
    }

    pub fn current_artifact_id(&self) -> Option<&str> {
        match &self.page {
            Page::Artifact { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn apply(&mut self, store: &StateStore, action: NavAction) -> Result<&Page, StoreError> {
        match action {
            NavAction::SelectSection { key } => self.select_section(store, &key)?,
            NavAction::OpenArtifact { id } => self.open_artifact(store, &id)?,
            NavAction::OpenArtefactsManager => self.open_artefacts_manager(),
            NavAction::Back => self.back(),
        }
        Ok(self.page())
    }

    pub fn select_section(&mut self, store: &StateStore, key: &str) -> Result<(), StoreError> {
        if !store.has_section(key) {
            return Err(StoreError::NotFound(format!("Section '{key}' not found")));
        }
        debug!("Navigate to section '{key}'");
        self.section_key = key.to_string();
        self.page = Page::Section {
            key: key.to_string(),
        };
        Ok(())
    }

    pub fn open_artifact(&mut self, store: &StateStore, id: &str) -> Result<(), StoreError> {
        let artifact = store
            .artifact(id)
            .ok_or_else(|| StoreError::NotFound(format!("Artefact {id} not found")))?;
        debug!("Navigate to artefact {id} (from '{}')", artifact.section_key);
        self.page = Page::Artifact {
            id: id.to_string(),
            return_to: artifact.section_key.clone(),
        };
        Ok(())
    }

    pub fn open_artefacts_manager(&mut self) {
        debug!("Navigate to artefacts manager");
        self.page = Page::ArtefactsManager;
    }

    /// Leaves an artefact page for the section it was opened from. A no-op
    /// on any other page.
    pub fn back(&mut self) {
        let Page::Artifact { return_to, .. } = &self.page else {
            return;
        };
        let key = return_to.clone();
        debug!("Navigate back to section '{key}'");
        self.section_key = key.clone();
        self.page = Page::Section { key };
    }

    /// The page to render. References that no longer resolve fall back to
    /// the default section.
    pub fn resolve(&self, store: &StateStore) -> Page {
        let fallback = || Page::Section {
            key: store.default_section_key().to_string(),
        };
        match &self.page {
            Page::Artifact { id, .. } if store.artifact(id).is_none() => {
                warn!("Artefact {id} no longer exists; showing default section");
                fallback()
            }
            Page::Section { key } if !store.has_section(key) => {
                warn!("Section '{key}' no longer exists; showing default section");
                fallback()
            }
            page => page.clone(),
        }
    }
}
