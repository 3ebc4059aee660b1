//! Session-scoped state store: section order, section records, artefact
//! records and the section → artefact index.
//!
//! Fields are private. Mutation goes through the section manager
//! (`sections.rs`) and the artefact manager (`artifacts.rs`), which keep the
//! artefact map and the per-section index consistent.

pub mod artifacts;
pub mod defaults;
pub mod ids;
pub mod sections;

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::models::artifact::Artifact;
use crate::models::section::{Section, SectionEntry};
use crate::store::defaults::{DEFAULT_SECTIONS, DEFAULT_SECTION_KEY, EMPTY_CONTENT};
use crate::store::ids::{ArtifactIdGenerator, RandomIds};

pub use artifacts::{AssignTarget, NEW_SECTION_SENTINEL};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no file was uploaded")]
    MissingInput,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InconsistentState(String),
}

pub struct StateStore {
    order: Vec<String>,
    sections: HashMap<String, Section>,
    artifacts: HashMap<String, Artifact>,
    index: HashMap<String, Vec<String>>,
    ids: Box<dyn ArtifactIdGenerator>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(Box::new(RandomIds))
    }
}

impl StateStore {
    pub fn new(ids: Box<dyn ArtifactIdGenerator>) -> Self {
        let mut store = Self {
            order: Vec::new(),
            sections: HashMap::new(),
            artifacts: HashMap::new(),
            index: HashMap::new(),
            ids,
        };
        store.ensure_initialized();
        store
    }

    /// Seeds the default sections. Anything already present is left alone,
    /// so calling this on a populated store changes nothing.
    pub fn ensure_initialized(&mut self) {
        if self.order.is_empty() {
            self.order = DEFAULT_SECTIONS.iter().map(|s| s.key.to_string()).collect();
        }
        for default in DEFAULT_SECTIONS {
            self.sections
                .entry(default.key.to_string())
                .or_insert_with(|| Section {
                    label: default.label.to_string(),
                    content: default.content.to_string(),
                });
            self.index.entry(default.key.to_string()).or_default();
        }
    }

    pub fn default_section_key(&self) -> &str {
        DEFAULT_SECTION_KEY
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn has_section(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Label for a section key; title-cased key when the record is missing.
    pub fn label_of(&self, key: &str) -> String {
        self.sections
            .get(key)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| title_case(key))
    }

    pub fn content_of(&self, key: &str) -> &str {
        self.sections
            .get(key)
            .map(|s| s.content.as_str())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(EMPTY_CONTENT)
    }

    /// Sidebar entries in display order.
    pub fn sections(&self) -> Vec<SectionEntry> {
        self.order
            .iter()
            .map(|key| SectionEntry {
                key: key.clone(),
                label: self.label_of(key),
            })
            .collect()
    }

    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.get(id)
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Artefacts attached to `key`, in upload order. Index entries that no
    /// longer resolve are skipped.
    pub fn artifacts_in(&self, key: &str) -> Vec<&Artifact> {
        self.index_of(key)
            .iter()
            .filter_map(|id| self.artifacts.get(id))
            .collect()
    }

    /// Artefact ids listed under `key`, as stored in the index.
    pub fn index_of(&self, key: &str) -> &[String] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lists every disagreement between the artefact map and the index.
    pub fn check_consistency(&self) -> Vec<StoreError> {
        let mut problems = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (key, ids) in &self.index {
            for id in ids {
                match self.artifacts.get(id) {
                    None => problems.push(StoreError::InconsistentState(format!(
                        "index for '{key}' lists unknown artefact {id}"
                    ))),
                    Some(a) if a.section_key != *key => {
                        problems.push(StoreError::InconsistentState(format!(
                            "artefact {id} is listed under '{key}' but owned by '{}'",
                            a.section_key
                        )))
                    }
                    Some(_) if !seen.insert(id.as_str()) => {
                        problems.push(StoreError::InconsistentState(format!(
                            "artefact {id} is listed more than once under '{key}'"
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        for (id, artifact) in &self.artifacts {
            if !seen.contains(id.as_str()) {
                problems.push(StoreError::InconsistentState(format!(
                    "artefact {id} is missing from the index of '{}'",
                    artifact.section_key
                )));
            }
        }

        problems
    }

    /// Rebuilds the index from the artefact map when the two disagree.
    /// Surviving entries keep their relative order; artefacts missing from
    /// the index are appended by creation time. Returns the number of
    /// problems repaired.
    pub fn reconcile(&mut self) -> usize {
        let problems = self.check_consistency();
        if problems.is_empty() {
            return 0;
        }
        for problem in &problems {
            warn!("Repairing artefact index: {problem}");
        }

        let mut placed: HashSet<String> = HashSet::new();
        for (key, ids) in self.index.iter_mut() {
            ids.retain(|id| {
                let owned_here = self
                    .artifacts
                    .get(id)
                    .is_some_and(|a| a.section_key == *key);
                owned_here && placed.insert(id.clone())
            });
        }

        let mut orphans: Vec<&Artifact> = self
            .artifacts
            .values()
            .filter(|a| !placed.contains(&a.id))
            .collect();
        orphans.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        for artifact in orphans {
            self.index
                .entry(artifact.section_key.clone())
                .or_default()
                .push(artifact.id.clone());
        }

        problems.len()
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
