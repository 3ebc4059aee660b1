//! Read-only views handed to the display layer.

use serde::Serialize;

use crate::assets::{AssetLookup, AssetStatus};
use crate::models::artifact::ArtifactSummary;
use crate::models::section::SectionEntry;
use crate::navigation::{Navigator, Page};
use crate::store::{StateStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub key: String,
    pub label: String,
    pub content: String,
    pub artifacts: Vec<ArtifactSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactGroup {
    pub section_key: String,
    pub label: String,
    pub artifacts: Vec<ArtifactSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Section(SectionView),
    Artifact {
        artifact: ArtifactSummary,
        back_to: String,
    },
    ArtefactsManager {
        groups: Vec<ArtifactGroup>,
    },
}

/// Everything needed to draw one screen: sidebar plus the active page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub sidebar: Vec<SectionEntry>,
    pub current_section_key: String,
    pub current_artifact_id: Option<String>,
    pub view: PageView,
}

pub fn section_view(
    store: &StateStore,
    assets: &AssetLookup,
    key: &str,
) -> Result<SectionView, StoreError> {
    if !store.has_section(key) {
        return Err(StoreError::NotFound(format!("Section '{key}' not found")));
    }
    Ok(build_section_view(store, assets, key))
}

/// Artefacts grouped by section, in sidebar order. Sections without
/// artefacts are left out.
pub fn manager_view(store: &StateStore) -> Vec<ArtifactGroup> {
    store
        .order()
        .iter()
        .filter_map(|key| {
            let artifacts: Vec<ArtifactSummary> =
                store.artifacts_in(key).iter().map(|a| a.summary()).collect();
            (!artifacts.is_empty()).then(|| ArtifactGroup {
                section_key: key.clone(),
                label: store.label_of(key),
                artifacts,
            })
        })
        .collect()
}

/// The current-page fields follow what is actually rendered, so a stale
/// artefact page reports the fallback section and no artefact.
pub fn page_response(store: &StateStore, assets: &AssetLookup, nav: &Navigator) -> PageResponse {
    let view = match nav.resolve(store) {
        Page::Section { key } => PageView::Section(build_section_view(store, assets, &key)),
        Page::Artifact { id, return_to } => match store.artifact(&id) {
            Some(artifact) => PageView::Artifact {
                artifact: artifact.summary(),
                back_to: return_to,
            },
            None => PageView::Section(build_section_view(
                store,
                assets,
                store.default_section_key(),
            )),
        },
        Page::ArtefactsManager => PageView::ArtefactsManager {
            groups: manager_view(store),
        },
    };

    let (current_section_key, current_artifact_id) = match &view {
        PageView::Section(section) => (section.key.clone(), None),
        PageView::Artifact { artifact, .. } => (
            nav.current_section_key().to_string(),
            Some(artifact.id.clone()),
        ),
        PageView::ArtefactsManager { .. } => (nav.current_section_key().to_string(), None),
    };

    PageResponse {
        sidebar: store.sections(),
        current_section_key,
        current_artifact_id,
        view,
    }
}

fn build_section_view(store: &StateStore, assets: &AssetLookup, key: &str) -> SectionView {
    SectionView {
        key: key.to_string(),
        label: store.label_of(key),
        content: store.content_of(key).to_string(),
        artifacts: store.artifacts_in(key).iter().map(|a| a.summary()).collect(),
        asset: assets.status_for(key),
    }
}
