use std::sync::Arc;

use crate::assets::AssetLookup;
use crate::config::Config;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    /// Optional infographic shown on one section's page.
    pub assets: Arc<AssetLookup>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(
                config.max_sessions,
                config.session_idle_ttl,
                config.artifact_ids,
            )),
            assets: Arc::new(AssetLookup::new(
                config.infographic_path.clone(),
                config.infographic_section.clone(),
            )),
            config,
        }
    }
}
