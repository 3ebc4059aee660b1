use std::path::{Path, PathBuf};

use serde::Serialize;

pub const INFOGRAPHIC_ROUTE: &str = "/assets/infographic";

/// Optional local image shown on one section's page.
#[derive(Debug, Clone)]
pub struct AssetLookup {
    path: PathBuf,
    section_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetStatus {
    Available { url: String },
    Missing { notice: String },
}

impl AssetLookup {
    pub fn new(path: impl Into<PathBuf>, section_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section_key: section_key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checked on every call so an image dropped in place while the server
    /// runs shows up without a restart.
    pub fn status_for(&self, section_key: &str) -> Option<AssetStatus> {
        if section_key != self.section_key {
            return None;
        }
        if self.path.is_file() {
            Some(AssetStatus::Available {
                url: INFOGRAPHIC_ROUTE.to_string(),
            })
        } else {
            Some(AssetStatus::Missing {
                notice: format!(
                    "The infographic image was not found at `{}`. Please place it there to display it here.",
                    self.path.display()
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_other_sections_have_no_asset() {
        let lookup = AssetLookup::new("Infograph.jpg", "competencies");
        assert_eq!(lookup.status_for("summary"), None);
    }

    #[test]
    fn test_missing_file_yields_notice() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = AssetLookup::new(dir.path().join("Infograph.jpg"), "competencies");

        match lookup.status_for("competencies") {
            Some(AssetStatus::Missing { notice }) => assert!(notice.contains("Infograph.jpg")),
            other => panic!("expected missing notice, got {other:?}"),
        }
    }

    #[test]
    fn test_present_file_is_available() {
        let mut image = tempfile::NamedTempFile::new().unwrap();
        image.write_all(b"\xff\xd8\xff").unwrap();
        let lookup = AssetLookup::new(image.path(), "competencies");

        assert_eq!(
            lookup.status_for("competencies"),
            Some(AssetStatus::Available {
                url: INFOGRAPHIC_ROUTE.to_string()
            })
        );
    }
}
