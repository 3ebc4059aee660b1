use chrono::{SubsecRound, Utc};
use tracing::info;

use crate::models::artifact::{Artifact, Download, FilePayload, DEFAULT_MIME};
use crate::store::{StateStore, StoreError};

/// `assign_to` value that asks for a brand-new section.
pub const NEW_SECTION_SENTINEL: &str = "__NEW_SECTION__";

/// Where an uploaded artefact should be attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    Existing(String),
    NewSection { label: String },
}

impl AssignTarget {
    pub fn parse(assign_to: &str, new_section_label: &str) -> Self {
        if assign_to == NEW_SECTION_SENTINEL {
            AssignTarget::NewSection {
                label: new_section_label.to_string(),
            }
        } else {
            AssignTarget::Existing(assign_to.trim().to_string())
        }
    }
}

impl StateStore {
    /// Stores an uploaded file and links it to its section. Every check runs
    /// before anything is written, so a rejected upload leaves no section,
    /// artefact or index entry behind.
    pub fn add_artifact(
        &mut self,
        file: Option<FilePayload>,
        assign_to: AssignTarget,
    ) -> Result<String, StoreError> {
        let file = file.ok_or(StoreError::MissingInput)?;

        let section_key = match assign_to {
            AssignTarget::Existing(key) => {
                if !self.has_section(&key) {
                    return Err(StoreError::NotFound(format!("Section '{key}' not found")));
                }
                key
            }
            AssignTarget::NewSection { label } => self.add_custom_section(&label)?,
        };

        let id = self.fresh_id();
        let FilePayload { name, mime, bytes } = file;
        let mime = mime
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME.to_string());

        info!(
            "Stored artefact {id} ('{name}', {mime}, {} bytes) under '{section_key}'",
            bytes.len()
        );

        self.artifacts.insert(
            id.clone(),
            Artifact {
                id: id.clone(),
                name,
                mime,
                bytes,
                section_key: section_key.clone(),
                created_at: Utc::now().trunc_subsecs(6),
            },
        );
        self.index.entry(section_key).or_default().push(id.clone());

        Ok(id)
    }

    /// Deletes an artefact and unlinks it from its section.
    pub fn remove_artifact(&mut self, id: &str) -> Result<Artifact, StoreError> {
        let artifact = self
            .artifacts
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("Artefact {id} not found")))?;

        if let Some(ids) = self.index.get_mut(&artifact.section_key) {
            ids.retain(|listed| listed != id);
        }

        info!(
            "Removed artefact {id} ('{}') from '{}'",
            artifact.name, artifact.section_key
        );
        Ok(artifact)
    }

    pub fn download(&self, id: &str) -> Result<Download, StoreError> {
        let artifact = self
            .artifacts
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("Artefact {id} not found")))?;
        Ok(Download {
            name: artifact.name.clone(),
            mime: artifact.mime.clone(),
            bytes: artifact.bytes.clone(),
        })
    }

    // Generators only promise uniqueness within their own sequence; skip
    // anything already taken.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.artifacts.contains_key(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ids::SequentialIds;
    use bytes::Bytes;

    fn store() -> StateStore {
        StateStore::new(Box::<SequentialIds>::default())
    }

    fn file(name: &str, mime: Option<&str>) -> Option<FilePayload> {
        Some(FilePayload {
            name: name.to_string(),
            mime: mime.map(str::to_string),
            bytes: Bytes::from(format!("contents of {name}")),
        })
    }

    fn existing(key: &str) -> AssignTarget {
        AssignTarget::Existing(key.to_string())
    }

    #[test]
    fn test_parse_assign_target() {
        assert_eq!(
            AssignTarget::parse(NEW_SECTION_SENTINEL, "Awards"),
            AssignTarget::NewSection {
                label: "Awards".to_string()
            }
        );
        assert_eq!(AssignTarget::parse(" skills ", "ignored"), existing("skills"));
    }

    #[test]
    fn test_upload_to_custom_section() {
        let mut store = store();
        let key = store.add_custom_section("Certifications & Awards").unwrap();
        let id = store
            .add_artifact(file("cert.pdf", Some("application/pdf")), existing(&key))
            .unwrap();

        assert_eq!(store.artifact_count(), 1);
        let artifact = store.artifact(&id).unwrap();
        assert_eq!(artifact.name, "cert.pdf");
        assert_eq!(artifact.section_key, "certifications_and_awards");
        assert_eq!(store.index_of(&key), [id]);
    }

    #[test]
    fn test_sequential_uploads_keep_insertion_order() {
        let mut store = store();
        let first = store.add_artifact(file("a.txt", None), existing("skills")).unwrap();
        let second = store.add_artifact(file("b.txt", None), existing("skills")).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.index_of("skills"), [first, second]);
    }

    #[test]
    fn test_mime_defaults_to_octet_stream() {
        let mut store = store();
        let id = store.add_artifact(file("blob", None), existing("summary")).unwrap();
        assert_eq!(store.artifact(&id).unwrap().mime, DEFAULT_MIME);

        let id = store.add_artifact(file("blob", Some("")), existing("summary")).unwrap();
        assert_eq!(store.artifact(&id).unwrap().mime, DEFAULT_MIME);
    }

    #[test]
    fn test_created_at_has_microsecond_precision() {
        let mut store = store();
        let id = store.add_artifact(file("a.pdf", None), existing("summary")).unwrap();
        let artifact = store.artifact(&id).unwrap();
        assert_eq!(artifact.created_at.timestamp_subsec_nanos() % 1_000, 0);

        let json = serde_json::to_value(artifact.summary()).unwrap();
        let stamp = json["created_at"].as_str().unwrap();
        let fraction = stamp
            .split_once('.')
            .map(|(_, rest)| rest.trim_end_matches('Z'))
            .unwrap_or("");
        assert!(fraction.len() <= 6, "{stamp}");
    }

    #[test]
    fn test_missing_file_rejected() {
        let mut store = store();
        let err = store.add_artifact(None, existing("summary")).unwrap_err();
        assert!(matches!(err, StoreError::MissingInput));
        assert_eq!(store.artifact_count(), 0);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let mut store = store();
        let err = store
            .add_artifact(file("a.txt", None), existing("hobbies"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.artifact_count(), 0);
        assert!(store.index_of("hobbies").is_empty());
    }

    #[test]
    fn test_new_section_via_sentinel() {
        let mut store = store();
        let target = AssignTarget::parse(NEW_SECTION_SENTINEL, "  Job Artefacts ");
        let id = store.add_artifact(file("jd.docx", None), target).unwrap();

        assert_eq!(store.order().last().unwrap(), "job_artefacts");
        assert_eq!(store.label_of("job_artefacts"), "Job Artefacts");
        assert_eq!(store.index_of("job_artefacts"), [id]);
    }

    #[test]
    fn test_new_section_with_blank_label_is_atomic() {
        let mut store = store();
        let order_before = store.order().to_vec();

        let target = AssignTarget::parse(NEW_SECTION_SENTINEL, "");
        let err = store.add_artifact(file("a.txt", None), target).unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.order(), order_before.as_slice());
        assert_eq!(store.artifact_count(), 0);
        assert!(order_before.iter().all(|k| store.index_of(k).is_empty()));
        assert!(store.check_consistency().is_empty());
    }

    #[test]
    fn test_remove_then_download_is_not_found() {
        let mut store = store();
        let id = store.add_artifact(file("a.txt", None), existing("skills")).unwrap();

        let removed = store.remove_artifact(&id).unwrap();
        assert_eq!(removed.name, "a.txt");
        assert!(matches!(store.download(&id), Err(StoreError::NotFound(_))));
        assert!(store.index_of("skills").is_empty());
    }

    #[test]
    fn test_remove_leaves_section_and_siblings_untouched() {
        let mut store = store();
        let keep = store.add_artifact(file("keep.txt", None), existing("skills")).unwrap();
        let drop = store.add_artifact(file("drop.txt", None), existing("skills")).unwrap();
        let elsewhere = store.add_artifact(file("x.txt", None), existing("summary")).unwrap();

        store.remove_artifact(&drop).unwrap();

        assert!(store.has_section("skills"));
        assert_eq!(store.label_of("skills"), "Skills");
        assert_eq!(store.index_of("skills"), [keep.clone()]);
        assert_eq!(store.index_of("summary"), [elsewhere.clone()]);
        assert_eq!(store.download(&keep).unwrap().name, "keep.txt");
        assert_eq!(store.download(&elsewhere).unwrap().name, "x.txt");
        assert!(store.check_consistency().is_empty());
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let mut store = store();
        assert!(matches!(
            store.remove_artifact("artifact_missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_tolerates_missing_index_entry() {
        let mut store = store();
        let id = store.add_artifact(file("a.txt", None), existing("skills")).unwrap();
        store.index.get_mut("skills").unwrap().clear();

        assert!(store.remove_artifact(&id).is_ok());
        assert!(store.check_consistency().is_empty());
    }

    #[test]
    fn test_download_returns_payload() {
        let mut store = store();
        let id = store
            .add_artifact(file("cv.pdf", Some("application/pdf")), existing("experience"))
            .unwrap();

        let download = store.download(&id).unwrap();
        assert_eq!(download.name, "cv.pdf");
        assert_eq!(download.mime, "application/pdf");
        assert_eq!(download.bytes, Bytes::from("contents of cv.pdf"));
    }

    #[test]
    fn test_fresh_id_skips_taken_ids() {
        struct Repeating(u32);
        impl crate::store::ids::ArtifactIdGenerator for Repeating {
            fn next_id(&mut self) -> String {
                self.0 += 1;
                format!("artifact_{}", self.0 / 2)
            }
        }

        let mut store = StateStore::new(Box::new(Repeating(1)));
        let first = store.add_artifact(file("a", None), existing("skills")).unwrap();
        let second = store.add_artifact(file("b", None), existing("skills")).unwrap();
        assert_eq!(first, "artifact_1");
        assert_eq!(second, "artifact_2");
    }
}
