use tracing::info;

use crate::models::section::Section;
use crate::store::defaults::custom_section_content;
use crate::store::{StateStore, StoreError};

/// Derives a section key from a display label.
/// "Certifications & Awards" → "certifications_and_awards".
pub fn slugify(label: &str) -> String {
    let mut key = label
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('/', "_")
        .replace('&', "and");
    while key.contains("__") {
        key = key.replace("__", "_");
    }
    key
}

impl StateStore {
    /// Appends a custom section and returns its key. Colliding keys get a
    /// `_2`, `_3`, ... suffix, first come first served.
    pub fn add_custom_section(&mut self, label: &str) -> Result<String, StoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(StoreError::Validation(
                "Please provide a label for the new navigation section.".to_string(),
            ));
        }

        let key = self.unused_key(&slugify(label));
        self.sections.insert(
            key.clone(),
            Section {
                label: label.to_string(),
                content: custom_section_content(label),
            },
        );
        self.order.push(key.clone());
        self.index.entry(key.clone()).or_default();

        info!("Added custom section '{key}' ({label})");
        Ok(key)
    }

    fn unused_key(&self, base: &str) -> String {
        if !self.sections.contains_key(base) {
            return base.to_string();
        }
        (2u32..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.sections.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Certifications & Awards"), "certifications_and_awards");
        assert_eq!(slugify("  Job Artefacts "), "job_artefacts");
        assert_eq!(slugify("A/B"), "a_b");
        assert_eq!(slugify("A / B"), "a_b");
        assert_eq!(slugify("Pre__Sales"), "pre_sales");
    }

    #[test]
    fn test_custom_section_is_appended_with_placeholder() {
        let mut store = StateStore::default();
        let key = store.add_custom_section("Certifications & Awards").unwrap();

        assert_eq!(key, "certifications_and_awards");
        assert_eq!(store.order().len(), 7);
        assert_eq!(store.order()[6], key);
        assert_eq!(store.label_of(&key), "Certifications & Awards");
        assert!(store.content_of(&key).contains("Certifications & Awards"));
        assert!(store.index_of(&key).is_empty());
    }

    #[test]
    fn test_colliding_labels_get_distinct_keys() {
        let mut store = StateStore::default();
        let first = store.add_custom_section("A/B").unwrap();
        let second = store.add_custom_section("A / B").unwrap();
        let third = store.add_custom_section("a b").unwrap();

        assert_eq!(first, "a_b");
        assert_eq!(second, "a_b_2");
        assert_eq!(third, "a_b_3");
    }

    #[test]
    fn test_label_colliding_with_default_section() {
        let mut store = StateStore::default();
        let key = store.add_custom_section("Skills").unwrap();
        assert_eq!(key, "skills_2");
        assert_eq!(store.label_of("skills"), "Skills");
    }

    #[test]
    fn test_blank_label_rejected_without_mutation() {
        let mut store = StateStore::default();
        let before = store.order().to_vec();

        let err = store.add_custom_section("   ").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.order(), before.as_slice());
    }
}
