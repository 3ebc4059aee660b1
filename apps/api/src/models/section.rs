use serde::Serialize;

/// A resume section owned by the state store. `content` is opaque markdown
/// that the display layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub content: String,
}

/// Sidebar entry: one per section, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub key: String,
    pub label: String,
}
