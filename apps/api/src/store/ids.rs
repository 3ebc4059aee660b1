//! Artefact identifier generation.
//!
//! Ids keep a fixed `artifact_` tag. `RandomIds` draws a UUID v4 per artefact;
//! `SequentialIds` counts up per store and gives deterministic ids.

use uuid::Uuid;

pub const ARTIFACT_ID_PREFIX: &str = "artifact_";

/// Source of artefact ids for one state store.
pub trait ArtifactIdGenerator: Send {
    fn next_id(&mut self) -> String;
}

#[derive(Debug, Default)]
pub struct RandomIds;

impl ArtifactIdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        format!("{ARTIFACT_ID_PREFIX}{}", Uuid::new_v4().simple())
    }
}

#[derive(Debug, Default)]
pub struct SequentialIds {
    issued: u64,
}

impl ArtifactIdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("{ARTIFACT_ID_PREFIX}{:06}", self.issued)
    }
}

/// Which generator new stores get. Selected by `ARTIFACT_IDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    Random,
    Sequential,
}

impl IdMode {
    pub fn generator(self) -> Box<dyn ArtifactIdGenerator> {
        match self {
            IdMode::Random => Box::new(RandomIds),
            IdMode::Sequential => Box::<SequentialIds>::default(),
        }
    }
}
