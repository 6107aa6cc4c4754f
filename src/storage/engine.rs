use crate::core::Superhero;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The whole persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(alias = "records", default)]
    pub superheroes: Vec<Superhero>,
    /// Bumped on every create. Ids are generated independently, so this is
    /// bookkeeping only.
    #[serde(rename = "nextId", default = "first_id")]
    pub next_id: u64,
}

fn first_id() -> u64 {
    1
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            superheroes: Vec::new(),
            next_id: first_id(),
        }
    }
}

impl StoreDocument {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.superheroes.iter().position(|hero| hero.id == id)
    }

    pub fn len(&self) -> usize {
        self.superheroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.superheroes.is_empty()
    }
}

/// Record store trait - allows pluggable storage backends.
///
/// Loading never fails: a backend that cannot produce its document hands
/// back an empty one. Saving never reports failure to the caller either;
/// backends log what went wrong.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the entire collection
    async fn load(&self) -> StoreDocument;

    /// Replace the entire collection
    async fn save(&self, document: &StoreDocument);
}
