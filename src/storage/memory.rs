use super::engine::{RecordStore, StoreDocument};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps the document in process memory. Used by tests and embedders that
/// do not want a data file.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    document: RwLock<StoreDocument>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn load(&self) -> StoreDocument {
        self.document.read().await.clone()
    }

    async fn save(&self, document: &StoreDocument) {
        *self.document.write().await = document.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_returns_a_copy() {
        let store = InMemoryStore::new();
        let mut document = store.load().await;
        document.next_id = 42;

        assert_eq!(store.load().await.next_id, 1);

        store.save(&document).await;
        assert_eq!(store.load().await.next_id, 42);
    }
}
