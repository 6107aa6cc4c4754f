use super::{ClientError, ClientResult, RecordsClient};
use crate::core::{ImageUpload, NewSuperhero, Pagination, Superhero, SuperheroPatch};
use tracing::{debug, warn};

/// In-memory mirror of one page of server records.
///
/// Mutations never patch the cached page themselves: each one is followed by
/// an explicit [`ClientCache::refresh`] so the view always reflects what the
/// server returned last. A mutation the server accepted is reported as `Ok`
/// even when that refresh fails; the refresh failure lands in
/// [`ClientCache::error`] and the stale page stays in place.
#[derive(Debug)]
pub struct ClientCache {
    client: RecordsClient,
    records: Vec<Superhero>,
    current: Option<Superhero>,
    pagination: Pagination,
    error: Option<String>,
}

impl ClientCache {
    pub fn new(client: RecordsClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            current: None,
            pagination: Pagination::default(),
            error: None,
        }
    }

    pub fn records(&self) -> &[Superhero] {
        &self.records
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn current(&self) -> Option<&Superhero> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_current(&mut self, record: Option<Superhero>) {
        self.current = record;
    }

    pub async fn fetch_page(&mut self, page: usize) -> ClientResult<()> {
        self.error = None;
        let result = self.client.list(page, self.pagination.items_per_page).await;
        let page = self.track(result)?;

        debug!(
            page = page.pagination.current_page,
            items = page.data.len(),
            "client cache refreshed"
        );
        self.records = page.data;
        self.pagination = page.pagination;
        Ok(())
    }

    /// Re-fetch the page currently on display.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.fetch_page(self.pagination.current_page).await
    }

    pub async fn create(&mut self, fields: NewSuperhero) -> ClientResult<Superhero> {
        self.error = None;
        let result = self.client.create(&fields).await;
        let created = self.track(result)?;
        self.refresh_after_mutation().await;
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, patch: SuperheroPatch) -> ClientResult<Superhero> {
        self.error = None;
        let result = self.client.update(id, &patch).await;
        let updated = self.track(result)?;
        self.current = None;
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> ClientResult<Superhero> {
        self.error = None;
        let result = self.client.delete(id).await;
        let deleted = self.track(result)?;
        self.refresh_after_mutation().await;
        Ok(deleted.deleted_record)
    }

    pub async fn upload_images(
        &mut self,
        id: &str,
        files: Vec<ImageUpload>,
    ) -> ClientResult<Vec<String>> {
        self.error = None;
        let result = self.client.upload_images(id, files).await;
        let uploaded = self.track(result)?;
        self.refresh_after_mutation().await;
        Ok(uploaded.uploaded_images)
    }

    pub async fn delete_image(&mut self, id: &str, file_ref: &str) -> ClientResult<Superhero> {
        self.error = None;
        let result = self.client.delete_image(id, file_ref).await;
        let deleted = self.track(result)?;
        self.refresh_after_mutation().await;
        Ok(deleted.record)
    }

    async fn refresh_after_mutation(&mut self) {
        if self.refresh().await.is_err() {
            debug!("keeping stale page after a committed mutation");
        }
    }

    fn track<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        result.map_err(|err: ClientError| {
            warn!(error = %err, "client request failed");
            self.error = Some(err.to_string());
            err
        })
    }
}
