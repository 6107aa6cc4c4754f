//! Record service
//!
//! Every operation is one read-modify-write of the whole store: load the
//! document, change it in memory, save it back. Nothing is cached between
//! calls and no lock spans the cycle, so two concurrent writers can lose
//! one of their updates (last save wins).

pub mod pagination;

use crate::core::{
    ImageUpload, NewSuperhero, Page, RegistryError, Result, Superhero, SuperheroPatch,
};
use crate::storage::images::is_image_content_type;
use crate::storage::{ImageStore, RecordStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use pagination::{PageRequest, paginate};

/// Maximum number of files accepted by one upload.
pub const MAX_UPLOAD_FILES: usize = 5;

const RECORD: &str = "Superhero";
const IMAGE: &str = "Image";

#[derive(Debug, Clone)]
pub struct AttachedImages {
    pub record: Superhero,
    pub attached: Vec<String>,
}

#[derive(Clone)]
pub struct SuperheroService {
    store: Arc<dyn RecordStore>,
    images: ImageStore,
}

impl SuperheroService {
    pub fn new(store: Arc<dyn RecordStore>, images: ImageStore) -> Self {
        Self { store, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub async fn list(&self, request: PageRequest) -> Page<Superhero> {
        let document = self.store.load().await;
        paginate(&document.superheroes, request)
    }

    pub async fn create(&self, fields: NewSuperhero) -> Result<Superhero> {
        let (nickname, real_name) = match (fields.nickname, fields.real_name) {
            (Some(nickname), Some(real_name)) if !nickname.is_empty() && !real_name.is_empty() => {
                (nickname, real_name)
            }
            _ => {
                return Err(RegistryError::validation(
                    "Nickname and real_name are required",
                ));
            }
        };

        let mut document = self.store.load().await;

        let now = Utc::now();
        let hero = Superhero {
            id: Uuid::new_v4().to_string(),
            nickname,
            real_name,
            origin_description: fields.origin_description.unwrap_or_default(),
            superpowers: fields.superpowers.unwrap_or_default(),
            catch_phrase: fields.catch_phrase.unwrap_or_default(),
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        document.superheroes.push(hero.clone());
        document.next_id += 1;
        self.store.save(&document).await;

        info!(id = %hero.id, nickname = %hero.nickname, "superhero created");
        Ok(hero)
    }

    /// Shallow merge. Required fields are not re-validated, so an update may
    /// blank `nickname` or `real_name`.
    pub async fn update(&self, id: &str, patch: SuperheroPatch) -> Result<Superhero> {
        let mut document = self.store.load().await;
        let index = document
            .position(id)
            .ok_or_else(|| RegistryError::not_found(RECORD))?;

        let hero = &mut document.superheroes[index];
        patch.apply_to(hero);
        hero.updated_at = Utc::now();
        let updated = hero.clone();

        self.store.save(&document).await;

        debug!(id = %updated.id, "superhero updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Superhero> {
        let mut document = self.store.load().await;
        let index = document
            .position(id)
            .ok_or_else(|| RegistryError::not_found(RECORD))?;

        let removed = document.superheroes.remove(index);
        self.store.save(&document).await;

        info!(id = %removed.id, "superhero deleted");
        Ok(removed)
    }

    pub async fn attach_images(&self, id: &str, file_refs: Vec<String>) -> Result<AttachedImages> {
        if file_refs.is_empty() {
            return Err(RegistryError::validation("No files uploaded"));
        }

        let mut document = self.store.load().await;
        let index = document
            .position(id)
            .ok_or_else(|| RegistryError::not_found(RECORD))?;

        let hero = &mut document.superheroes[index];
        hero.images.extend(file_refs.iter().cloned());
        hero.updated_at = Utc::now();
        let record = hero.clone();

        self.store.save(&document).await;

        debug!(id = %record.id, count = file_refs.len(), "images attached");
        Ok(AttachedImages {
            record,
            attached: file_refs,
        })
    }

    /// Write the uploads to the image store and attach them. Files written
    /// for a request that then fails are removed again.
    pub async fn upload_images(&self, id: &str, uploads: Vec<ImageUpload>) -> Result<AttachedImages> {
        if uploads.is_empty() {
            return Err(RegistryError::validation("No files uploaded"));
        }
        if uploads.len() > MAX_UPLOAD_FILES {
            return Err(RegistryError::validation(format!(
                "At most {MAX_UPLOAD_FILES} files can be uploaded at once"
            )));
        }
        if let Some(bad) = uploads
            .iter()
            .find(|upload| !is_image_content_type(upload.content_type.as_deref()))
        {
            return Err(RegistryError::validation(format!(
                "Only image files are allowed (got {})",
                bad.content_type.as_deref().unwrap_or("unknown type")
            )));
        }

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in &uploads {
            match self.images.store(upload).await {
                Ok(file_ref) => stored.push(file_ref),
                Err(err) => {
                    self.discard(&stored).await;
                    return Err(err);
                }
            }
        }

        match self.attach_images(id, stored.clone()).await {
            Ok(attached) => Ok(attached),
            Err(err) => {
                self.discard(&stored).await;
                Err(err)
            }
        }
    }

    pub async fn detach_image(&self, id: &str, file_ref: &str) -> Result<Superhero> {
        let mut document = self.store.load().await;
        let index = document
            .position(id)
            .ok_or_else(|| RegistryError::not_found(RECORD))?;

        let hero = &mut document.superheroes[index];
        let image_index = hero
            .images
            .iter()
            .position(|image| image == file_ref)
            .ok_or_else(|| RegistryError::not_found(IMAGE))?;

        hero.images.remove(image_index);
        hero.updated_at = Utc::now();
        let record = hero.clone();

        self.store.save(&document).await;

        if !self.images.remove(file_ref).await {
            debug!(file_ref = %file_ref, "no backing file removed for detached image");
        }

        debug!(id = %record.id, file_ref = %file_ref, "image detached");
        Ok(record)
    }

    async fn discard(&self, file_refs: &[String]) {
        for file_ref in file_refs {
            if !self.images.remove(file_ref).await {
                warn!(file_ref = %file_ref, "could not discard orphaned upload");
            }
        }
    }
}
