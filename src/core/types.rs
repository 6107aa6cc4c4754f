use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Items per page when the caller does not ask for a usable limit.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// A single superhero record as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Superhero {
    pub id: String,
    pub nickname: String,
    pub real_name: String,
    #[serde(default)]
    pub origin_description: String,
    #[serde(default)]
    pub superpowers: String,
    #[serde(default)]
    pub catch_phrase: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a record.
///
/// `nickname` and `real_name` are optional here so that a missing field is
/// reported as a validation error instead of a body decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSuperhero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superpowers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
}

impl NewSuperhero {
    pub fn new(nickname: impl Into<String>, real_name: impl Into<String>) -> Self {
        Self {
            nickname: Some(nickname.into()),
            real_name: Some(real_name.into()),
            ..Self::default()
        }
    }

    pub fn origin_description(mut self, value: impl Into<String>) -> Self {
        self.origin_description = Some(value.into());
        self
    }

    pub fn superpowers(mut self, value: impl Into<String>) -> Self {
        self.superpowers = Some(value.into());
        self
    }

    pub fn catch_phrase(mut self, value: impl Into<String>) -> Self {
        self.catch_phrase = Some(value.into());
        self
    }
}

/// Partial update. Absent (or `null`) fields leave the record untouched;
/// `id`, `created_at` and `updated_at` in a request body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuperheroPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superpowers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl SuperheroPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow merge onto `target`. Does not touch identity or timestamps.
    pub fn apply_to(self, target: &mut Superhero) {
        if let Some(nickname) = self.nickname {
            target.nickname = nickname;
        }
        if let Some(real_name) = self.real_name {
            target.real_name = real_name;
        }
        if let Some(origin_description) = self.origin_description {
            target.origin_description = origin_description;
        }
        if let Some(superpowers) = self.superpowers {
            target.superpowers = superpowers;
        }
        if let Some(catch_phrase) = self.catch_phrase {
            target.catch_phrase = catch_phrase;
        }
        if let Some(images) = self.images {
            target.images = images;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// One uploaded file as received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            bytes,
        }
    }
}
