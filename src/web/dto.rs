use crate::core::Superhero;
use crate::service::PageRequest;
use serde::{Deserialize, Serialize};

/// Raw list query. Values are kept as strings so that junk input falls
/// back to defaults instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
    pub deleted_record: Superhero,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImagesResponse {
    pub message: String,
    pub uploaded_images: Vec<String>,
    pub record: Superhero,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedImageResponse {
    pub message: String,
    pub deleted_image: String,
    pub record: Superhero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_tolerates_junk() {
        let query = ListQuery {
            page: Some("two".to_string()),
            limit: Some("3".to_string()),
        };
        assert_eq!(query.page_request(), PageRequest::new(1, 3));
        assert_eq!(ListQuery::default().page_request(), PageRequest::default());
    }
}
