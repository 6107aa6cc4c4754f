//! HTTP client for the registry API and the client-side page cache

pub mod cache;

use crate::core::{ImageUpload, NewSuperhero, Page, Superhero, SuperheroPatch};
use crate::web::dto::{DeletedImageResponse, DeletedResponse, UploadedImagesResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use cache::ClientCache;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed wrapper over the `/api/superheroes` endpoints.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecordsClient {
    /// `base_url` is the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `superheroes` under the base url, followed by `segments`, each
    /// percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("superheroes")
            .extend(segments);
        Ok(url)
    }

    pub async fn list(&self, page: usize, limit: usize) -> ClientResult<Page<Superhero>> {
        let response = self
            .http
            .get(self.url(&[])?)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create(&self, fields: &NewSuperhero) -> ClientResult<Superhero> {
        let response = self.http.post(self.url(&[])?).json(fields).send().await?;
        decode(response).await
    }

    pub async fn update(&self, id: &str, patch: &SuperheroPatch) -> ClientResult<Superhero> {
        let response = self
            .http
            .put(self.url(&[id])?)
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<DeletedResponse> {
        let response = self.http.delete(self.url(&[id])?).send().await?;
        decode(response).await
    }

    pub async fn upload_images(
        &self,
        id: &str,
        files: Vec<ImageUpload>,
    ) -> ClientResult<UploadedImagesResponse> {
        let mut form = Form::new();
        for file in files {
            let mut part = Part::bytes(file.bytes);
            if let Some(name) = file.file_name {
                part = part.file_name(name);
            }
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part("images", part);
        }

        let response = self
            .http
            .post(self.url(&[id, "images"])?)
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_image(&self, id: &str, file_ref: &str) -> ClientResult<DeletedImageResponse> {
        let response = self
            .http
            .delete(self.url(&[id, "images", file_ref])?)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RecordsClient::new("http://localhost:3001/api/");
        assert_eq!(client.base_url(), "http://localhost:3001/api");
        assert_eq!(
            client.url(&["abc"]).unwrap().as_str(),
            "http://localhost:3001/api/superheroes/abc"
        );
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = RecordsClient::new("http://localhost:3001/api");
        let url = client.url(&["id 1", "images", "a#b?c/d.png"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/superheroes/id%201/images/a%23b%3Fc%2Fd.png"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unparseable_base_url_is_reported() {
        let client = RecordsClient::new("not a url");
        assert!(matches!(client.url(&[]), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn api_errors_expose_status() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Superhero not found".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "404 Not Found: Superhero not found");
    }
}
