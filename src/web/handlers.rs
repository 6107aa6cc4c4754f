use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
};
use tracing::debug;

use super::{
    Result,
    dto::{ApiMessage, DeletedImageResponse, DeletedResponse, ListQuery, UploadedImagesResponse},
    state::AppState,
};
use crate::core::{ImageUpload, NewSuperhero, Page, Superhero, SuperheroPatch};

/// Multipart field that carries image files.
pub const IMAGES_FIELD: &str = "images";

pub async fn healthcheck() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "ok".to_string(),
    })
}

pub async fn list_superheroes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<Superhero>> {
    Json(state.service.list(query.page_request()).await)
}

pub async fn create_superhero(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewSuperhero>, JsonRejection>,
) -> Result<(StatusCode, Json<Superhero>)> {
    let Json(payload) = payload?;
    let hero = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(hero)))
}

pub async fn update_superhero(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<SuperheroPatch>, JsonRejection>,
) -> Result<Json<Superhero>> {
    let Json(payload) = payload?;
    let hero = state.service.update(&id, payload).await?;
    Ok(Json(hero))
}

pub async fn delete_superhero(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let removed = state.service.delete(&id).await?;
    Ok(Json(DeletedResponse {
        message: "Superhero deleted successfully".to_string(),
        deleted_record: removed,
    }))
}

pub async fn upload_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedImagesResponse>> {
    let mut multipart = multipart?;
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGES_FIELD) {
            debug!(field = ?field.name(), "skipping unexpected multipart field");
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        uploads.push(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let attached = state.service.upload_images(&id, uploads).await?;
    Ok(Json(UploadedImagesResponse {
        message: "Images uploaded successfully".to_string(),
        uploaded_images: attached.attached,
        record: attached.record,
    }))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, file_ref)): Path<(String, String)>,
) -> Result<Json<DeletedImageResponse>> {
    let record = state.service.detach_image(&id, &file_ref).await?;
    Ok(Json(DeletedImageResponse {
        message: "Image deleted successfully".to_string(),
        deleted_image: file_ref,
        record,
    }))
}
