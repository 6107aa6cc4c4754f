use crate::service::SuperheroService;

/// Default request body cap, sized for a batch of five photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: SuperheroService,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(service: SuperheroService) -> Self {
        Self {
            service,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}
