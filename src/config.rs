use clap::Parser;
use std::path::PathBuf;

use crate::web::state::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration. Every option can also be set through the
/// environment (a `.env` file is honoured by the binary).
#[derive(Debug, Clone, Parser)]
#[command(name = "superhero_registry", version, about = "Superhero registry REST server")]
pub struct AppConfig {
    /// Interface to bind
    #[arg(long, env = "SUPERHERO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SUPERHERO_PORT", default_value_t = 3001)]
    pub port: u16,

    /// JSON file holding all records
    #[arg(long, env = "SUPERHERO_DATA_FILE", default_value = "data/superheroes.json")]
    pub data_file: PathBuf,

    /// Directory for uploaded images, also served under /uploads
    #[arg(long, env = "SUPERHERO_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "SUPERHERO_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
