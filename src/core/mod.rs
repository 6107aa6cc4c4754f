pub mod error;
pub mod types;

pub use error::{RegistryError, Result};
pub use types::{
    DEFAULT_PAGE_SIZE, ImageUpload, NewSuperhero, Page, Pagination, Superhero, SuperheroPatch,
};
