pub mod engine;
pub mod images;
pub mod memory;
pub mod persistence;

pub use engine::{RecordStore, StoreDocument};
pub use images::ImageStore;
pub use memory::InMemoryStore;
pub use persistence::JsonFileStore;
