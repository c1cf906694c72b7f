pub mod memory;
pub mod sqlite;

pub use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
