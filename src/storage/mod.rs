pub mod error;
pub mod kv;
pub mod memory;
pub mod sqlite;
pub mod todo_store;
pub mod ui_cache;

pub use error::StorageError;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use todo_store::{COMPLETED_ITEMS_KEY, TODO_ITEMS_KEY, TodoStore};
pub use ui_cache::UiCache;
