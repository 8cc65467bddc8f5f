// Adapters layer: concrete collaborators for the catalog, storage and notification ports.

pub mod http;
pub mod notify;
pub mod storage;

pub use http::HttpCatalog;
pub use notify::{ConsoleNotifier, MemoryNotifier, Notification};
pub use storage::{FileStore, MemoryStore};
