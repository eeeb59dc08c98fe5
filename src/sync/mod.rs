//! Synchronization and retrieval engine
//!
//! - [`index`]: keeps each language index in line with the remote copy
//! - [`scheduler`]: bulk retrieval of every archive with retry and requeue
//! - [`lazy`]: single archive retrieval on demand

pub mod index;
pub mod lazy;
pub mod scheduler;

pub use index::{index_url, load_index, IndexSynchronizer, SyncReport};
pub use lazy::{archive_url, LazyFetcher};
pub use scheduler::{
    BulkReport, RetrievalFailure, RetrievalScheduler, WorkItem, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_RETRIES, DEFAULT_WORKERS,
};
