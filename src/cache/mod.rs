//! Local sample cache
//!
//! Holds the per-language index files, the downloaded sample archives and
//! a lock marker. Index files are invalidated by comparing SHA256 digests
//! of the local and remote bytes.
//!
//! # Cache States
//!
//! | State | Marker | Description |
//! |-------|--------|-------------|
//! | Trusted | absent | Usable, synced on every open |
//! | Locked | present | A bulk run failed; must be cleared by an operator |

pub mod digest;
pub mod store;

pub use digest::{hash, local_hash};
pub use store::{CacheState, CacheStore, CACHE_API_LEVEL, LOCK_FILE_NAME};
