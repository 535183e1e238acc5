//! Snapshot files and metadata sources.
//!
//! A snapshot stores the bulk-fetched mesh metadata as JSON so lay-up
//! indexing can run without a live engine connection.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod source;

pub use config::load_config;
pub use error::{IoError, Result};
pub use snapshot::{LayupSnapshot, SCHEMA_VERSION, load_snapshot, save_snapshot};
pub use source::{InMemorySource, MetadataSource, SnapshotFile};
