//! Configuration document store
//!
//! YAML documents live under a config root directory, one file per
//! document kind, each a top-level map keyed by record ID. The store
//! layers three things on top of the filesystem:
//!
//! - an in-memory cache invalidated by file modification time
//! - schema validation that reports every violation in one pass
//! - atomic replace-then-cleanup updates with backup-and-restore
//!   rollback, so a failed update never leaves a half-written file

mod records;
mod schema;
mod store;

pub use records::{DocumentKind, RecordFilter};
pub use schema::{FieldKind, FieldSpec, Schema, Violation};
pub use store::{
    deep_merge, Clock, ConfigError, ConfigStore, Document, FsMtime, MtimeSource, Result,
    SystemClock, UpdateOptions,
};
