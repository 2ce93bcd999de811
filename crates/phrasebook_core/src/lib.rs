//! Core domain logic for Phrasebook.
//! This crate is the single source of truth for template invariants.

pub mod assembly;
pub mod clipboard;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notice;
pub mod schedule;
pub mod seed;
pub mod service;
pub mod sync;
pub mod tree;

pub use assembly::render::{to_clipboard_text, PreviewBlock, PreviewLine};
pub use assembly::selection::{FillValues, Selection};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use config::{PhrasebookConfig, TemplateDefaults};
pub use db::{open_store, open_store_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::part::{Part, PartDefaults, PartField, PartKind};
pub use model::template::{
    Category, CategoryId, CategoryRecord, OrderEntry, Section, SectionId, Sentence, SentenceId,
    Subcategory, SubcategoryId,
};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use schedule::{Clock, Debouncer, ManualClock, SystemClock};
pub use service::builder::{BuilderError, BuilderMode, BuilderResult, BuilderView};
pub use service::workspace::TemplateWorkspace;
pub use sync::adapter::{OwnerId, SyncAdapter, SyncError, SyncFailureKind, SyncOp, SyncResult};
pub use sync::local_only::LocalOnlyAdapter;
pub use sync::outbox::{Outbox, SyncWrite};
pub use sync::sqlite_store::SqliteSyncStore;
pub use tree::arena::{CascadeReport, TemplateTree, TreeError, TreeResult};
pub use tree::ordering::MoveDirection;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
