//! # Roster Store
//!
//! The state-management core of a community-management application,
//! packaged as an embeddable engine: canonical member/guest/event
//! collections, a bounded undo/redo history of full-state snapshots, a
//! write-through key-value storage mirror, a capped activity journal,
//! and a versioned JSON backup round-trip.
//!
//! ## Core Concepts
//!
//! - **AppStore**: owns the canonical collections and every mutation
//! - **History**: bounded past/future snapshot stacks, linear semantics
//! - **Mirror**: best-effort JSON persistence over a [`StorageBackend`]
//! - **Backup codec**: versioned export documents and advisory import
//!
//! ## Example
//!
//! ```
//! use roster::{AppStore, MemberCollection, MemoryBackend};
//!
//! let mut store = AppStore::open(Box::new(MemoryBackend::new()));
//!
//! // Bulk-create two guests from uploaded avatars.
//! let ids = store.bulk_create_members(
//!     &["data:image/png;base64,AAA".to_string(), "data:image/png;base64,BBB".to_string()],
//!     MemberCollection::Guests,
//! );
//! assert_eq!(ids.len(), 2);
//!
//! // Step back and forward again.
//! assert!(store.undo());
//! assert!(store.redo());
//! ```

pub mod activity;
pub mod assist;
pub mod codec;
pub mod defaults;
pub mod error;
pub mod history;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports
pub use activity::{ActivityLog, ACTIVITY_LOG_CAP};
pub use assist::{AssistError, ChatRole, ChatTurn, TextService};
pub use codec::{
    file_name, parse_backup, BackupDocument, ExportBundle, ImportUpdate, APP_NAME, BACKUP_VERSION,
    DEFAULT_EXPORT_NAME,
};
pub use error::{Result, StoreError};
pub use history::{History, HISTORY_CAP};
pub use storage::{keys, MemoryBackend, Mirror, StorageBackend, StorageError};
pub use store::{AppStore, UpdateOutcome, LOGIN_CODE_LEN};
pub use types::*;
