//! Backup document codec: versioned export and advisory import.

pub mod backup;
pub mod import;

pub use backup::{file_name, BackupDocument, ExportBundle, APP_NAME, BACKUP_VERSION, DEFAULT_EXPORT_NAME};
pub use import::{parse_backup, ImportUpdate};
