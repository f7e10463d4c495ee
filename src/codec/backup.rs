//! Versioned backup document and deterministic file naming.

use crate::error::Result;
use crate::types::{Event, GroupInfo, Member, Snapshot};
use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backup format version tag.
pub const BACKUP_VERSION: &str = "2.5";

/// Application identifier embedded in every backup document.
pub const APP_NAME: &str = "NHÓM THÂN HỬU PHÚ NHUẬN";

/// File-name owner used when no member name is supplied.
pub const DEFAULT_EXPORT_NAME: &str = "nhomthanhuupn";

/// The single JSON document a backup round-trips through.
///
/// Theme settings are merged in from storage even though they are not
/// canonical domain state; on import they travel back to storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub app_name: String,
    pub group_info: GroupInfo,
    pub members: Vec<Member>,
    pub guests: Vec<Member>,
    pub events: Vec<Event>,
    #[serde(default)]
    pub theme_settings: Value,
    pub export_date: DateTime<Utc>,
}

impl BackupDocument {
    /// Assemble a document from the current state and the stored theme
    /// record, stamped with the current time.
    pub fn assemble(snapshot: Snapshot, theme_settings: Value) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            app_name: APP_NAME.to_string(),
            group_info: snapshot.group_info,
            members: snapshot.members,
            guests: snapshot.guests,
            events: snapshot.events,
            theme_settings,
            export_date: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A prepared export: the derived file name plus the encoded document.
/// Triggering the actual download is the embedding shell's side of the
/// contract.
#[derive(Clone, Debug)]
pub struct ExportBundle {
    pub file_name: String,
    pub json: String,
}

/// Derive the export file name from the owner and a local wall-clock
/// instant: `<name> _DD-MM-YYYY _lúc_HHhMM.json`, zero-padded. Users
/// rely on this exact template; do not reformat it.
pub fn file_name(owner: Option<&str>, now: DateTime<Local>) -> String {
    let name = owner
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_EXPORT_NAME);
    format!(
        "{} _{:02}-{:02}-{} _lúc_{:02}h{:02}.json",
        name,
        now.day(),
        now.month(),
        now.year(),
        now.hour(),
        now.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 18, 36, 12).unwrap()
    }

    #[test]
    fn test_file_name_template() {
        assert_eq!(
            file_name(None, fixed_time()),
            "nhomthanhuupn _07-03-2024 _lúc_18h36.json"
        );
    }

    #[test]
    fn test_file_name_owner_trimmed() {
        assert_eq!(
            file_name(Some("  Trần Đại Quí "), fixed_time()),
            "Trần Đại Quí _07-03-2024 _lúc_18h36.json"
        );
        // Whitespace-only owner falls back to the group identifier.
        assert_eq!(
            file_name(Some("   "), fixed_time()),
            "nhomthanhuupn _07-03-2024 _lúc_18h36.json"
        );
    }

    #[test]
    fn test_file_name_zero_padding() {
        let early = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 0).unwrap();
        assert_eq!(
            file_name(None, early),
            "nhomthanhuupn _02-01-2025 _lúc_03h04.json"
        );
    }

    #[test]
    fn test_document_wire_keys() {
        let doc = BackupDocument::assemble(
            Snapshot {
                members: vec![],
                guests: vec![],
                events: vec![],
                group_info: GroupInfo::default(),
            },
            Value::Object(Default::default()),
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["version"], BACKUP_VERSION);
        assert_eq!(value["appName"], APP_NAME);
        for key in ["groupInfo", "members", "guests", "events", "themeSettings", "exportDate"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
