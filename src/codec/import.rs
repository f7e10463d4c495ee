//! Advisory import of backup documents.
//!
//! The import contract is trusting rather than strictly validating:
//! whichever recognized top-level sections are present are decoded and
//! later replace the corresponding canonical state wholesale; absent
//! sections are left untouched and unrecognized keys are ignored. Only
//! outright unparseable input, or a document carrying none of the
//! recognized sections, is rejected.

use crate::error::{Result, StoreError};
use crate::types::{Event, GroupInfo, Member};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Sections of a backup document that were present and decoded.
#[derive(Clone, Debug, Default)]
pub struct ImportUpdate {
    pub members: Option<Vec<Member>>,
    pub guests: Option<Vec<Member>>,
    pub events: Option<Vec<Event>>,
    pub group_info: Option<GroupInfo>,
    pub theme_settings: Option<Value>,
}

impl ImportUpdate {
    pub fn is_empty(&self) -> bool {
        self.members.is_none()
            && self.guests.is_none()
            && self.events.is_none()
            && self.group_info.is_none()
            && self.theme_settings.is_none()
    }
}

/// Parse an uploaded document into the sections it carries.
///
/// Decoding is all-or-nothing: a present section that cannot be decoded
/// fails the whole import before any state is touched. Within a
/// section, the domain types themselves are permissive (missing scalar
/// fields default) so documents from older application versions load.
pub fn parse_backup(raw: &str) -> Result<ImportUpdate> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::MalformedBackup(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::MalformedBackup("expected a top-level object".to_string()))?;

    let mut update = ImportUpdate::default();
    if let Some(v) = obj.get("members") {
        update.members = Some(decode_section("members", v)?);
    }
    if let Some(v) = obj.get("guests") {
        update.guests = Some(decode_section("guests", v)?);
    }
    if let Some(v) = obj.get("events") {
        update.events = Some(decode_section("events", v)?);
    }
    if let Some(v) = obj.get("groupInfo") {
        update.group_info = Some(decode_section("groupInfo", v)?);
    }
    if let Some(v) = obj.get("themeSettings") {
        update.theme_settings = Some(v.clone());
    }

    if update.is_empty() {
        return Err(StoreError::MalformedBackup(
            "no recognized sections (members, guests, events, groupInfo, themeSettings)"
                .to_string(),
        ));
    }
    Ok(update)
}

fn decode_section<T: DeserializeOwned>(section: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| StoreError::MalformedBackup(format!("{section}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_unparseable_input() {
        let err = parse_backup("{ not json").unwrap_err();
        assert!(matches!(err, StoreError::MalformedBackup(_)));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(parse_backup("[1, 2, 3]").is_err());
        assert!(parse_backup("\"hello\"").is_err());
    }

    #[test]
    fn test_rejects_document_with_no_recognized_sections() {
        let err = parse_backup(r#"{"version": "2.5", "appName": "x"}"#).unwrap_err();
        assert!(matches!(err, StoreError::MalformedBackup(_)));
    }

    #[test]
    fn test_partial_document_keeps_absent_sections_none() {
        let raw = json!({
            "guests": [{"id": 9, "name": "Hoàng Văn Em"}],
            "somethingUnknown": true
        })
        .to_string();

        let update = parse_backup(&raw).unwrap();
        assert!(update.members.is_none());
        assert!(update.events.is_none());
        assert!(update.group_info.is_none());
        let guests = update.guests.unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].name, "Hoàng Văn Em");
    }

    #[test]
    fn test_undecodable_section_fails_whole_import() {
        let raw = json!({
            "members": [{"id": 1, "name": "ok"}],
            "events": "not an array"
        })
        .to_string();

        let err = parse_backup(&raw).unwrap_err();
        match err {
            StoreError::MalformedBackup(msg) => assert!(msg.starts_with("events")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_theme_settings_passed_through_opaque() {
        let raw = json!({"themeSettings": {"theme": "sunset", "fontSize": "lg"}}).to_string();
        let update = parse_backup(&raw).unwrap();
        assert_eq!(
            update.theme_settings.unwrap()["theme"],
            json!("sunset")
        );
    }
}
