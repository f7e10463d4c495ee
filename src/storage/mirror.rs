//! Write-through JSON mirror of canonical state onto a storage backend.
//!
//! Persistence is best effort: a failed write is logged and dropped for
//! that key only, and never blocks or reverts the in-memory mutation
//! that triggered it. A quota failure additionally surfaces one
//! user-facing alert, retrievable through [`Mirror::take_quota_alert`].

use crate::storage::backend::{StorageBackend, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Fixed storage keys. Kept byte-identical to the keys the original
/// application wrote so existing stored data keeps loading.
pub mod keys {
    pub const GROUP_INFO: &str = "phu_nhuan_group_info";
    pub const MEMBERS: &str = "phu_nhuan_members";
    pub const GUESTS: &str = "phu_nhuan_guests";
    pub const EVENTS: &str = "phu_nhuan_events";
    pub const ACTIVITY_LOG: &str = "phu_nhuan_activity_log";
    pub const WIDE_MODE: &str = "isWideMode";
    /// Plaintext admin password, stored raw rather than JSON-encoded.
    pub const ADMIN_PASSWORD: &str = "admin_pwd";
    /// Theme/appearance record owned by the presentation layer; opaque
    /// here, merged into backup documents.
    pub const THEME: &str = "app-theme";
}

/// User-facing alert shown once after a quota failure.
const QUOTA_ALERT: &str = "Bộ nhớ trình duyệt đã đầy do lưu quá nhiều ảnh chất lượng cao. \
Vui lòng xóa bớt một số thành viên hoặc ảnh cũ để tiếp tục.";

/// The mirror itself.
pub struct Mirror {
    backend: Box<dyn StorageBackend>,
    quota_alert: Option<String>,
    quota_warned: bool,
}

impl Mirror {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            quota_alert: None,
            quota_warned: false,
        }
    }

    /// Serialize and store a value under `key`. Failures are absorbed
    /// here per the persistence policy.
    pub fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write_raw(key, &json),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize state for storage");
            }
        }
    }

    /// Store an already-encoded string (used for the raw password key).
    pub fn write_raw(&mut self, key: &str, value: &str) {
        match self.backend.set(key, value) {
            Ok(()) => {}
            Err(StorageError::QuotaExceeded) => {
                tracing::error!(key, "storage quota exceeded, dropping write");
                if !self.quota_warned {
                    self.quota_warned = true;
                    self.quota_alert = Some(QUOTA_ALERT.to_string());
                }
            }
            Err(e) => {
                tracing::error!(key, error = %e, "storage write failed");
            }
        }
    }

    /// Load and decode a stored value. An unreadable value is logged
    /// and treated as absent so the caller falls back to defaults.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored value");
                None
            }
        }
    }

    pub fn load_raw(&self, key: &str) -> Option<String> {
        self.backend.get(key)
    }

    /// Pending one-shot quota alert, if a write ran out of space.
    pub fn take_quota_alert(&mut self) -> Option<String> {
        self.quota_alert.take()
    }

    // --- Presentation-layer keys ---

    pub fn wide_mode(&self) -> bool {
        self.load(keys::WIDE_MODE).unwrap_or(false)
    }

    pub fn set_wide_mode(&mut self, wide: bool) {
        self.persist(keys::WIDE_MODE, &wide);
    }

    /// Opaque theme record, `{}` when never written.
    pub fn theme_settings(&self) -> Value {
        self.load(keys::THEME)
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    pub fn set_theme_settings(&mut self, settings: &Value) {
        self.persist(keys::THEME, settings);
    }

    pub fn admin_password(&self) -> Option<String> {
        self.load_raw(keys::ADMIN_PASSWORD)
    }

    pub fn set_admin_password(&mut self, password: &str) {
        self.write_raw(keys::ADMIN_PASSWORD, password);
    }
}
