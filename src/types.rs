//! Core domain types for the roster store.
//!
//! Field names on the wire are camelCase so stored values and backup
//! documents stay byte-compatible with files produced by earlier
//! versions of the application.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a member or guest record.
///
/// Assigned from creation-time milliseconds (plus an index offset for
/// bulk creation). Unique across the union of both collections.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub i64);

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two person collections a record lives in.
///
/// Membership is positional: a record belongs to exactly one list and
/// carries no field recording which.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberCollection {
    Members,
    Guests,
}

impl MemberCollection {
    /// Label in the group's operating language, used in generated
    /// placeholder names and activity descriptions.
    pub fn label(self) -> &'static str {
        match self {
            MemberCollection::Members => "Thành viên",
            MemberCollection::Guests => "Khách mời",
        }
    }
}

/// Media attachment kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Youtube,
    Web,
}

/// A single media attachment on an event (or the group anthem).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaItem {
    /// New item with a freshly generated id.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            id: element_id("mi"),
            kind,
            url: url.into(),
            title: None,
            thumbnail_url: None,
        }
    }

    /// Synthesized placeholder image for events created with no media.
    pub fn event_placeholder(now_millis: i64) -> Self {
        Self {
            id: format!("evt-pl-{now_millis}"),
            kind: MediaKind::Image,
            url: format!("https://picsum.photos/seed/event{now_millis}/400/300"),
            title: None,
            thumbnail_url: None,
        }
    }
}

/// Optional personal links on a member record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zalo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viber: Option<String>,
}

/// Optional knowledge-sharing record on a member.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSharing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opinion: Option<String>,
}

/// A member or guest. The same shape serves both collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub activities: Vec<String>,
    /// Bearer credential for self-service login. Unique across the
    /// member+guest union.
    #[serde(default)]
    pub login_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_links: Option<PersonalLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_sharing: Option<KnowledgeSharing>,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.is_admin == Some(true)
    }
}

/// An event with its ordered media list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// Free-text date, not strictly ISO. See [`Event::parsed_date`].
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl Event {
    /// Best-effort parse of the free-text date for sorting and calendar
    /// placement. Tries the formats the application has historically
    /// written; returns `None` when nothing matches.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let text = self.date.trim();
        if text.is_empty() {
            return None;
        }
        const FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d/%m/%Y", "%d-%m-%Y"];
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    }
}

/// Input for creating a new event, before the id is assigned.
#[derive(Clone, Debug, Default)]
pub struct EventDraft {
    pub name: String,
    pub date: String,
    pub location: String,
    pub description: String,
    pub media: Vec<MediaItem>,
}

/// A key-event summary shown on the home page.
///
/// Carries a stable generated id so entries can be edited or removed
/// without index-shift hazards; documents written before ids existed
/// deserialize with an empty id, backfilled by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl KeyEvent {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: element_id("ke"),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Optional social links on the group record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zalo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viber: Option<String>,
}

/// Singleton group metadata record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub key_events: Vec<KeyEvent>,
    #[serde(default)]
    pub hero_image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_anthem_media: Option<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

/// Closed set of activity-journal entry kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    MemberAdded,
    MemberUpdated,
    MemberDeleted,
    EventCreated,
    EventUpdated,
    EventDeleted,
    BroadcastSent,
    LinksUpdated,
}

/// One entry in the activity journal.
///
/// Immutable once created; the id is the creation-time millisecond
/// count, which doubles as the sort key. A same-millisecond collision
/// between two entries is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time copy of the four undoable collections.
///
/// Owned values throughout, so a stored snapshot can never alias live
/// state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub guests: Vec<Member>,
    pub events: Vec<Event>,
    pub group_info: GroupInfo,
}

const ID_SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a collision-tolerant list-element id: prefix, creation-time
/// milliseconds, and a short random base-36 suffix.
pub fn element_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ID_SUFFIX_CHARS[rng.gen_range(0..ID_SUFFIX_CHARS.len())] as char)
        .collect();
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Extract the 11-character video id from the common YouTube URL forms
/// (watch, embed, shorts, short-link).
pub fn youtube_video_id(url: &str) -> Option<&str> {
    if !url.contains("youtube.com") && !url.contains("youtu.be") {
        return None;
    }
    const MARKERS: &[&str] = &["watch?v=", "embed/", "shorts/", "youtu.be/", "/v/"];
    for marker in MARKERS {
        if let Some(pos) = url.find(marker) {
            let rest = &url[pos + marker.len()..];
            let end = rest
                .char_indices()
                .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            if end >= 11 {
                return Some(&rest[..11]);
            }
        }
    }
    None
}

/// Normalize any recognized YouTube URL to its canonical watch form.
pub fn youtube_watch_url(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("https://www.youtube.com/watch?v={id}"))
}
