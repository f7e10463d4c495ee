//! The application store tying canonical state, history, persistence,
//! and the backup codec together.
//!
//! `AppStore` owns the five canonical collections and exposes every
//! mutation as a method. Each mutation checkpoints pre-mutation state
//! into the history manager, replaces the affected collection with a
//! new value, appends one activity-journal entry, and mirrors the
//! changed keys to storage. History replay goes through a private
//! restore path that never checkpoints, so undo/redo cannot be
//! mistaken for fresh mutations.
//!
//! The store is single-threaded by contract: mutations take `&mut
//! self` and run to completion synchronously.

use crate::activity::ActivityLog;
use crate::codec::backup::{file_name, BackupDocument, ExportBundle};
use crate::codec::import::parse_backup;
use crate::defaults;
use crate::error::Result;
use crate::history::History;
use crate::storage::{keys, Mirror, StorageBackend};
use crate::types::{
    element_id, ActivityKind, Event, EventDraft, EventId, GroupInfo, KeyEvent, MediaItem, Member,
    MemberCollection, MemberId, Snapshot, SocialLinks,
};
use chrono::{Local, Utc};
use rand::Rng;

/// Length of generated login codes.
pub const LOGIN_CODE_LEN: usize = 8;

const LOGIN_CODE_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Outcome of [`AppStore::update_member`].
#[derive(Clone, Debug)]
pub enum UpdateOutcome {
    /// The change was applied to shared state.
    Applied(Member),

    /// A self-service edit: the change was applied, the session ended,
    /// and a backup named after the editing member was prepared for
    /// out-of-band delivery to an administrator. The caller confirms
    /// the hand-off and performs the download.
    SelfServiceHandOff {
        member: Member,
        bundle: ExportBundle,
        /// User-facing notice instructing delivery of the file.
        notice: String,
    },

    /// Unknown id; nothing changed.
    NotFound,
}

#[derive(Debug, Default)]
struct Session {
    current_user: Option<MemberId>,
    admin_mode: bool,
}

/// The store.
pub struct AppStore {
    members: Vec<Member>,
    guests: Vec<Member>,
    events: Vec<Event>,
    group_info: GroupInfo,
    activity: ActivityLog,
    history: History,
    mirror: Mirror,
    session: Session,
}

impl AppStore {
    /// Open a store over the given backend, rehydrating persisted state
    /// and falling back to the bundled seed dataset per key.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let mirror = Mirror::new(backend);
        let members = mirror.load(keys::MEMBERS).unwrap_or_else(defaults::members);
        let guests = mirror.load(keys::GUESTS).unwrap_or_else(defaults::guests);
        let events = mirror.load(keys::EVENTS).unwrap_or_else(defaults::events);
        let group_info = mirror
            .load(keys::GROUP_INFO)
            .unwrap_or_else(defaults::group_info);
        let activity = ActivityLog::from_entries(mirror.load(keys::ACTIVITY_LOG).unwrap_or_default());

        Self {
            members,
            guests,
            events,
            group_info,
            activity,
            history: History::new(),
            mirror,
            session: Session::default(),
        }
    }

    // --- Accessors ---

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn guests(&self) -> &[Member] {
        &self.guests
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn group_info(&self) -> &GroupInfo {
        &self.group_info
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Members and guests as one sequence, members first.
    pub fn all_users(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().chain(self.guests.iter())
    }

    fn find_member(&self, id: MemberId) -> Option<&Member> {
        self.all_users().find(|m| m.id == id)
    }

    fn collection_of(&self, id: MemberId) -> Option<MemberCollection> {
        if self.members.iter().any(|m| m.id == id) {
            Some(MemberCollection::Members)
        } else if self.guests.iter().any(|g| g.id == id) {
            Some(MemberCollection::Guests)
        } else {
            None
        }
    }

    // --- Internal plumbing ---

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            members: self.members.clone(),
            guests: self.guests.clone(),
            events: self.events.clone(),
            group_info: self.group_info.clone(),
        }
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    /// Replace live state from a history snapshot. Never checkpoints.
    fn restore(&mut self, snapshot: Snapshot) {
        self.members = snapshot.members;
        self.guests = snapshot.guests;
        self.events = snapshot.events;
        self.group_info = snapshot.group_info;
        self.persist_members();
        self.persist_guests();
        self.persist_events();
        self.persist_group_info();
    }

    fn persist_members(&mut self) {
        let members = std::mem::take(&mut self.members);
        self.mirror.persist(keys::MEMBERS, &members);
        self.members = members;
    }

    fn persist_guests(&mut self) {
        let guests = std::mem::take(&mut self.guests);
        self.mirror.persist(keys::GUESTS, &guests);
        self.guests = guests;
    }

    fn persist_events(&mut self) {
        let events = std::mem::take(&mut self.events);
        self.mirror.persist(keys::EVENTS, &events);
        self.events = events;
    }

    fn persist_group_info(&mut self) {
        let info = std::mem::take(&mut self.group_info);
        self.mirror.persist(keys::GROUP_INFO, &info);
        self.group_info = info;
    }

    fn log_activity(&mut self, kind: ActivityKind, description: String) {
        self.activity.record(kind, description);
        let entries = self.activity.entries().to_vec();
        self.mirror.persist(keys::ACTIVITY_LOG, &entries);
    }

    fn generate_login_code(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..LOGIN_CODE_LEN)
                .map(|_| LOGIN_CODE_CHARS[rng.gen_range(0..LOGIN_CODE_CHARS.len())] as char)
                .collect();
            if !self.all_users().any(|m| m.login_code == code) {
                return code;
            }
        }
    }

    // --- Member operations ---

    /// Create one placeholder record per uploaded image, prepended to
    /// the chosen collection. Each record gets a fresh unique login
    /// code and today's joined date. Never fails.
    pub fn bulk_create_members(
        &mut self,
        images: &[String],
        collection: MemberCollection,
    ) -> Vec<MemberId> {
        if images.is_empty() {
            return Vec::new();
        }
        self.checkpoint();

        let label = collection.label();
        let now = Utc::now();
        let base_id = now.timestamp_millis();
        let today = now.format("%Y-%m-%d").to_string();

        let mut created: Vec<Member> = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let id = MemberId(base_id + index as i64);
            // Uniqueness must also hold against records created earlier
            // in this same batch.
            let mut code = self.generate_login_code();
            while created.iter().any(|m| m.login_code == code) {
                code = self.generate_login_code();
            }
            created.push(Member {
                id,
                name: format!("{label} mới {}", index + 1),
                role: "Chưa cập nhật".to_string(),
                description: "Cần cập nhật thông tin".to_string(),
                profession: "Chưa cập nhật".to_string(),
                email: format!("new-member-{}@example.com", id.0),
                phone_number: None,
                address: "Chưa cập nhật".to_string(),
                avatar_url: image.clone(),
                activities: vec![],
                login_code: code,
                is_admin: None,
                joined_date: Some(today.clone()),
                intro_images: None,
                personal_links: None,
                knowledge_sharing: None,
            });
        }

        let ids: Vec<MemberId> = created.iter().map(|m| m.id).collect();
        match collection {
            MemberCollection::Members => {
                created.extend(self.members.drain(..));
                self.members = created;
                self.persist_members();
            }
            MemberCollection::Guests => {
                created.extend(self.guests.drain(..));
                self.guests = created;
                self.persist_guests();
            }
        }

        self.log_activity(
            ActivityKind::MemberAdded,
            format!("Đã thêm {} {label} mới.", images.len()),
        );
        ids
    }

    /// Replace a member record by id in whichever collection holds it.
    /// Collection membership is immutable through this operation.
    ///
    /// A self-service edit (admin mode off, session user editing their
    /// own record) is not persisted silently: the resulting state is
    /// packaged into a backup named after the member, the session ends,
    /// and the caller receives the bundle for out-of-band delivery.
    pub fn update_member(&mut self, updated: Member) -> Result<UpdateOutcome> {
        let Some(collection) = self.collection_of(updated.id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        self.checkpoint();

        let list = match collection {
            MemberCollection::Members => &mut self.members,
            MemberCollection::Guests => &mut self.guests,
        };
        *list = list
            .iter()
            .map(|m| {
                if m.id == updated.id {
                    updated.clone()
                } else {
                    m.clone()
                }
            })
            .collect();
        match collection {
            MemberCollection::Members => self.persist_members(),
            MemberCollection::Guests => self.persist_guests(),
        }

        let self_service =
            !self.session.admin_mode && self.session.current_user == Some(updated.id);
        if self_service {
            let bundle = self.export(Some(&updated.name))?;
            self.session.current_user = None;
            self.log_activity(
                ActivityKind::MemberUpdated,
                format!(
                    "{} đã hoàn tất tự cập nhật và tải về tệp dữ liệu.",
                    updated.name
                ),
            );
            let notice = format!(
                "Thông tin của {} đã được cập nhật thành công!\n\n\
Hệ thống đã tự động tải về file: {}\n\n\
Vui lòng gửi file này cho Trưởng nhóm để hoàn tất cập nhật chính thức.",
                updated.name, bundle.file_name
            );
            return Ok(UpdateOutcome::SelfServiceHandOff {
                member: updated,
                bundle,
                notice,
            });
        }

        self.log_activity(
            ActivityKind::MemberUpdated,
            format!("Thông tin của {} đã được cập nhật.", updated.name),
        );
        Ok(UpdateOutcome::Applied(updated))
    }

    /// Remove the id from both collections. Idempotent: an absent id is
    /// a no-op returning `false`. Deleting the session user ends the
    /// session.
    pub fn delete_member(&mut self, id: MemberId) -> bool {
        let Some(name) = self.find_member(id).map(|m| m.name.clone()) else {
            return false;
        };
        self.checkpoint();

        self.members.retain(|m| m.id != id);
        self.guests.retain(|g| g.id != id);
        self.persist_members();
        self.persist_guests();

        if self.session.current_user == Some(id) {
            self.session.current_user = None;
        }

        self.log_activity(
            ActivityKind::MemberDeleted,
            format!("Thành viên {name} đã bị xóa."),
        );
        true
    }

    /// Regenerate a member's login code with the same collision
    /// avoidance as creation. Returns the new code so the caller can
    /// refresh its selection, or `None` for an unknown id.
    pub fn regenerate_login_code(&mut self, id: MemberId) -> Option<String> {
        let collection = self.collection_of(id)?;
        self.checkpoint();

        let code = self.generate_login_code();
        let list = match collection {
            MemberCollection::Members => &mut self.members,
            MemberCollection::Guests => &mut self.guests,
        };
        *list = list
            .iter()
            .map(|m| {
                if m.id == id {
                    let mut updated = m.clone();
                    updated.login_code = code.clone();
                    updated
                } else {
                    m.clone()
                }
            })
            .collect();
        match collection {
            MemberCollection::Members => self.persist_members(),
            MemberCollection::Guests => self.persist_guests(),
        }

        self.log_activity(
            ActivityKind::MemberUpdated,
            "Admin đã tạo mã đăng nhập mới.".to_string(),
        );
        Some(code)
    }

    /// Wholesale replacement implementing drag-and-drop ordering. No
    /// permutation validation; caller responsibility.
    pub fn reorder_members(&mut self, ordered: Vec<Member>) {
        self.checkpoint();
        self.members = ordered;
        self.persist_members();
    }

    pub fn reorder_guests(&mut self, ordered: Vec<Member>) {
        self.checkpoint();
        self.guests = ordered;
        self.persist_guests();
    }

    pub fn reorder_events(&mut self, ordered: Vec<Event>) {
        self.checkpoint();
        self.events = ordered;
        self.persist_events();
    }

    // --- Event operations ---

    /// Create an event with a time-based id, prepended to the list. An
    /// empty media list gets one synthesized placeholder image.
    pub fn create_event(&mut self, draft: EventDraft) -> EventId {
        self.checkpoint();

        let now = Utc::now().timestamp_millis();
        let id = EventId(now);
        let media = if draft.media.is_empty() {
            vec![MediaItem::event_placeholder(now)]
        } else {
            draft.media
        };
        let event = Event {
            id,
            name: draft.name,
            date: draft.date,
            location: draft.location,
            description: draft.description,
            media,
        };
        let name = event.name.clone();

        let mut events = Vec::with_capacity(self.events.len() + 1);
        events.push(event);
        events.extend(self.events.drain(..));
        self.events = events;
        self.persist_events();

        self.log_activity(
            ActivityKind::EventCreated,
            format!("Sự kiện \"{name}\" đã được tạo."),
        );
        id
    }

    /// Id-keyed replacement. Unknown id is a silent no-op.
    pub fn update_event(&mut self, updated: Event) -> bool {
        if !self.events.iter().any(|e| e.id == updated.id) {
            return false;
        }
        self.checkpoint();

        let name = updated.name.clone();
        self.events = self
            .events
            .iter()
            .map(|e| {
                if e.id == updated.id {
                    updated.clone()
                } else {
                    e.clone()
                }
            })
            .collect();
        self.persist_events();

        self.log_activity(
            ActivityKind::EventUpdated,
            format!("Sự kiện \"{name}\" đã được cập nhật."),
        );
        true
    }

    /// Idempotent delete by id.
    pub fn delete_event(&mut self, id: EventId) -> bool {
        let Some(name) = self
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
        else {
            return false;
        };
        self.checkpoint();

        self.events.retain(|e| e.id != id);
        self.persist_events();

        self.log_activity(
            ActivityKind::EventDeleted,
            format!("Sự kiện \"{name}\" đã được xóa."),
        );
        true
    }

    // --- Group info operations ---

    pub fn set_history_text(&mut self, text: impl Into<String>) {
        self.checkpoint();
        self.group_info.history = text.into();
        self.persist_group_info();
    }

    pub fn set_mission_text(&mut self, text: impl Into<String>) {
        self.checkpoint();
        self.group_info.mission = text.into();
        self.persist_group_info();
    }

    pub fn set_hero_images(&mut self, urls: Vec<String>) {
        self.checkpoint();
        self.group_info.hero_image_urls = urls;
        self.persist_group_info();
        self.log_activity(
            ActivityKind::MemberUpdated,
            "Ảnh bìa trang chủ đã được cập nhật.".to_string(),
        );
    }

    /// Replace the key-event list, backfilling a stable id on any entry
    /// that arrived without one.
    pub fn set_key_events(&mut self, mut key_events: Vec<KeyEvent>) {
        self.checkpoint();
        ensure_key_event_ids(&mut key_events);
        self.group_info.key_events = key_events;
        self.persist_group_info();
        self.log_activity(
            ActivityKind::EventUpdated,
            "Danh sách các sự kiện quan trọng trang chủ đã được cập nhật.".to_string(),
        );
    }

    pub fn set_social_links(&mut self, links: SocialLinks) {
        self.checkpoint();
        self.group_info.social_links = Some(links);
        self.persist_group_info();
        self.log_activity(
            ActivityKind::LinksUpdated,
            "Các liên kết mạng xã hội đã được cập nhật.".to_string(),
        );
    }

    pub fn set_anthem(&mut self, media: Option<MediaItem>) {
        self.checkpoint();
        self.group_info.group_anthem_media = media;
        self.persist_group_info();
        self.log_activity(
            ActivityKind::MemberUpdated,
            "Bài ca của nhóm đã được cập nhật.".to_string(),
        );
    }

    pub fn set_broadcast_url(&mut self, url: Option<String>) {
        self.checkpoint();
        self.group_info.broadcast_url = url;
        self.persist_group_info();
        self.log_activity(
            ActivityKind::LinksUpdated,
            "Liên kết thông báo của nhóm đã được cập nhật.".to_string(),
        );
    }

    /// Journal a broadcast. Delivering the notification itself is the
    /// shell's concern; broadcasts are not undoable state.
    pub fn record_broadcast(&mut self, title: &str) {
        self.log_activity(
            ActivityKind::BroadcastSent,
            format!("Admin đã gửi thông báo: \"{title}\""),
        );
    }

    // --- History ---

    /// Step back one snapshot. Returns `false` when there is nothing to
    /// undo. Infallible otherwise; the restored state is re-mirrored.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    // --- Backup ---

    /// Package current state (plus the stored theme record) into a
    /// backup document with a derived file name. Read-only; the
    /// download side effect belongs to the caller.
    pub fn export(&self, owner: Option<&str>) -> Result<ExportBundle> {
        let document = BackupDocument::assemble(self.snapshot(), self.mirror.theme_settings());
        Ok(ExportBundle {
            file_name: file_name(owner, Local::now()),
            json: document.to_json()?,
        })
    }

    /// Merge a backup document into canonical state: one history
    /// checkpoint, then wholesale replacement of whichever sections the
    /// document carries. Unparseable input fails with no state change.
    pub fn import(&mut self, raw: &str) -> Result<()> {
        let update = parse_backup(raw)?;
        self.checkpoint();

        if let Some(members) = update.members {
            self.members = members;
            self.persist_members();
        }
        if let Some(guests) = update.guests {
            self.guests = guests;
            self.persist_guests();
        }
        if let Some(events) = update.events {
            self.events = events;
            self.persist_events();
        }
        if let Some(mut group_info) = update.group_info {
            ensure_key_event_ids(&mut group_info.key_events);
            self.group_info = group_info;
            self.persist_group_info();
        }
        if let Some(theme) = update.theme_settings {
            self.mirror.set_theme_settings(&theme);
        }

        self.log_activity(
            ActivityKind::MemberUpdated,
            "Đã khôi phục toàn bộ dữ liệu & giao diện từ tệp dự phòng.".to_string(),
        );
        Ok(())
    }

    // --- Session ---

    /// Self-service login by code: trimmed, uppercased, plaintext
    /// comparison across the member+guest union.
    pub fn login(&mut self, code: &str) -> Option<Member> {
        let normalized = code.trim().to_uppercase();
        let member = self
            .all_users()
            .find(|m| m.login_code == normalized)?
            .clone();
        self.session.current_user = Some(member.id);
        self.log_activity(
            ActivityKind::MemberUpdated,
            format!("{} đã đăng nhập.", member.name),
        );
        Some(member)
    }

    pub fn logout(&mut self) {
        if let Some(id) = self.session.current_user.take() {
            if let Some(name) = self.find_member(id).map(|m| m.name.clone()) {
                self.log_activity(
                    ActivityKind::MemberUpdated,
                    format!("{name} đã đăng xuất."),
                );
            }
        }
    }

    pub fn current_user(&self) -> Option<&Member> {
        let id = self.session.current_user?;
        self.find_member(id)
    }

    pub fn is_admin_mode(&self) -> bool {
        self.session.admin_mode
    }

    /// Admin mode, or a logged-in member flagged as admin.
    pub fn is_effective_admin(&self) -> bool {
        self.session.admin_mode || self.current_user().map(Member::is_admin).unwrap_or(false)
    }

    pub fn has_admin_password(&self) -> bool {
        self.mirror
            .admin_password()
            .map(|p| !p.is_empty())
            .unwrap_or(false)
    }

    /// Set or change the admin password (plaintext by design) and turn
    /// admin mode on.
    pub fn set_admin_password(&mut self, password: &str) {
        let changing = self.has_admin_password();
        self.mirror.set_admin_password(password);
        self.session.admin_mode = true;
        let description = if changing {
            "Mật khẩu Admin đã được thay đổi."
        } else {
            "Mật khẩu Admin đã được tạo và chế độ Admin đã bật."
        };
        self.log_activity(ActivityKind::MemberUpdated, description.to_string());
    }

    /// Enable admin mode when the password matches. Plaintext compare,
    /// per the stored-credential model.
    pub fn enable_admin_mode(&mut self, password: &str) -> bool {
        match self.mirror.admin_password() {
            Some(stored) if !stored.is_empty() && stored == password => {
                self.session.admin_mode = true;
                self.log_activity(
                    ActivityKind::MemberUpdated,
                    "Chế độ Admin đã bật.".to_string(),
                );
                true
            }
            _ => false,
        }
    }

    pub fn disable_admin_mode(&mut self) {
        if self.session.admin_mode {
            self.session.admin_mode = false;
            self.log_activity(
                ActivityKind::MemberUpdated,
                "Chế độ Admin đã tắt.".to_string(),
            );
        }
    }

    // --- Shell helpers ---

    /// Context string handed to the chatbot collaborator alongside each
    /// message.
    pub fn chat_context(&self) -> String {
        let key_events: Vec<&str> = self
            .group_info
            .key_events
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        let recent: Vec<&str> = self
            .activity
            .entries()
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        format!(
            "Lịch sử nhóm: {}\nSứ mệnh: {}\nSố lượng thành viên: {}\nSố lượng khách mời: {}\n\
Sự kiện tiêu biểu: {}\nHoạt động gần đây: {}",
            self.group_info.history,
            self.group_info.mission,
            self.members.len(),
            self.guests.len(),
            key_events.join(", "),
            recent.join("; "),
        )
    }

    /// Pending one-shot storage-quota alert, if any write ran out of
    /// space since the last call.
    pub fn take_quota_alert(&mut self) -> Option<String> {
        self.mirror.take_quota_alert()
    }

    pub fn wide_mode(&self) -> bool {
        self.mirror.wide_mode()
    }

    pub fn set_wide_mode(&mut self, wide: bool) {
        self.mirror.set_wide_mode(wide);
    }
}

fn ensure_key_event_ids(key_events: &mut [KeyEvent]) {
    for key_event in key_events.iter_mut() {
        if key_event.id.is_empty() {
            key_event.id = element_id("ke");
        }
    }
}
