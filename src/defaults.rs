//! Bundled seed dataset used when the backing storage is empty.

use crate::types::{
    Event, EventId, GroupInfo, KeyEvent, MediaItem, MediaKind, Member, MemberId, SocialLinks,
};

pub fn group_info() -> GroupInfo {
    GroupInfo {
        history: "NHÓM THÂN HỬU PHÚ NHUẬN được thành lập vào năm 2010 bởi một nhóm bạn bè \
cùng chung chí hướng, mong muốn tạo ra một không gian kết nối, chia sẻ và hỗ trợ lẫn nhau \
trong cuộc sống và công việc tại quận Phú Nhuận."
            .to_string(),
        mission: "Mục tiêu của NHÓM THÂN HỬU PHÚ NHUẬN là xây dựng một cộng đồng thân hữu \
đoàn kết, vững mạnh, nơi mỗi thành viên đều có thể tìm thấy sự sẻ chia, học hỏi kinh nghiệm \
và cùng nhau phát triển."
            .to_string(),
        key_events: vec![
            KeyEvent {
                id: "ke-seed-1".to_string(),
                title: "Ngày Thầy thuốc Việt Nam 27/2".to_string(),
                description: "Tổ chức tri ân các thành viên và thân hữu làm trong ngành y."
                    .to_string(),
            },
            KeyEvent {
                id: "ke-seed-2".to_string(),
                title: "Ngày Nhà giáo Việt Nam 20/11".to_string(),
                description: "Vinh danh các thành viên là nhà giáo.".to_string(),
            },
            KeyEvent {
                id: "ke-seed-3".to_string(),
                title: "Chương trình từ thiện 'Xuân Yêu Thương'".to_string(),
                description: "Hoạt động thường niên vào mỗi dịp Tết Nguyên Đán.".to_string(),
            },
        ],
        hero_image_urls: vec![
            "https://images.unsplash.com/photo-1511632765486-a01980e01a18?q=80&w=1000".to_string(),
            "https://images.unsplash.com/photo-1529156069898-49953e39b3ac?q=80&w=1000".to_string(),
        ],
        group_anthem_media: Some(MediaItem {
            id: "anthem-yt-1".to_string(),
            kind: MediaKind::Youtube,
            url: "https://www.youtube.com/watch?v=kgjrCFiGkOY".to_string(),
            title: Some("Bài ca NHÓM THÂN HỬU PHÚ NHUẬN".to_string()),
            thumbnail_url: None,
        }),
        broadcast_url: Some("https://zalo.me/g/ilzakd825".to_string()),
        social_links: Some(SocialLinks {
            facebook: Some("https://facebook.com".to_string()),
            zalo: Some("https://zalo.me".to_string()),
            website: Some("https://example.com".to_string()),
            viber: Some("https://viber.com".to_string()),
        }),
    }
}

fn seed_member(
    id: i64,
    name: &str,
    role: &str,
    profession: &str,
    login_code: &str,
    joined: &str,
    is_admin: bool,
) -> Member {
    Member {
        id: MemberId(id),
        name: name.to_string(),
        role: role.to_string(),
        description: String::new(),
        profession: profession.to_string(),
        email: format!("member-{id}@example.com"),
        phone_number: None,
        address: "Q. Phú Nhuận, HCMC".to_string(),
        avatar_url: format!("https://i.pravatar.cc/300?u={id}"),
        activities: vec![],
        login_code: login_code.to_string(),
        is_admin: is_admin.then_some(true),
        joined_date: Some(joined.to_string()),
        intro_images: None,
        personal_links: None,
        knowledge_sharing: None,
    }
}

pub fn members() -> Vec<Member> {
    vec![
        seed_member(1, "Trần Đại Quí", "Trưởng nhóm", "Kiến trúc sư", "ANNGUYEN-A1B2", "2010-01-15", true),
        seed_member(2, "Nguyễn Văn Bình", "Phó nhóm", "Kỹ sư xây dựng", "BINHNG-B2C3", "2012-05-20", false),
    ]
}

pub fn guests() -> Vec<Member> {
    vec![seed_member(
        5,
        "Hoàng Văn Em",
        "Cộng tác viên",
        "Nhiếp ảnh gia",
        "EMHOANG-E5F6",
        "2023-01-10",
        false,
    )]
}

pub fn events() -> Vec<Event> {
    vec![Event {
        id: EventId(1),
        name: "Gala Dinner Chào Năm Mới 2024".to_string(),
        date: "December 31, 2023".to_string(),
        location: "Trung tâm Hội nghị White Palace, Q. Phú Nhuận".to_string(),
        description: "Buổi tiệc thân mật tổng kết một năm hoạt động và chào đón năm mới."
            .to_string(),
        media: vec![
            MediaItem {
                id: "evt1-img1".to_string(),
                kind: MediaKind::Image,
                url: "https://picsum.photos/seed/event1_1/400/300".to_string(),
                title: None,
                thumbnail_url: None,
            },
            MediaItem {
                id: "evt1-yt1".to_string(),
                kind: MediaKind::Youtube,
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                title: None,
                thumbnail_url: None,
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_invariants() {
        let members = members();
        let guests = guests();

        // Unique ids and login codes across the union.
        let mut ids: Vec<i64> = members.iter().chain(&guests).map(|m| m.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), members.len() + guests.len());

        let mut codes: Vec<&str> = members
            .iter()
            .chain(&guests)
            .map(|m| m.login_code.as_str())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), members.len() + guests.len());

        // Every seed event carries media.
        assert!(events().iter().all(|e| !e.media.is_empty()));
    }
}
