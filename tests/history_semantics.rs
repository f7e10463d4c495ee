//! Undo/redo semantics across the store.

use proptest::prelude::*;
use roster::{AppStore, EventDraft, MemberCollection, MemoryBackend, Snapshot, HISTORY_CAP};

fn test_store() -> AppStore {
    AppStore::open(Box::new(MemoryBackend::new()))
}

fn live_state(store: &AppStore) -> Snapshot {
    Snapshot {
        members: store.members().to_vec(),
        guests: store.guests().to_vec(),
        events: store.events().to_vec(),
        group_info: store.group_info().clone(),
    }
}

#[test]
fn test_undo_redo_round_trip() {
    let mut store = test_store();

    let mut states = vec![live_state(&store)];
    for i in 0..10 {
        store.set_history_text(format!("chapter {i}"));
        states.push(live_state(&store));
    }

    // Undo all the way back, checking each intermediate state.
    for expected in states.iter().rev().skip(1) {
        assert!(store.undo());
        assert_eq!(&live_state(&store), expected);
    }
    assert!(!store.can_undo());

    // Redo all the way forward again.
    for expected in states.iter().skip(1) {
        assert!(store.redo());
        assert_eq!(&live_state(&store), expected);
    }
    assert_eq!(&live_state(&store), states.last().unwrap());
    assert!(!store.can_redo());
}

#[test]
fn test_history_cap_boundary() {
    let mut store = test_store();

    // 16 distinct mutations; only the most recent 15 snapshots survive.
    for i in 0..16 {
        store.set_mission_text(format!("mission {i}"));
    }

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, HISTORY_CAP);

    // The oldest snapshot was evicted: we land on "mission 0", not the
    // seed mission, and the 16th undo attempt is a no-op.
    assert_eq!(store.group_info().mission, "mission 0");
    assert!(!store.undo());
    assert_eq!(store.group_info().mission, "mission 0");
}

#[test]
fn test_new_mutation_clears_redo() {
    let mut store = test_store();

    store.set_history_text("one");
    store.set_history_text("two");
    assert!(store.undo());
    assert!(store.can_redo());

    // Any fresh mutation invalidates the redo path.
    store.set_history_text("three");
    assert!(!store.can_redo());
    assert!(!store.redo());
    assert_eq!(store.group_info().history, "three");
}

#[test]
fn test_undo_spans_all_collections() {
    let mut store = test_store();
    let members_before = store.members().to_vec();

    store.bulk_create_members(
        &["data:image/png;base64,AA".to_string()],
        MemberCollection::Members,
    );
    store.create_event(EventDraft {
        name: "Picnic".into(),
        ..Default::default()
    });

    assert!(store.undo());
    assert!(store.undo());
    assert_eq!(store.members(), &members_before[..]);
    assert!(store.events().iter().all(|e| e.name != "Picnic"));

    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(store.members().len(), members_before.len() + 1);
    assert!(store.events().iter().any(|e| e.name == "Picnic"));
}

#[test]
fn test_activity_log_is_outside_history() {
    let mut store = test_store();
    store.bulk_create_members(
        &["data:image/png;base64,AA".to_string()],
        MemberCollection::Guests,
    );
    let entries_after = store.activity_log().len();

    assert!(store.undo());
    // The journal keeps its entry even though the mutation was undone.
    assert_eq!(store.activity_log().len(), entries_after);
}

// Always-checkpointing mutations used by the property below.
#[derive(Clone, Debug)]
enum Mutation {
    HistoryText(String),
    MissionText(String),
    CreateEvent(String),
    BulkAdd(u8, bool),
    HeroImages(Vec<String>),
}

fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Mutation::HistoryText),
        "[a-z]{1,12}".prop_map(Mutation::MissionText),
        "[a-z]{1,12}".prop_map(Mutation::CreateEvent),
        (1u8..3, any::<bool>()).prop_map(|(n, guests)| Mutation::BulkAdd(n, guests)),
        prop::collection::vec("[a-z]{1,8}".prop_map(|s| format!("https://img/{s}")), 0..3)
            .prop_map(Mutation::HeroImages),
    ]
}

fn apply(store: &mut AppStore, mutation: &Mutation) {
    match mutation {
        Mutation::HistoryText(text) => store.set_history_text(text.clone()),
        Mutation::MissionText(text) => store.set_mission_text(text.clone()),
        Mutation::CreateEvent(name) => {
            store.create_event(EventDraft {
                name: name.clone(),
                ..Default::default()
            });
        }
        Mutation::BulkAdd(n, guests) => {
            let images: Vec<String> = (0..*n).map(|i| format!("data:image/{i}")).collect();
            let collection = if *guests {
                MemberCollection::Guests
            } else {
                MemberCollection::Members
            };
            store.bulk_create_members(&images, collection);
        }
        Mutation::HeroImages(urls) => store.set_hero_images(urls.clone()),
    }
}

proptest! {
    // For any sequence of at most 15 mutations, undoing them all and
    // redoing them all restores the exact final state.
    #[test]
    fn prop_undo_all_redo_all(mutations in prop::collection::vec(mutation_strategy(), 1..=15)) {
        let mut store = test_store();
        for mutation in &mutations {
            apply(&mut store, mutation);
        }
        let final_state = live_state(&store);

        for _ in 0..mutations.len() {
            prop_assert!(store.undo());
        }
        prop_assert!(!store.can_undo());

        for _ in 0..mutations.len() {
            prop_assert!(store.redo());
        }
        prop_assert_eq!(live_state(&store), final_state);
    }

    // Login codes stay unique across the union no matter how members
    // are created.
    #[test]
    fn prop_login_codes_unique(batches in prop::collection::vec((1u8..4, any::<bool>()), 1..6)) {
        let mut store = test_store();
        for (n, guests) in batches {
            let images: Vec<String> = (0..n).map(|i| format!("data:image/{i}")).collect();
            let collection = if guests { MemberCollection::Guests } else { MemberCollection::Members };
            store.bulk_create_members(&images, collection);
        }

        let mut codes: Vec<&str> = store.all_users().map(|m| m.login_code.as_str()).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        prop_assert_eq!(codes.len(), total);
    }
}
