//! Integration tests for accounts, friends and journals through a store.

use chrono::{Duration, TimeZone, Utc};
use praise_core::{
    AuthError, CoreError, Event, JournalKind, MemoryStore, Preferences, StateStore,
};

fn prefs() -> Preferences {
    Preferences {
        timezone: "Europe/Paris".parse().unwrap(),
        ..Default::default()
    }
}

#[test]
fn friends_see_stale_numbers_until_refresh() {
    let store = MemoryStore::new();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

    let mut state = store.load(prefs(), now).unwrap();
    state.signup("bob", "pw", "bob@example.com", false, now).unwrap();
    state.check_in(now);
    state.logout(now).unwrap();

    state.signup("amy", "pw", "amy@example.com", false, now).unwrap();
    state.add_friend("bob", now).unwrap();
    store.save(&state).unwrap();

    // bob keeps checking in on his own
    let mut state = store.load(prefs(), now).unwrap();
    state.logout(now).unwrap();
    state.login("bob", "pw", now).unwrap();
    for d in 1..3 {
        state.check_in(now + Duration::days(d));
    }
    state.logout(now).unwrap();
    state.login("amy", "pw", now).unwrap();

    let later = now + Duration::days(2);
    assert_eq!(state.friends().unwrap()[0].streak_count, 1);
    let events = state.refresh_friends(later).unwrap();
    assert_eq!(events, vec![Event::FriendsRefreshed { updated: 1 }]);
    assert_eq!(state.friends().unwrap()[0].streak_count, 3);

    // bob does not see amy
    state.logout(later).unwrap();
    state.login("bob", "pw", later).unwrap();
    assert!(state.friends().unwrap().is_empty());
}

#[test]
fn auth_failures_are_typed_errors() {
    let now = Utc::now();
    let mut state = MemoryStore::new().load(prefs(), now).unwrap();
    state.signup("amy", "pw", "amy@example.com", false, now).unwrap();

    let dup = state.signup("amy", "pw2", "x@example.com", false, now).unwrap_err();
    assert!(matches!(dup, CoreError::Auth(AuthError::UsernameTaken(_))));

    let empty = state.signup("", "", "", false, now).unwrap_err();
    assert!(matches!(empty, CoreError::Auth(AuthError::MissingFields)));

    let wrong = state.login("amy", "nope", now).unwrap_err();
    assert_eq!(wrong.to_string(), "invalid username or password");
}

#[test]
fn journals_follow_the_logged_in_profile() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let mut state = store.load(prefs(), now).unwrap();

    state.add_journal(JournalKind::Reflection, "guest thought", now).unwrap();
    state.signup("amy", "pw", "amy@example.com", false, now).unwrap();
    let added = state.add_journal(JournalKind::Gratitude, "tea", now).unwrap();
    let Event::JournalEntryAdded { id, .. } = added[0] else {
        panic!("expected JournalEntryAdded, got {:?}", added[0]);
    };
    store.save(&state).unwrap();

    let mut state = store.load(prefs(), now).unwrap();
    assert_eq!(state.journal(JournalKind::Gratitude).len(), 1);
    assert!(state.journal(JournalKind::Reflection).is_empty());
    state.delete_journal(JournalKind::Gratitude, id).unwrap();
    assert!(state.delete_journal(JournalKind::Gratitude, id).is_err());

    state.logout(now).unwrap();
    assert_eq!(state.journal(JournalKind::Reflection)[0].text, "guest thought");
}
