//! Directed friend links with cached streak snapshots.
//!
//! Adding a friend copies their current numbers. The copy goes stale until
//! `refresh_friends` runs; nothing keeps it live.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountDirectory, UserAccount};
use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub username: String,
    pub streak_count: u32,
    pub best_streak: u32,
    pub captured_at: DateTime<Utc>,
}

impl Friend {
    fn snapshot(account: &UserAccount, now: DateTime<Utc>) -> Self {
        Self {
            username: account.username.clone(),
            streak_count: account.profile.streak.current_streak,
            best_streak: account.profile.streak.best_streak,
            captured_at: now,
        }
    }
}

impl AccountDirectory {
    pub fn add_friend(
        &mut self,
        owner: &str,
        target: &str,
        now: DateTime<Utc>,
    ) -> Result<Friend, AuthError> {
        let target = target.trim();
        if owner == target {
            return Err(AuthError::SelfFriend);
        }
        let snapshot = self
            .get(target)
            .map(|account| Friend::snapshot(account, now))
            .ok_or_else(|| AuthError::UnknownUser(target.to_string()))?;

        let account = self
            .get_mut(owner)
            .ok_or_else(|| AuthError::UnknownUser(owner.to_string()))?;
        if account.friends.iter().any(|f| f.username == target) {
            return Err(AuthError::AlreadyFriends(target.to_string()));
        }
        account.friends.push(snapshot.clone());
        tracing::info!(owner, friend = target, "friend added");
        Ok(snapshot)
    }

    pub fn remove_friend(&mut self, owner: &str, target: &str) -> Result<Friend, AuthError> {
        let target = target.trim();
        let account = self
            .get_mut(owner)
            .ok_or_else(|| AuthError::UnknownUser(owner.to_string()))?;
        let pos = account
            .friends
            .iter()
            .position(|f| f.username == target)
            .ok_or_else(|| AuthError::NotAFriend(target.to_string()))?;
        tracing::info!(owner, friend = target, "friend removed");
        Ok(account.friends.remove(pos))
    }

    /// Re-read every friend's numbers, after evaluating their streak against `today`.
    ///
    /// Friends whose account no longer exists keep their old snapshot.
    /// Returns how many snapshots were updated.
    pub fn refresh_friends(
        &mut self,
        owner: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<usize, AuthError> {
        let names: Vec<String> = self
            .get(owner)
            .ok_or_else(|| AuthError::UnknownUser(owner.to_string()))?
            .friends
            .iter()
            .map(|f| f.username.clone())
            .collect();

        let mut fresh = Vec::new();
        for name in names {
            if let Some(account) = self.get_mut(&name) {
                account.profile.streak.evaluate(today);
                fresh.push(Friend::snapshot(account, now));
            }
        }

        let updated = fresh.len();
        if let Some(account) = self.get_mut(owner) {
            for snap in fresh {
                if let Some(slot) = account.friends.iter_mut().find(|f| f.username == snap.username) {
                    *slot = snap;
                }
            }
        }
        tracing::debug!(owner, updated, "friend snapshots refreshed");
        Ok(updated)
    }

    /// Friends of `owner`, highest current streak first.
    pub fn friends_of(&self, owner: &str) -> Result<Vec<Friend>, AuthError> {
        let mut friends = self
            .get(owner)
            .ok_or_else(|| AuthError::UnknownUser(owner.to_string()))?
            .friends
            .clone();
        friends.sort_by(|a, b| {
            b.streak_count
                .cmp(&a.streak_count)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(friends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Profile;
    use crate::clock::parse_day;

    fn directory() -> AccountDirectory {
        let mut dir = AccountDirectory::default();
        let now = Utc::now();
        for name in ["amy", "bob", "cat"] {
            dir.signup(name, "pw", &format!("{name}@example.com"), Profile::default(), now)
                .unwrap();
        }
        dir
    }

    #[test]
    fn friendship_is_one_directional() {
        let mut dir = directory();
        dir.add_friend("amy", "bob", Utc::now()).unwrap();

        assert_eq!(dir.friends_of("amy").unwrap().len(), 1);
        assert!(dir.friends_of("bob").unwrap().is_empty());
    }

    #[test]
    fn add_rejects_self_unknown_and_duplicates() {
        let mut dir = directory();
        let now = Utc::now();
        assert_eq!(dir.add_friend("amy", "amy", now).unwrap_err(), AuthError::SelfFriend);
        assert_eq!(
            dir.add_friend("amy", "zed", now).unwrap_err(),
            AuthError::UnknownUser("zed".into())
        );
        dir.add_friend("amy", "bob", now).unwrap();
        assert_eq!(
            dir.add_friend("amy", "bob", now).unwrap_err(),
            AuthError::AlreadyFriends("bob".into())
        );
    }

    #[test]
    fn remove_unknown_friend_fails() {
        let mut dir = directory();
        assert_eq!(
            dir.remove_friend("amy", "bob").unwrap_err(),
            AuthError::NotAFriend("bob".into())
        );
    }

    #[test]
    fn snapshot_goes_stale_until_refreshed() {
        let mut dir = directory();
        let now = Utc::now();
        let day = parse_day("2024-03-01").unwrap();
        dir.add_friend("amy", "bob", now).unwrap();

        let bob = dir.get_mut("bob").unwrap();
        bob.profile.streak.evaluate(day);
        bob.profile.streak.check_in(day);

        assert_eq!(dir.friends_of("amy").unwrap()[0].streak_count, 0);
        assert_eq!(dir.refresh_friends("amy", day, now).unwrap(), 1);
        assert_eq!(dir.friends_of("amy").unwrap()[0].streak_count, 1);
    }

    #[test]
    fn friends_sorted_by_streak() {
        let mut dir = directory();
        let now = Utc::now();
        let day = parse_day("2024-03-01").unwrap();
        let cat = dir.get_mut("cat").unwrap();
        cat.profile.streak.check_in(day);

        dir.add_friend("amy", "bob", now).unwrap();
        dir.add_friend("amy", "cat", now).unwrap();

        let names: Vec<String> = dir.friends_of("amy").unwrap().into_iter().map(|f| f.username).collect();
        assert_eq!(names, vec!["cat", "bob"]);
    }
}
