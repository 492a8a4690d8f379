//! Daily check-in streak state machine.
//!
//! `evaluate` must run against today's date before `check_in`. It is the
//! step that notices a missed day and breaks the streak. `check_in` is
//! idempotent within a day.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::milestone::{FireTier, Milestone};
use crate::clock::day_gap;

/// Result of evaluating the streak against today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Nothing has ever been checked in
    FirstUse,
    /// Today already counted
    AlreadyCheckedIn,
    /// Last check-in was yesterday; today is still open
    Continuing,
    /// A day was missed (or the clock went backwards) and the streak reset
    Broken { previous: u32, gap_days: i64 },
}

/// Result of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    AlreadyCheckedIn,
    CheckedIn {
        streak: u32,
        new_best: bool,
        milestone: Option<Milestone>,
    },
}

impl CheckInOutcome {
    pub fn milestone(&self) -> Option<Milestone> {
        match self {
            CheckInOutcome::CheckedIn { milestone, .. } => *milestone,
            CheckInOutcome::AlreadyCheckedIn => None,
        }
    }
}

/// Streak counters plus the set of checked-in days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTracker {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub last_check_in: Option<NaiveDate>,
    #[serde(default)]
    pub history: BTreeSet<NaiveDate>,
    /// Derived by `evaluate`, never persisted.
    #[serde(skip)]
    pub checked_in_today: bool,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive `checked_in_today` and break the streak if a day was missed.
    pub fn evaluate(&mut self, today: NaiveDate) -> Evaluation {
        // Persisted counters may come from an older or hand-edited document.
        self.best_streak = self.best_streak.max(self.current_streak);

        let Some(last) = self.last_check_in else {
            self.current_streak = 0;
            self.checked_in_today = false;
            return Evaluation::FirstUse;
        };

        if last == today {
            self.checked_in_today = true;
            return Evaluation::AlreadyCheckedIn;
        }

        self.checked_in_today = false;
        let gap_days = day_gap(last, today);
        if gap_days == 1 {
            return Evaluation::Continuing;
        }

        let previous = self.current_streak;
        self.current_streak = 0;
        self.last_check_in = None;
        tracing::info!(previous, gap_days, %last, %today, "streak broken");
        Evaluation::Broken { previous, gap_days }
    }

    /// Count today toward the streak. A second call on the same day is a no-op.
    pub fn check_in(&mut self, today: NaiveDate) -> CheckInOutcome {
        if self.checked_in_today || self.last_check_in == Some(today) {
            self.checked_in_today = true;
            return CheckInOutcome::AlreadyCheckedIn;
        }

        self.current_streak = self.current_streak.saturating_add(1);
        self.last_check_in = Some(today);
        self.checked_in_today = true;
        self.history.insert(today);

        let new_best = self.current_streak > self.best_streak;
        if new_best {
            self.best_streak = self.current_streak;
        }

        let milestone = Milestone::for_streak(self.current_streak);
        tracing::info!(streak = self.current_streak, best = self.best_streak, %today, "checked in");
        if let Some(m) = milestone {
            tracing::info!(days = m.days(), "milestone reached");
        }

        CheckInOutcome::CheckedIn {
            streak: self.current_streak,
            new_best,
            milestone,
        }
    }

    pub fn fire(&self) -> FireTier {
        FireTier::for_streak(self.current_streak)
    }

    pub fn total_days(&self) -> usize {
        self.history.len()
    }

    pub fn was_checked_in(&self, day: NaiveDate) -> bool {
        self.history.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_day;
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    /// Evaluate then check in, the way a press does.
    fn press(tracker: &mut StreakTracker, today: NaiveDate) -> CheckInOutcome {
        tracker.evaluate(today);
        tracker.check_in(today)
    }

    #[test]
    fn first_use_starts_at_zero() {
        let mut t = StreakTracker::new();
        assert_eq!(t.evaluate(day("2024-01-01")), Evaluation::FirstUse);
        assert_eq!(t.current_streak, 0);
        assert!(!t.checked_in_today);
    }

    #[test]
    fn consecutive_day_continues() {
        let mut t = StreakTracker::new();
        press(&mut t, day("2024-01-01"));

        assert_eq!(t.evaluate(day("2024-01-02")), Evaluation::Continuing);
        assert!(!t.checked_in_today);

        let before = t.current_streak;
        t.check_in(day("2024-01-02"));
        assert_eq!(t.current_streak, before + 1);
        assert_eq!(t.last_check_in, Some(day("2024-01-02")));
    }

    #[test]
    fn four_day_gap_resets() {
        let mut t = StreakTracker {
            current_streak: 5,
            best_streak: 5,
            last_check_in: Some(day("2024-01-01")),
            ..Default::default()
        };

        let eval = t.evaluate(day("2024-01-05"));
        assert_eq!(eval, Evaluation::Broken { previous: 5, gap_days: 4 });
        assert_eq!(t.current_streak, 0);
        assert_eq!(t.last_check_in, None);
        assert_eq!(t.best_streak, 5);
    }

    #[test]
    fn clock_skew_backwards_resets() {
        let mut t = StreakTracker {
            current_streak: 2,
            best_streak: 2,
            last_check_in: Some(day("2024-01-10")),
            ..Default::default()
        };
        assert!(matches!(t.evaluate(day("2024-01-08")), Evaluation::Broken { gap_days: -2, .. }));
        assert_eq!(t.current_streak, 0);
    }

    #[test]
    fn same_day_check_in_is_idempotent() {
        let mut once = StreakTracker::new();
        press(&mut once, day("2024-01-01"));

        let mut twice = StreakTracker::new();
        press(&mut twice, day("2024-01-01"));
        assert_eq!(twice.check_in(day("2024-01-01")), CheckInOutcome::AlreadyCheckedIn);

        assert_eq!(once, twice);
    }

    #[test]
    fn reloaded_state_without_evaluate_still_guards_today() {
        let mut t = StreakTracker::new();
        press(&mut t, day("2024-01-01"));
        t.checked_in_today = false; // as if freshly deserialized

        assert_eq!(t.check_in(day("2024-01-01")), CheckInOutcome::AlreadyCheckedIn);
        assert_eq!(t.current_streak, 1);
    }

    #[test]
    fn milestones_fire_again_after_reset() {
        let mut t = StreakTracker::new();
        let start = day("2024-01-01");
        let mut fired = Vec::new();
        for i in 0..3 {
            if let Some(m) = press(&mut t, start + Duration::days(i)).milestone() {
                fired.push(m);
            }
        }
        // miss two days, then build back up
        for i in 5..8 {
            if let Some(m) = press(&mut t, start + Duration::days(i)).milestone() {
                fired.push(m);
            }
        }
        assert_eq!(fired, vec![Milestone::ThreeDays, Milestone::ThreeDays]);
        assert_eq!(t.best_streak, 3);
    }

    #[test]
    fn history_keeps_every_checked_in_day_across_resets() {
        let mut t = StreakTracker::new();
        press(&mut t, day("2024-01-01"));
        press(&mut t, day("2024-01-04"));
        assert_eq!(t.total_days(), 2);
        assert!(t.was_checked_in(day("2024-01-01")));
        assert!(!t.was_checked_in(day("2024-01-02")));
    }

    #[test]
    fn check_in_saturates_a_maxed_counter() {
        let mut t = StreakTracker {
            current_streak: u32::MAX,
            best_streak: u32::MAX,
            last_check_in: Some(day("2024-01-01")),
            ..Default::default()
        };
        let outcome = press(&mut t, day("2024-01-02"));
        assert!(matches!(outcome, CheckInOutcome::CheckedIn { streak: u32::MAX, new_best: false, .. }));
        assert_eq!(t.best_streak, u32::MAX);
    }

    #[test]
    fn evaluate_repairs_best_below_current() {
        let mut t = StreakTracker {
            current_streak: 4,
            best_streak: 1,
            last_check_in: Some(day("2024-01-01")),
            ..Default::default()
        };
        t.evaluate(day("2024-01-01"));
        assert_eq!(t.best_streak, 4);
    }

    proptest! {
        #[test]
        fn daily_presses_increase_by_one(days in 1u32..60) {
            let mut t = StreakTracker::new();
            let start = day("2023-12-20");
            for i in 0..days {
                let before = t.current_streak;
                press(&mut t, start + Duration::days(i as i64));
                prop_assert_eq!(t.current_streak, before + 1);
            }
            prop_assert_eq!(t.current_streak, days);
        }

        #[test]
        fn best_never_decreases_and_bounds_current(gaps in proptest::collection::vec(0i64..4, 1..80)) {
            let mut t = StreakTracker::new();
            let mut today = day("2024-01-01");
            let mut best_seen = 0;
            for gap in gaps {
                today += Duration::days(gap);
                press(&mut t, today);
                prop_assert!(t.best_streak >= best_seen);
                prop_assert!(t.best_streak >= t.current_streak);
                best_seen = t.best_streak;
            }
        }

        #[test]
        fn milestones_only_at_thresholds(gaps in proptest::collection::vec(1i64..3, 1..100)) {
            let mut t = StreakTracker::new();
            let mut today = day("2024-01-01");
            for gap in gaps {
                today += Duration::days(gap);
                let outcome = press(&mut t, today);
                match outcome.milestone() {
                    Some(m) => prop_assert_eq!(m.days(), t.current_streak),
                    None => prop_assert!(![3, 7, 30].contains(&t.current_streak)
                        || outcome == CheckInOutcome::AlreadyCheckedIn),
                }
            }
        }

        #[test]
        fn gap_of_two_or_more_resets(streak in 1u32..50, gap in 2i64..400) {
            let last = day("2024-06-01");
            let mut t = StreakTracker {
                current_streak: streak,
                best_streak: streak,
                last_check_in: Some(last),
                ..Default::default()
            };
            t.evaluate(last + Duration::days(gap));
            prop_assert_eq!(t.current_streak, 0);
            prop_assert_eq!(t.best_streak, streak);
        }
    }
}
