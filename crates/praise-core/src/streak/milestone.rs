use serde::{Deserialize, Serialize};

/// A notable streak length that earns a celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    ThreeDays,
    OneWeek,
    ThirtyDays,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [Milestone::ThreeDays, Milestone::OneWeek, Milestone::ThirtyDays];

    /// The milestone reached by a streak of exactly `streak` days.
    ///
    /// Only exact matches count, so a milestone fires once per streak run
    /// and fires again if the streak is rebuilt after a reset.
    pub fn for_streak(streak: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.days() == streak)
    }

    pub fn days(&self) -> u32 {
        match self {
            Milestone::ThreeDays => 3,
            Milestone::OneWeek => 7,
            Milestone::ThirtyDays => 30,
        }
    }

    /// How many confetti particles the front-end should throw.
    pub fn confetti(&self) -> u32 {
        match self {
            Milestone::ThreeDays => 15,
            Milestone::OneWeek => 20,
            Milestone::ThirtyDays => 30,
        }
    }

    pub fn is_gold(&self) -> bool {
        matches!(self, Milestone::ThirtyDays)
    }
}

/// Flame badge shown next to the streak count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireTier {
    Unlit,
    Spark,
    Blaze,
    Inferno,
    Trophy,
}

impl FireTier {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0 => FireTier::Unlit,
            1..=2 => FireTier::Spark,
            3..=6 => FireTier::Blaze,
            7..=29 => FireTier::Inferno,
            _ => FireTier::Trophy,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FireTier::Unlit => "",
            FireTier::Spark => "🔥",
            FireTier::Blaze => "🔥🔥",
            FireTier::Inferno => "🔥🔥🔥",
            FireTier::Trophy => "🏆",
        }
    }
}
