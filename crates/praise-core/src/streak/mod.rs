mod milestone;
mod tracker;

pub use milestone::{FireTier, Milestone};
pub use tracker::{CheckInOutcome, Evaluation, StreakTracker};
