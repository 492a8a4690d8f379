use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::streak::Milestone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    pub fn checked_in(self) -> &'static str {
        match self {
            Language::En => "Checked in today ✓",
            Language::Zh => "今日已打卡 ✓",
        }
    }

    pub fn click_to_check_in(self) -> &'static str {
        match self {
            Language::En => "Click to check in!",
            Language::Zh => "点击打卡！",
        }
    }

    pub fn milestone(self, milestone: Milestone) -> &'static str {
        match (self, milestone) {
            (Language::En, Milestone::ThreeDays) => "3 days! Keep going! 💪",
            (Language::En, Milestone::OneWeek) => "Week achieved! 🎉",
            (Language::En, Milestone::ThirtyDays) => "30 days! Incredible! 🏆",
            (Language::Zh, Milestone::ThreeDays) => "3天！继续加油！💪",
            (Language::Zh, Milestone::OneWeek) => "一周达成！🎉",
            (Language::Zh, Milestone::ThirtyDays) => "30天成就！🏆",
        }
    }

    pub fn streak_line(self, count: u32) -> String {
        match self {
            Language::En => format!("{count} day streak"),
            Language::Zh => format!("连续 {count} 天"),
        }
    }

    pub fn best_line(self, count: u32) -> String {
        match self {
            Language::En => format!("Best: {count} days"),
            Language::Zh => format!("最佳记录：{count} 天"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::Zh => f.write_str("zh"),
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(ValidationError::invalid("language", format!("'{other}' (expected en or zh)"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_two_languages() {
        assert_eq!(Language::En.toggled(), Language::Zh);
        assert_eq!(Language::En.toggled().toggled(), Language::En);
    }

    #[test]
    fn every_milestone_has_text_in_both_languages() {
        for m in Milestone::ALL {
            assert!(!Language::En.milestone(m).is_empty());
            assert!(!Language::Zh.milestone(m).is_empty());
        }
    }

    #[test]
    fn parses_codes() {
        assert_eq!("ZH".parse::<Language>().unwrap(), Language::Zh);
        assert!("fr".parse::<Language>().is_err());
    }
}
