//! Month view over the check-in history.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar month, used for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::invalid("month", format!("{month} is not in 1..=12")));
        }
        let years = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        if !years.contains(&year) {
            return Err(ValidationError::invalid("year", format!("{year} is outside the calendar range")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year.saturating_add(1), month: 1 }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year.saturating_sub(1), month: 12 }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(a), Some(b)) => (b - a).num_days() as u32,
            _ => 0,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::invalid("month", format!("'{s}' is not YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year = y.parse::<i32>().map_err(|_| bad())?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        Self::new(year, month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub checked_in: bool,
    pub is_today: bool,
}

/// Weeks of one month, Monday first. `None` cells pad the first and last week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthView {
    pub month: YearMonth,
    pub weeks: Vec<[Option<DayCell>; 7]>,
    pub checked_in_days: usize,
}

impl MonthView {
    pub fn build(month: YearMonth, history: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        let mut weeks = Vec::new();
        let mut week: [Option<DayCell>; 7] = [None; 7];
        let mut checked_in_days = 0;

        let days = month.first_day().into_iter().flat_map(|first| {
            first
                .iter_days()
                .take_while(move |d| d.month() == first.month())
        });

        for date in days {
            let slot = date.weekday().num_days_from_monday() as usize;
            let checked_in = history.contains(&date);
            if checked_in {
                checked_in_days += 1;
            }
            week[slot] = Some(DayCell {
                date,
                checked_in,
                is_today: date == today,
            });
            if slot == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }

        Self {
            month,
            weeks,
            checked_in_days,
        }
    }

    /// Plain-text grid, `*` marking checked-in days and `[..]` marking today.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n Mo  Tu  We  Th  Fr  Sa  Su\n", self.month);
        for week in &self.weeks {
            let line: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    None => "    ".to_string(),
                    Some(c) => {
                        let mark = if c.checked_in { '*' } else { ' ' };
                        if c.is_today {
                            format!("[{:>2}]", c.date.day())
                        } else {
                            format!(" {:>2}{}", c.date.day(), mark)
                        }
                    }
                })
                .collect();
            out.push_str(line.join("").trim_end());
            out.push('\n');
        }
        out
    }
}
