//! Calendar-month periods
//!
//! Every porting figure is keyed by a calendar month. A `Period` always holds
//! the first day of its month, so truncation happens once, on construction.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Short Spanish month names used for chart labels
pub const MONTH_ABBR: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: NaiveDate,
}

/// Calendar bucket used by the period rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Quarters ending March, June, September, December
    Quarter,
    /// Halves ending June and December
    Half,
    /// Years ending December
    Year,
}

impl Bucket {
    fn end_month(self, month: u32) -> u32 {
        match self {
            Bucket::Quarter => (month - 1) / 3 * 3 + 3,
            Bucket::Half => {
                if month <= 6 {
                    6
                } else {
                    12
                }
            }
            Bucket::Year => 12,
        }
    }
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|start| Period { start })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Period {
            start: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Calendar month number, 1-12
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn last_day(&self) -> NaiveDate {
        self.start + Months::new(1) - Duration::days(1)
    }

    /// Period `months` before this one, if representable
    pub fn back(&self, months: u32) -> Option<Self> {
        self.start
            .checked_sub_months(Months::new(months))
            .map(|start| Period { start })
    }

    /// Period `months` after this one, if representable
    pub fn forward(&self, months: u32) -> Option<Self> {
        self.start
            .checked_add_months(Months::new(months))
            .map(|start| Period { start })
    }

    /// Last month of the calendar bucket this period falls in
    pub fn bucket_end(&self, bucket: Bucket) -> Self {
        let month = self.month();
        Period {
            start: self.start + Months::new(bucket.end_month(month) - month),
        }
    }

    /// `YYYY-MM`, used for file naming
    pub fn key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// Short chart label, e.g. `Ene-25`
    pub fn label(&self) -> String {
        format!(
            "{}-{:02}",
            MONTH_ABBR[self.month0()],
            self.year().rem_euclid(100)
        )
    }

    fn month0(&self) -> usize {
        self.start.month0() as usize
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.format("%Y-%m-%d"))
    }
}

impl FromStr for Period {
    type Err = EngineError;

    /// Accepts `YYYY-MM`, `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Period::containing(date));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Period::containing(dt.date()));
            }
        }
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(Period::containing)
            .map_err(|_| EngineError::InvalidPeriod(s.to_string()))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
