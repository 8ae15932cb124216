//! Rollups over the monthly total series
//!
//! Ratios use calendar lags: month-over-month compares against m-1 and
//! year-over-year against m-12, regardless of which rows happen to be adjacent.
//! A missing or zero base yields `None`.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::MonthlySeries;
use crate::period::{Bucket, Period};

pub const MOM_LAG: u32 = 1;
pub const YOY_LAG: u32 = 12;

/// Relative change of `period` against the month `lag` months earlier
pub fn pct_change(series: &MonthlySeries, period: Period, lag: u32) -> Option<f64> {
    let current = series.get(period)?;
    let base = series.get(period.back(lag)?)?;
    if base == 0 {
        return None;
    }
    Some((current as f64 - base as f64) / base as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketTotal {
    pub period_end: NaiveDate,
    pub lines: u64,
}

/// Sum each calendar bucket that has at least one month of data.
/// Trailing partial buckets are reported as they stand.
pub fn bucket_sums(series: &MonthlySeries, bucket: Bucket) -> Vec<BucketTotal> {
    let mut sums: BTreeMap<Period, u64> = BTreeMap::new();
    for (period, lines) in series.iter() {
        let sum = sums.entry(period.bucket_end(bucket)).or_insert(0u64);
        *sum = sum.saturating_add(lines);
    }
    sums.into_iter()
        .map(|(end, lines)| BucketTotal {
            period_end: end.last_day(),
            lines,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RollupSet {
    pub mom: BTreeMap<Period, Option<f64>>,
    pub yoy: BTreeMap<Period, Option<f64>>,
    pub quarterly: Vec<BucketTotal>,
    pub semiannual: Vec<BucketTotal>,
    pub annual: Vec<BucketTotal>,
}

impl RollupSet {
    pub fn compute(series: &MonthlySeries) -> Self {
        let ratios = |lag| {
            series
                .iter()
                .map(|(period, _)| (period, pct_change(series, period, lag)))
                .collect()
        };
        RollupSet {
            mom: ratios(MOM_LAG),
            yoy: ratios(YOY_LAG),
            quarterly: bucket_sums(series, Bucket::Quarter),
            semiannual: bucket_sums(series, Bucket::Half),
            annual: bucket_sums(series, Bucket::Year),
        }
    }

    pub fn mom_at(&self, period: Period) -> Option<f64> {
        self.mom.get(&period).copied().flatten()
    }

    pub fn yoy_at(&self, period: Period) -> Option<f64> {
        self.yoy.get(&period).copied().flatten()
    }
}
