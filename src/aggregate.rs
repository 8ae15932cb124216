//! Monthly aggregator

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::PortingTransaction;
use crate::period::Period;

/// Total ported lines per month, ascending. Months without activity are
/// absent, not zero; callers that need a fixed cadence fill gaps themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySeries {
    totals: BTreeMap<Period, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodLines {
    pub period: Period,
    pub lines: u64,
}

impl MonthlySeries {
    pub fn from_transactions(transactions: &[PortingTransaction]) -> Self {
        let mut totals = BTreeMap::new();
        for tx in transactions {
            let total = totals.entry(tx.month).or_insert(0u64);
            *total = total.saturating_add(tx.lines);
        }
        MonthlySeries { totals }
    }

    pub fn get(&self, period: Period) -> Option<u64> {
        self.totals.get(&period).copied()
    }

    pub fn latest(&self) -> Option<Period> {
        self.totals.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Period, u64)> + '_ {
        self.totals.iter().map(|(p, v)| (*p, *v))
    }

    pub fn points(&self) -> Vec<PeriodLines> {
        self.iter()
            .map(|(period, lines)| PeriodLines { period, lines })
            .collect()
    }

    /// The last `n` entries in ascending order
    pub fn tail(&self, n: usize) -> Vec<PeriodLines> {
        let skip = self.len().saturating_sub(n);
        self.points().into_iter().skip(skip).collect()
    }
}
