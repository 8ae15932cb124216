//! Recommendation policy
//!
//! Layout granularity and net-chart visibility are calendar conventions held
//! as a table, so they can be loaded from JSON and tested on their own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::net::NetMatrix;
use crate::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRule {
    pub months: Vec<u32>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Calendar months mapped to a non-default layout
    pub layout_rules: Vec<LayoutRule>,
    pub default_layout: Layout,
    /// Minimum max |net| across the known operators to include the net chart
    pub net_chart_threshold: u64,
    /// Months whose reports always include the net chart
    pub net_chart_always_months: Vec<u32>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        RecommendationPolicy {
            layout_rules: vec![
                LayoutRule {
                    months: vec![3, 9],
                    layout: Layout::Quarterly,
                },
                LayoutRule {
                    months: vec![6],
                    layout: Layout::Semiannual,
                },
                LayoutRule {
                    months: vec![12],
                    layout: Layout::Annual,
                },
            ],
            default_layout: Layout::Monthly,
            net_chart_threshold: 10_000,
            net_chart_always_months: vec![1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub layout: Layout,
    pub include_net_chart: bool,
}

impl RecommendationPolicy {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let policy: RecommendationPolicy = serde_json::from_str(&raw)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Months must be 1-12 and no month may map to two layouts
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.layout_rules {
            for &month in &rule.months {
                if !(1..=12).contains(&month) {
                    return Err(EngineError::Policy(format!("month {} out of range", month)));
                }
                if !seen.insert(month) {
                    return Err(EngineError::Policy(format!(
                        "month {} has more than one layout rule",
                        month
                    )));
                }
            }
        }
        if let Some(month) = self
            .net_chart_always_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(EngineError::Policy(format!("month {} out of range", month)));
        }
        Ok(())
    }

    pub fn layout_for(&self, target: Period) -> Layout {
        let month = target.month();
        self.layout_rules
            .iter()
            .find(|rule| rule.months.contains(&month))
            .map(|rule| rule.layout)
            .unwrap_or(self.default_layout)
    }

    pub fn include_net_chart(&self, target: Period, matrix: &NetMatrix) -> bool {
        let peak = matrix.get(target).map(|m| m.max_abs_net()).unwrap_or(0);
        peak >= self.net_chart_threshold || self.net_chart_always_months.contains(&target.month())
    }

    pub fn recommend(&self, target: Period, matrix: &NetMatrix) -> Recommendation {
        Recommendation {
            layout: self.layout_for(target),
            include_net_chart: self.include_net_chart(target, matrix),
        }
    }
}
