//! Analytics bundle and its assembler
//!
//! `assemble` is the only entry point that runs the whole pipeline:
//! normalize, aggregate, net, rollups, recommendations. The resulting bundle
//! is never modified; a new target month means a new bundle.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{MonthlySeries, PeriodLines};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::PortingRecord;
use crate::net::{Flow, NetMatrix};
use crate::normalize::normalize;
use crate::operators::{Operator, OperatorBook};
use crate::period::Period;
use crate::policy::Layout;
use crate::rollup::{BucketTotal, RollupSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparatives {
    pub mom_delta_pct: Option<f64>,
    pub yoy_delta_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartWindow {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorRow {
    pub name: String,
    pub won: u64,
    pub lost: u64,
    pub net: i64,
}

impl OperatorRow {
    fn new(name: &str, flow: Flow) -> Self {
        OperatorRow {
            name: name.to_string(),
            won: flow.won,
            lost: flow.lost,
            net: flow.net(),
        }
    }
}

/// Net per known operator; serializes as `{index, CLARO, ENTEL, BITEL, MOVISTAR}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetTimeseries {
    pub index: Vec<Period>,
    #[serde(flatten)]
    pub series: OperatorBook<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub quarterly: Vec<BucketTotal>,
    pub semiannual: Vec<BucketTotal>,
    pub annual: Vec<BucketTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub include_net_chart: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsBundle {
    pub topic: String,
    pub target_period: Period,
    pub layout: Layout,
    pub comparatives: Comparatives,
    pub monthly_total: Vec<PeriodLines>,
    pub chart_window: ChartWindow,
    pub operators_current: Vec<OperatorRow>,
    /// Target-month rows for names outside the four known operators
    pub other_operators: Vec<OperatorRow>,
    pub net_timeseries: NetTimeseries,
    pub period_totals: PeriodTotals,
    pub recommendations: Recommendations,
}

impl AnalyticsBundle {
    /// The last `months` entries of the net series
    pub fn net_window(&self, months: usize) -> NetTimeseries {
        let skip = self.net_timeseries.index.len().saturating_sub(months);
        NetTimeseries {
            index: self.net_timeseries.index[skip..].to_vec(),
            series: self.net_timeseries.series.map(|values| values[skip..].to_vec()),
        }
    }
}

/// Build the bundle for `target`, or for the latest month in the data when
/// no target is given.
pub fn assemble(
    records: &[PortingRecord],
    target: Option<Period>,
    config: &EngineConfig,
) -> Result<AnalyticsBundle> {
    let transactions = normalize(records);
    let monthly = MonthlySeries::from_transactions(&transactions);

    let target = match target {
        Some(period) => period,
        None => monthly.latest().ok_or(EngineError::NoData)?,
    };
    if monthly.get(target).is_none() {
        return Err(EngineError::EmptyTarget { period: target });
    }

    let matrix = NetMatrix::from_transactions(&transactions);
    debug_assert!(matrix.unreconciled(&monthly).is_empty());
    let current = matrix
        .get(target)
        .ok_or(EngineError::EmptyTarget { period: target })?;

    let rollups = RollupSet::compute(&monthly);
    let recommendation = config.policy.recommend(target, &matrix);

    debug!(
        "Assembling {} from {} transactions over {} months",
        target.key(),
        transactions.len(),
        monthly.len()
    );

    let window = monthly.tail(config.chart_months);
    let (index, series) = matrix.net_series();

    Ok(AnalyticsBundle {
        topic: config.topic.clone(),
        target_period: target,
        layout: recommendation.layout,
        comparatives: Comparatives {
            mom_delta_pct: rollups.mom_at(target),
            yoy_delta_pct: rollups.yoy_at(target),
        },
        monthly_total: monthly.points(),
        chart_window: ChartWindow {
            labels: window.iter().map(|p| p.period.label()).collect(),
            values: window.iter().map(|p| p.lines).collect(),
        },
        operators_current: Operator::ALL
            .iter()
            .map(|op| OperatorRow::new(op.code(), current.flow(*op)))
            .collect(),
        other_operators: current
            .others
            .iter()
            .map(|(name, flow)| OperatorRow::new(name, *flow))
            .collect(),
        net_timeseries: NetTimeseries { index, series },
        period_totals: PeriodTotals {
            quarterly: rollups.quarterly,
            semiannual: rollups.semiannual,
            annual: rollups.annual,
        },
        recommendations: Recommendations {
            include_net_chart: recommendation.include_net_chart,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(y: i32, m: u32) -> Period {
        Period::new(y, m).unwrap()
    }

    fn rec(from: &str, to: &str, month: Period, lines: u64) -> PortingRecord {
        PortingRecord::new(from, to, month, lines)
    }

    fn scenario() -> Vec<PortingRecord> {
        vec![
            rec("América Móvil Perú S.A.C.", "Entel Perú S.A.", p(2025, 1), 100),
            rec("Entel Perú S.A.", "América Móvil Perú S.A.C.", p(2025, 1), 40),
            rec("América Móvil Perú S.A.C.", "Viettel Perú S.A.C.", p(2025, 1), 10),
        ]
    }

    #[test]
    fn test_scenario_bundle() {
        let bundle = assemble(&scenario(), None, &EngineConfig::default()).unwrap();

        assert_eq!(bundle.target_period, p(2025, 1));
        assert_eq!(bundle.layout, Layout::Monthly);
        assert_eq!(
            bundle.monthly_total,
            vec![PeriodLines { period: p(2025, 1), lines: 150 }]
        );
        let rows: Vec<(&str, u64, u64, i64)> = bundle
            .operators_current
            .iter()
            .map(|r| (r.name.as_str(), r.won, r.lost, r.net))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("CLARO", 40, 110, -70),
                ("ENTEL", 100, 40, 60),
                ("BITEL", 10, 0, 10),
                ("MOVISTAR", 0, 0, 0),
            ]
        );
        assert_eq!(bundle.comparatives.mom_delta_pct, None);
        assert_eq!(bundle.comparatives.yoy_delta_pct, None);
        // January always carries the net chart
        assert!(bundle.recommendations.include_net_chart);
        assert_eq!(bundle.chart_window.labels, vec!["Ene-25"]);
    }

    #[test]
    fn test_json_field_shape() {
        let bundle = assemble(&scenario(), None, &EngineConfig::default()).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["target_period"], "2025-01-01");
        assert_eq!(json["layout"], "monthly");
        assert!(json["comparatives"]["mom_delta_pct"].is_null());
        assert!(json["comparatives"]["yoy_delta_pct"].is_null());
        assert_eq!(json["monthly_total"][0]["period"], "2025-01-01");
        assert_eq!(json["monthly_total"][0]["lines"], 150);
        assert_eq!(json["net_timeseries"]["index"][0], "2025-01-01");
        assert_eq!(json["net_timeseries"]["CLARO"][0], -70);
        assert_eq!(json["net_timeseries"]["MOVISTAR"][0], 0);
        assert_eq!(json["recommendations"]["include_net_chart"], true);
        assert_eq!(json["operators_current"][1]["name"], "ENTEL");
    }

    #[test]
    fn test_explicit_target_and_comparatives() {
        let mut records = scenario();
        records.push(rec("CLARO", "MOVISTAR", p(2024, 1), 100));
        records.push(rec("CLARO", "MOVISTAR", p(2024, 12), 120));
        records.push(rec("CLARO", "MOVISTAR", p(2025, 3), 30_000));

        let bundle = assemble(&records, Some(p(2025, 1)), &EngineConfig::default()).unwrap();
        assert_eq!(bundle.comparatives.yoy_delta_pct, Some(0.5));
        assert_eq!(bundle.comparatives.mom_delta_pct, Some(0.25));
        assert_eq!(bundle.monthly_total.len(), 4);

        let march = assemble(&records, None, &EngineConfig::default()).unwrap();
        assert_eq!(march.target_period, p(2025, 3));
        assert_eq!(march.layout, Layout::Quarterly);
        assert!(march.recommendations.include_net_chart);
        assert_eq!(march.comparatives.mom_delta_pct, None);
    }

    #[test]
    fn test_target_given_as_mid_month_date_is_truncated() {
        let target: Period = "2025-01-20".parse().unwrap();
        let bundle = assemble(&scenario(), Some(target), &EngineConfig::default()).unwrap();
        assert_eq!(bundle.target_period, p(2025, 1));
    }

    #[test]
    fn test_missing_target_month_is_an_error() {
        let err = assemble(&scenario(), Some(p(2025, 2)), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyTarget { .. }));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = assemble(&[], None, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::NoData));
    }

    #[test]
    fn test_unknown_operators_reported_separately() {
        let mut records = scenario();
        records.push(rec("Guinea Mobile", "Entel Perú S.A.", p(2025, 1), 7));
        let bundle = assemble(&records, None, &EngineConfig::default()).unwrap();

        assert_eq!(bundle.operators_current.len(), 4);
        assert_eq!(
            bundle.other_operators,
            vec![OperatorRow { name: "Guinea Mobile".to_string(), won: 0, lost: 7, net: -7 }]
        );
        let won: u64 = bundle.operators_current.iter().map(|r| r.won).sum();
        assert_eq!(won, 157);
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = EngineConfig::default();
        let a = serde_json::to_string_pretty(&assemble(&scenario(), None, &config).unwrap()).unwrap();
        let b = serde_json::to_string_pretty(&assemble(&scenario(), None, &config).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_net_window_trails_series() {
        let records: Vec<PortingRecord> = (0..30)
            .map(|i| rec("CLARO", "ENTEL", p(2023, 1).forward(i).unwrap(), u64::from(i) + 1))
            .collect();
        let bundle = assemble(&records, None, &EngineConfig::default()).unwrap();
        let window = bundle.net_window(12);
        assert_eq!(window.index.len(), 12);
        assert_eq!(window.index[11], bundle.target_period);
        assert_eq!(window.series[Operator::Entel][11], 30);
        assert_eq!(window.series[Operator::Claro][0], -19);
    }

    #[test]
    fn test_net_window_follows_config() {
        let records: Vec<PortingRecord> = (0..20)
            .map(|i| rec("CLARO", "ENTEL", p(2024, 1).forward(i).unwrap(), 1))
            .collect();
        let config = EngineConfig::default().with_windows(None, Some(5));
        let bundle = assemble(&records, None, &config).unwrap();
        let window = bundle.net_window(config.net_window_months);
        assert_eq!(window.index.len(), 5);
        assert_eq!(bundle.net_window(EngineConfig::default().net_window_months).index.len(), 12);
    }

    proptest! {
        #[test]
        fn prop_chart_window_never_exceeds_sixteen(months in 1u32..300) {
            let records: Vec<PortingRecord> = (0..months)
                .map(|i| rec("CLARO", "ENTEL", p(2000, 1).forward(i).unwrap(), 1))
                .collect();
            let bundle = assemble(&records, None, &EngineConfig::default()).unwrap();
            let expected = (months as usize).min(16);
            prop_assert_eq!(bundle.chart_window.values.len(), expected);
            prop_assert_eq!(bundle.chart_window.labels.len(), expected);
            prop_assert_eq!(bundle.monthly_total.len(), months as usize);
        }
    }
}
