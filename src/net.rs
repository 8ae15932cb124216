//! Operator net calculator
//!
//! Lines won (receiving side) and lost (losing side) per operator and month.
//! The four known operators are dense in every month through `OperatorBook`;
//! names outside that set are tracked separately so totals still reconcile.

use std::collections::BTreeMap;

use crate::aggregate::MonthlySeries;
use crate::models::PortingTransaction;
use crate::operators::{Operator, OperatorBook, OperatorId};
use crate::period::Period;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flow {
    pub won: u64,
    pub lost: u64,
}

impl Flow {
    /// Saturates at the `i64` bounds instead of wrapping
    pub fn net(&self) -> i64 {
        let won = i64::try_from(self.won).unwrap_or(i64::MAX);
        let lost = i64::try_from(self.lost).unwrap_or(i64::MAX);
        won.saturating_sub(lost)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthNet {
    pub known: OperatorBook<Flow>,
    pub others: BTreeMap<String, Flow>,
}

impl MonthNet {
    fn flow_mut(&mut self, id: &OperatorId) -> &mut Flow {
        match id {
            OperatorId::Known(op) => &mut self.known[*op],
            OperatorId::Other(name) => self.others.entry(name.clone()).or_default(),
        }
    }

    pub fn flow(&self, op: Operator) -> Flow {
        self.known[op]
    }

    fn all_flows(&self) -> impl Iterator<Item = &Flow> {
        self.known.iter().map(|(_, f)| f).chain(self.others.values())
    }

    pub fn total_won(&self) -> u64 {
        self.all_flows().fold(0, |acc: u64, f| acc.saturating_add(f.won))
    }

    pub fn total_lost(&self) -> u64 {
        self.all_flows().fold(0, |acc: u64, f| acc.saturating_add(f.lost))
    }

    /// Largest absolute net among the four known operators
    pub fn max_abs_net(&self) -> u64 {
        self.known
            .iter()
            .map(|(_, f)| f.net().unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetMatrix {
    months: BTreeMap<Period, MonthNet>,
}

impl NetMatrix {
    pub fn from_transactions(transactions: &[PortingTransaction]) -> Self {
        let mut months: BTreeMap<Period, MonthNet> = BTreeMap::new();
        for tx in transactions {
            let month = months.entry(tx.month).or_default();
            let won = month.flow_mut(&tx.winning);
            won.won = won.won.saturating_add(tx.lines);
            let lost = month.flow_mut(&tx.losing);
            lost.lost = lost.lost.saturating_add(tx.lines);
        }
        NetMatrix { months }
    }

    pub fn get(&self, period: Period) -> Option<&MonthNet> {
        self.months.get(&period)
    }

    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.months.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Net per known operator for every month, ascending
    pub fn net_series(&self) -> (Vec<Period>, OperatorBook<Vec<i64>>) {
        let index: Vec<Period> = self.periods().collect();
        let series = OperatorBook::from_fn(|op| {
            self.months.values().map(|m| m.flow(op).net()).collect()
        });
        (index, series)
    }

    /// Months where won or lost does not reconcile with the monthly total
    pub fn unreconciled(&self, monthly: &MonthlySeries) -> Vec<Period> {
        let mut bad: Vec<Period> = self
            .months
            .iter()
            .filter(|(period, m)| {
                let total = monthly.get(**period).unwrap_or(0);
                m.total_won() != total || m.total_lost() != total
            })
            .map(|(period, _)| *period)
            .collect();
        bad.extend(
            monthly
                .iter()
                .filter(|(period, _)| !self.months.contains_key(period))
                .map(|(period, _)| period),
        );
        bad.sort();
        bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::normalize_name;
    use proptest::prelude::*;

    fn tx(from: &str, to: &str, month: Period, lines: u64) -> PortingTransaction {
        PortingTransaction {
            losing: normalize_name(from),
            winning: normalize_name(to),
            month,
            lines,
        }
    }

    fn jan() -> Period {
        Period::new(2025, 1).unwrap()
    }

    #[test]
    fn test_three_corridor_scenario() {
        let txs = vec![
            tx("CLARO", "ENTEL", jan(), 100),
            tx("ENTEL", "CLARO", jan(), 40),
            tx("CLARO", "BITEL", jan(), 10),
        ];
        let matrix = NetMatrix::from_transactions(&txs);
        let monthly = MonthlySeries::from_transactions(&txs);
        let month = matrix.get(jan()).unwrap();

        assert_eq!(monthly.get(jan()), Some(150));
        assert_eq!(month.flow(Operator::Claro), Flow { won: 40, lost: 110 });
        assert_eq!(month.flow(Operator::Claro).net(), -70);
        assert_eq!(month.flow(Operator::Entel), Flow { won: 100, lost: 40 });
        assert_eq!(month.flow(Operator::Entel).net(), 60);
        assert_eq!(month.flow(Operator::Bitel).net(), 10);
        assert_eq!(month.flow(Operator::Movistar), Flow::default());
        assert_eq!(month.total_lost(), 150);
        assert_eq!(month.max_abs_net(), 70);
    }

    #[test]
    fn test_net_saturates_instead_of_wrapping() {
        let flow = Flow { won: u64::MAX, lost: 0 };
        assert_eq!(flow.net(), i64::MAX);
        let flow = Flow { won: 0, lost: u64::MAX };
        assert_eq!(flow.net(), -i64::MAX);

        let txs = vec![
            tx("CLARO", "ENTEL", jan(), u64::MAX),
            tx("CLARO", "ENTEL", jan(), 1),
        ];
        let month = NetMatrix::from_transactions(&txs).get(jan()).cloned().unwrap();
        assert_eq!(month.flow(Operator::Entel).won, u64::MAX);
        assert!(month.flow(Operator::Entel).net() > 0);
    }

    #[test]
    fn test_duplicate_corridor_rows_are_summed() {
        let txs = vec![tx("CLARO", "ENTEL", jan(), 5), tx("CLARO", "ENTEL", jan(), 6)];
        let matrix = NetMatrix::from_transactions(&txs);
        assert_eq!(matrix.get(jan()).unwrap().flow(Operator::Entel).won, 11);
    }

    #[test]
    fn test_unknown_operator_kept_outside_fixed_book() {
        let txs = vec![tx("Inkacel", "MOVISTAR", jan(), 30)];
        let matrix = NetMatrix::from_transactions(&txs);
        let month = matrix.get(jan()).unwrap();
        assert_eq!(month.others["Inkacel"], Flow { won: 0, lost: 30 });
        assert_eq!(month.flow(Operator::Movistar).won, 30);
        assert_eq!(month.total_won(), month.total_lost());
    }

    #[test]
    fn test_net_series_is_dense() {
        let feb = Period::new(2025, 2).unwrap();
        let txs = vec![tx("CLARO", "ENTEL", jan(), 5), tx("BITEL", "MOVISTAR", feb, 9)];
        let (index, series) = NetMatrix::from_transactions(&txs).net_series();
        assert_eq!(index, vec![jan(), feb]);
        assert_eq!(series[Operator::Claro], vec![-5, 0]);
        assert_eq!(series[Operator::Bitel], vec![0, -9]);
        assert_eq!(series[Operator::Movistar], vec![0, 9]);
    }

    fn arb_name() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "CLARO",
            "ENTEL",
            "Viettel Perú S.A.C.",
            "Telefónica del Perú S.A.A.",
            "Guinea Mobile",
        ])
    }

    fn arb_tx() -> impl Strategy<Value = PortingTransaction> {
        (arb_name(), arb_name(), 0u32..24, 0u64..200_000).prop_map(|(from, to, offset, lines)| {
            let month = Period::new(2024, 1).unwrap().forward(offset).unwrap();
            tx(from, to, month, lines)
        })
    }

    proptest! {
        #[test]
        fn prop_won_and_lost_reconcile_with_monthly_total(
            txs in prop::collection::vec(arb_tx(), 0..200)
        ) {
            let matrix = NetMatrix::from_transactions(&txs);
            let monthly = MonthlySeries::from_transactions(&txs);
            prop_assert!(matrix.unreconciled(&monthly).is_empty());
            prop_assert_eq!(matrix.len(), monthly.len());
        }

        #[test]
        fn prop_net_series_has_one_value_per_month(
            txs in prop::collection::vec(arb_tx(), 1..100)
        ) {
            let matrix = NetMatrix::from_transactions(&txs);
            let (index, series) = matrix.net_series();
            for (_, values) in series.iter() {
                prop_assert_eq!(values.len(), index.len());
            }
        }
    }
}
