//! Record normalizer: resolves both parties of every row to canonical identities

use crate::models::{PortingRecord, PortingTransaction};
use crate::operators::normalize_name;

pub fn normalize_record(record: &PortingRecord) -> PortingTransaction {
    PortingTransaction {
        losing: normalize_name(&record.losing_operator),
        winning: normalize_name(&record.winning_operator),
        month: record.month,
        lines: record.lines,
    }
}

pub fn normalize(records: &[PortingRecord]) -> Vec<PortingTransaction> {
    records.iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Operator, OperatorId};
    use crate::period::Period;

    #[test]
    fn test_rows_are_kept_one_to_one() {
        let month = Period::new(2025, 1).unwrap();
        let records = vec![
            PortingRecord::new("América Móvil Perú S.A.C.", "Entel Perú S.A.", month, 10),
            PortingRecord::new("Inkacel", "CLARO", month, 3),
        ];
        let txs = normalize(&records);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].losing, OperatorId::Known(Operator::Claro));
        assert_eq!(txs[0].winning, OperatorId::Known(Operator::Entel));
        assert_eq!(txs[1].losing, OperatorId::Other("Inkacel".to_string()));
        assert_eq!(txs[1].winning, OperatorId::Known(Operator::Claro));
        assert_eq!(txs[1].lines, 3);
    }
}
