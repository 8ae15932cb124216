use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::operators::OperatorId;
use crate::period::Period;

/// Largest line count an `f64` cell still holds exactly (2^53)
pub const MAX_LINES: f64 = 9_007_199_254_740_992.0;

/// Raw row from the porting registry export
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsvRecord {
    #[serde(alias = "Cedente")]
    pub cedente: String,
    #[serde(alias = "Receptor")]
    pub receptor: String,
    #[serde(alias = "Mod_Cedente", default)]
    pub mod_cedente: Option<String>,
    #[serde(alias = "Mod_Receptor", default)]
    pub mod_receptor: Option<String>,
    #[serde(alias = "Mes")]
    pub mes: String,
    #[serde(alias = "Lineas")]
    pub lineas: f64,
}

/// One porting corridor for one month, operator names not yet canonical
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortingRecord {
    pub losing_operator: String,
    pub winning_operator: String,
    pub month: Period,
    pub lines: u64,
    /// Contract modality on each side (prepaid/postpaid), informational only
    pub losing_modality: Option<String>,
    pub winning_modality: Option<String>,
}

impl PortingRecord {
    pub fn new(losing: &str, winning: &str, month: Period, lines: u64) -> Self {
        PortingRecord {
            losing_operator: losing.to_string(),
            winning_operator: winning.to_string(),
            month,
            lines,
            losing_modality: None,
            winning_modality: None,
        }
    }
}

/// Normalized transaction the calculators work on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortingTransaction {
    pub losing: OperatorId,
    pub winning: OperatorId,
    pub month: Period,
    pub lines: u64,
}

impl CsvRecord {
    /// Validate into a `PortingRecord`; `row` is the 1-based data row used in errors
    pub fn to_record(&self, row: usize) -> Result<PortingRecord> {
        let shape = |message: String| EngineError::InputShape { row, message };

        if self.cedente.trim().is_empty() || self.receptor.trim().is_empty() {
            return Err(shape("empty operator name".to_string()));
        }

        let month: Period = self
            .mes
            .parse()
            .map_err(|_| shape(format!("unparseable month '{}'", self.mes)))?;

        if !self.lineas.is_finite() || self.lineas < 0.0 || self.lineas.fract() != 0.0 {
            return Err(shape(format!(
                "line count must be a non-negative integer, got {}",
                self.lineas
            )));
        }

        if self.lineas > MAX_LINES {
            return Err(shape(format!(
                "line count {} exceeds the exact integer range",
                self.lineas
            )));
        }

        Ok(PortingRecord {
            losing_operator: self.cedente.clone(),
            winning_operator: self.receptor.clone(),
            month,
            lines: self.lineas as u64,
            losing_modality: self.mod_cedente.clone(),
            winning_modality: self.mod_receptor.clone(),
        })
    }
}
