use crate::policy::RecommendationPolicy;

pub const DEFAULT_TOPIC: &str = "portabilidad_movil_peru";
pub const DEFAULT_CHART_MONTHS: usize = 16;
pub const DEFAULT_NET_WINDOW_MONTHS: usize = 12;

/// Settings for one bundle build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub topic: String,
    /// Trailing months shown in the totals chart
    pub chart_months: usize,
    /// Trailing months of the net series handed to chart renderers
    pub net_window_months: usize,
    pub policy: RecommendationPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            topic: DEFAULT_TOPIC.to_string(),
            chart_months: DEFAULT_CHART_MONTHS,
            net_window_months: DEFAULT_NET_WINDOW_MONTHS,
            policy: RecommendationPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Apply command-line overrides on top of this configuration
    pub fn with_windows(mut self, chart_months: Option<usize>, net_window_months: Option<usize>) -> Self {
        if let Some(months) = chart_months {
            self.chart_months = months;
        }
        if let Some(months) = net_window_months {
            self.net_window_months = months;
        }
        self
    }
}
