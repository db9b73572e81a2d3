use serde::{Deserialize, Serialize};

/// Query string of the analytics endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    /// Calendar year, current year when absent
    pub year: Option<i32>,
    /// Free label echoed back by `/analytics/report`
    pub period: Option<String>,
}

impl AnalyticsQuery {
    pub fn period_label(&self) -> String {
        self.period
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("1year")
            .to_string()
    }
}
