use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quality::MetricKind;
use crate::theme::ThemeParams;

/// Metric choice per quality theme. Unset picks the first metric of the
/// theme's family.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Themes", inline)]
#[serde(default)]
pub struct ThemeOptions {
    /// `ma_qa_metric.id` colored by the pLDDT confidence theme.
    #[schemars(title = "pLDDT Metric")]
    pub plddt_metric_id: Option<i32>,
    /// `ma_qa_metric.id` colored by the QMEAN score theme.
    #[schemars(title = "QMEAN Metric")]
    pub qmean_metric_id: Option<i32>,
}

impl ThemeOptions {
    /// Theme parameters for a metric family.
    pub fn params(&self, kind: MetricKind) -> ThemeParams {
        let metric_id = match kind {
            MetricKind::Plddt => self.plddt_metric_id,
            MetricKind::Qmean => self.qmean_metric_id,
            MetricKind::Unclassified => None,
        };
        ThemeParams { metric_id }
    }
}
