//! pLDDT confidence coloring in the four AlphaFold bands.

use std::sync::Arc;

use super::{
    location_score, ColorTheme, ThemeContext, ThemeParams, NO_DATA_COLOR,
};
use crate::color::legend::{Legend, TableLegend};
use crate::color::scale::{ColorList, ColorScale, ColorScaleProps};
use crate::color::Color;
use crate::model::Location;
use crate::quality::{MetricKind, QualityAssessmentProvider};

/// Band colors with their upper bound as a fraction of the domain.
const CONFIDENCE_STOPS: [(&str, Color, f64); 4] = [
    ("Very low", Color(0xff7d45), 0.5),
    ("Low", Color(0xffdb13), 0.7),
    ("Confident", Color(0x65cbf3), 0.9),
    ("Very high", Color(0x0053d6), 1.0),
];

/// Default pLDDT domain.
const PLDDT_DOMAIN: [f64; 2] = [0.0, 100.0];

/// Colors residues by pLDDT confidence band.
pub struct PlddtConfidenceTheme {
    provider: Arc<QualityAssessmentProvider>,
    metric_id: Option<i32>,
    scale: ColorScale,
}

impl PlddtConfidenceTheme {
    /// Registry id.
    pub const NAME: &'static str = "plddt-confidence";
    /// Display label.
    pub const LABEL: &'static str = "pLDDT Confidence";

    /// Theme for `ctx`; the scale follows the chosen metric's domain.
    pub fn new(ctx: &ThemeContext<'_>, params: ThemeParams) -> Self {
        let metric_id = params
            .metric_id
            .or_else(|| ctx.default_metric_id(MetricKind::Plddt));
        let mut scale = ColorScale::discrete(ColorScaleProps {
            domain: PLDDT_DOMAIN,
            list: ColorList::Offsets(
                CONFIDENCE_STOPS
                    .iter()
                    .map(|&(_, color, offset)| (color, offset))
                    .collect(),
            ),
            ..Default::default()
        });
        if let Some([min, max]) =
            ctx.metric_domain(metric_id, MetricKind::Plddt)
        {
            scale.set_domain(min, max);
        }
        Self {
            provider: Arc::clone(&ctx.provider),
            metric_id,
            scale,
        }
    }

    /// Metric this theme colors by, if any was available.
    pub fn metric_id(&self) -> Option<i32> {
        self.metric_id
    }
}

impl ColorTheme for PlddtConfidenceTheme {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn color(&self, location: &Location<'_>) -> Color {
        location_score(
            &self.provider,
            location,
            self.metric_id,
            MetricKind::Plddt,
        )
        .map_or(NO_DATA_COLOR, |score| self.scale.color(score))
    }

    fn legend(&self) -> Legend {
        let mut entries = vec![("No Score", NO_DATA_COLOR)];
        entries.extend(CONFIDENCE_STOPS.iter().map(|&(name, c, _)| (name, c)));
        Legend::Table(TableLegend::new(&entries))
    }

    fn description(&self) -> &'static str {
        "Assigns residue colors according to the pLDDT Confidence score. If \
         no pLDDT metric is available, a default color is used."
    }
}
