//! Color themes that paint structures by quality metric.
//!
//! A theme is created from a [`ThemeContext`] (the models being colored and
//! the shared [`QualityAssessmentProvider`]) plus [`ThemeParams`], and then
//! answers [`ColorTheme::color`] for every location the host draws.

pub mod plddt;
pub mod qmean;
pub mod registry;

use std::sync::Arc;

pub use plddt::PlddtConfidenceTheme;
pub use qmean::QmeanScoreTheme;
pub use registry::{ThemeProvider, ThemeRegistry};

use crate::color::legend::Legend;
use crate::color::Color;
use crate::model::{Location, StructureModel};
use crate::quality::{MetricKind, QualityAssessmentProvider};

/// Color of locations without a usable score.
pub const NO_DATA_COLOR: Color = Color(0xaaaaaa);

/// A location → color function with a legend.
pub trait ColorTheme: Send + Sync {
    /// Registry id, e.g. `"plddt-confidence"`.
    fn name(&self) -> &'static str;

    /// Color of one location.
    fn color(&self, location: &Location<'_>) -> Color;

    /// Legend for the current state of the theme.
    fn legend(&self) -> Legend;

    /// One-line description for theme pickers.
    fn description(&self) -> &'static str;
}

/// What a theme is created for.
pub struct ThemeContext<'a> {
    /// Shared metric index.
    pub provider: Arc<QualityAssessmentProvider>,
    /// Models of the structure being colored, root model first.
    pub models: Vec<&'a dyn StructureModel>,
}

impl<'a> ThemeContext<'a> {
    /// Context over the given models.
    pub fn new(
        provider: Arc<QualityAssessmentProvider>,
        models: Vec<&'a dyn StructureModel>,
    ) -> Self {
        Self { provider, models }
    }

    /// Whether any model carries a metric of `kind`.
    pub fn is_applicable(&self, kind: MetricKind) -> bool {
        self.models
            .iter()
            .any(|m| self.provider.is_applicable(*m, Some(kind)))
    }

    /// Metric choices of `kind` offered for the root model.
    pub fn metric_options(&self, kind: MetricKind) -> Vec<(i32, String)> {
        self.models
            .first()
            .map(|m| self.provider.local_options(*m, kind))
            .unwrap_or_default()
    }

    /// First metric choice of `kind`, the default of `metric_id`.
    pub fn default_metric_id(&self, kind: MetricKind) -> Option<i32> {
        self.metric_options(kind).first().map(|&(id, _)| id)
    }

    /// Declared domain of the chosen metric on the root model.
    pub(crate) fn metric_domain(
        &self,
        metric_id: Option<i32>,
        kind: MetricKind,
    ) -> Option<[f64; 2]> {
        let model = self.models.first()?;
        let assessment = self.provider.obtain(*model);
        metric_id
            .and_then(|id| assessment.get(id))
            .or_else(|| assessment.default_metric(kind))
            .and_then(|m| m.definition.domain)
    }
}

/// User-facing theme parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeParams {
    /// Metric to color by; `None` picks the first metric of the theme's
    /// kind.
    pub metric_id: Option<i32>,
}

/// Score of the residue behind `location`.
///
/// `None` for non-atomic units, unresolved atoms, residues without a value
/// and negative values.
pub(crate) fn location_score(
    provider: &QualityAssessmentProvider,
    location: &Location<'_>,
    metric_id: Option<i32>,
    kind: MetricKind,
) -> Option<f64> {
    let (unit, element) = location.element()?;
    if !unit.is_atomic() {
        return None;
    }
    let residue = unit.model.residue_index(element)?;
    let assessment = provider.obtain(unit.model);
    let score = assessment.values_or_default(metric_id, kind)?.get(residue)?;
    (score >= 0.0).then_some(score)
}
