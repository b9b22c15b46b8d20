//! Quality-assessment metrics attached to structural models.
//!
//! Metric definitions come from the `ma_qa_metric` table; values come from
//! `ma_qa_metric_local` (per residue) and `ma_qa_metric_local_pairwise`
//! (per residue pair). The [`provider`] builds and caches the per-residue
//! index for each model, [`pairwise`] builds residue-pair matrices on
//! demand.

pub mod pairwise;
pub mod provider;
pub mod reader;

pub use provider::QualityAssessmentProvider;
use rustc_hash::FxHashMap;

use crate::model::ResidueIndex;

/// Empty fold for running `[min, max]` ranges.
pub(crate) const EMPTY_RANGE: [f64; 2] = [f64::MAX, -f64::MAX];

/// Widen a running `[min, max]` range to include `value`.
pub(crate) fn widen(range: &mut [f64; 2], value: f64) {
    if value < range[0] {
        range[0] = value;
    }
    if value > range[1] {
        range[1] = value;
    }
}

/// Metric family, used to pick defaults, domains and label banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Predicted local distance difference test, usually 0-100.
    Plddt,
    /// QMEAN local score, usually 0-1.
    Qmean,
    /// Anything else.
    Unclassified,
}

impl MetricKind {
    /// Classify a metric from its `name` and `type` columns.
    ///
    /// The name is checked first, so a metric named "QMEAN" with a pLDDT
    /// type is QMEAN. Only when the name says nothing does the type decide:
    /// a pLDDT-like type means pLDDT, a `[0,1]` type means QMEAN.
    pub fn infer(name: &str, metric_type: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("plddt") {
            return Self::Plddt;
        }
        if name.contains("qmean") {
            return Self::Qmean;
        }
        if is_plddt_type(metric_type) {
            return Self::Plddt;
        }
        if has_unit_range(metric_type) {
            return Self::Qmean;
        }
        Self::Unclassified
    }

    /// Lowercase substring matched against metric names when filtering.
    pub fn name_query(self) -> Option<&'static str> {
        match self {
            Self::Plddt => Some("plddt"),
            Self::Qmean => Some("qmean"),
            Self::Unclassified => None,
        }
    }
}

fn is_plddt_type(metric_type: &str) -> bool {
    metric_type.to_lowercase().contains("plddt")
}

fn has_unit_range(metric_type: &str) -> bool {
    metric_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .contains("[0,1]")
}

/// Declared value domain implied by a metric type, if any.
///
/// `[0,1]` types win over pLDDT-like types, so "pLDDT in [0,1]" is `[0, 1]`.
pub fn domain_for_type(metric_type: &str) -> Option<[f64; 2]> {
    if has_unit_range(metric_type) {
        Some([0.0, 1.0])
    } else if is_plddt_type(metric_type) {
        Some([0.0, 100.0])
    } else {
        None
    }
}

/// `mode` column of `ma_qa_metric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricMode {
    /// One value per model.
    Global,
    /// One value per residue.
    Local,
    /// One value per ordered residue pair.
    LocalPairwise,
}

impl MetricMode {
    /// Parse the mmCIF enumeration value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(Self::Global),
            "local" => Some(Self::Local),
            "local-pairwise" => Some(Self::LocalPairwise),
            _ => None,
        }
    }

    /// The mmCIF enumeration value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
            Self::LocalPairwise => "local-pairwise",
        }
    }
}

/// One row of `ma_qa_metric`, with observed values folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    /// `ma_qa_metric.id`.
    pub id: i32,
    /// Inferred family.
    pub kind: MetricKind,
    /// `ma_qa_metric.type`, e.g. "pLDDT" or "normalized score".
    pub metric_type: String,
    /// `ma_qa_metric.name`.
    pub name: String,
    /// Declared domain implied by the type.
    pub domain: Option<[f64; 2]>,
    /// `[min, max]` of the values stored for this metric.
    pub value_range: [f64; 2],
}

impl MetricDefinition {
    /// Definition with kind and domain derived from name and type.
    pub fn new(id: i32, name: &str, metric_type: &str) -> Self {
        Self {
            id,
            kind: MetricKind::infer(name, metric_type),
            metric_type: metric_type.to_owned(),
            name: name.to_owned(),
            domain: domain_for_type(metric_type),
            value_range: EMPTY_RANGE,
        }
    }

    /// Option label, `"<name> (<type>)"`.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.metric_type)
    }

    /// Whether any value was folded into the range.
    pub fn has_values(&self) -> bool {
        self.value_range[0] <= self.value_range[1]
    }
}

/// Sparse per-residue values of one metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerResidueMetric {
    values: FxHashMap<ResidueIndex, f64>,
}

impl PerResidueMetric {
    /// Value at a residue.
    pub fn get(&self, residue: ResidueIndex) -> Option<f64> {
        self.values.get(&residue).copied()
    }

    /// Number of residues with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no residue carries a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All `(residue, value)` pairs, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (ResidueIndex, f64)> + '_ {
        self.values.iter().map(|(&r, &v)| (r, v))
    }

    pub(crate) fn insert(&mut self, residue: ResidueIndex, value: f64) {
        let _ = self.values.insert(residue, value);
    }
}

/// A local metric: its definition and its per-residue values.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMetric {
    /// Definition with the final value range.
    pub definition: MetricDefinition,
    /// Values keyed by residue.
    pub values: PerResidueMetric,
}

/// All local metrics of one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityAssessment {
    local: Vec<LocalMetric>,
    by_id: FxHashMap<i32, usize>,
    default_plddt: Option<usize>,
    default_qmean: Option<usize>,
}

impl QualityAssessment {
    /// Index metrics given in first-seen order.
    pub fn new(local: Vec<LocalMetric>) -> Self {
        let by_id = local
            .iter()
            .enumerate()
            .map(|(i, m)| (m.definition.id, i))
            .collect();
        let first_of = |kind| {
            local.iter().position(|m| m.definition.kind == kind)
        };
        let default_plddt = first_of(MetricKind::Plddt);
        let default_qmean = first_of(MetricKind::Qmean);
        Self {
            local,
            by_id,
            default_plddt,
            default_qmean,
        }
    }

    /// Local metrics in first-seen order.
    pub fn local(&self) -> &[LocalMetric] {
        &self.local
    }

    /// Whether the model carries no local metric.
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Metric by `ma_qa_metric.id`.
    pub fn get(&self, id: i32) -> Option<&LocalMetric> {
        self.by_id.get(&id).and_then(|&i| self.local.get(i))
    }

    /// Metric by name.
    pub fn by_name(&self, name: &str) -> Option<&LocalMetric> {
        self.local.iter().find(|m| m.definition.name == name)
    }

    /// First pLDDT metric's values.
    pub fn default_plddt(&self) -> Option<&PerResidueMetric> {
        self.default_plddt
            .and_then(|i| self.local.get(i))
            .map(|m| &m.values)
    }

    /// First QMEAN metric's values.
    pub fn default_qmean(&self) -> Option<&PerResidueMetric> {
        self.default_qmean
            .and_then(|i| self.local.get(i))
            .map(|m| &m.values)
    }

    /// Default metric of a family.
    pub fn default_metric(&self, kind: MetricKind) -> Option<&LocalMetric> {
        let index = match kind {
            MetricKind::Plddt => self.default_plddt,
            MetricKind::Qmean => self.default_qmean,
            MetricKind::Unclassified => None,
        };
        index.and_then(|i| self.local.get(i))
    }

    /// Values of the metric `id`, falling back to the default of `kind`
    /// when `id` is unset or unknown.
    pub fn values_or_default(
        &self,
        id: Option<i32>,
        kind: MetricKind,
    ) -> Option<&PerResidueMetric> {
        id.and_then(|id| self.get(id))
            .or_else(|| self.default_metric(kind))
            .map(|m| &m.values)
    }
}
