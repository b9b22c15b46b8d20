//! Hover labels: per-metric averages over a selection.
//!
//! Every local metric of every touched model gets one aggregate, keyed by
//! `(name, type)` so equally named metrics of different models share it.
//! A residue contributes at most once per aggregate, where residues are told
//! apart by `(residue index, unit id)`: the same residue seen through two
//! symmetry copies counts twice.

use std::fmt::Write as _;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{ResidueIndex, Selection, UnitId};
use crate::options::{LabelMarkup, LabelOptions};
use crate::quality::{MetricDefinition, MetricKind, QualityAssessmentProvider};

/// AlphaFold confidence band of a pLDDT score.
pub fn plddt_category(score: f64) -> &'static str {
    if score > 50.0 && score <= 70.0 {
        "Low"
    } else if score > 70.0 && score <= 90.0 {
        "Confident"
    } else if score > 90.0 {
        "Very high"
    } else {
        "Very low"
    }
}

struct Aggregate {
    name: String,
    metric_type: String,
    kind: MetricKind,
    score_sum: f64,
    seen: FxHashSet<(ResidueIndex, UnitId)>,
}

impl Aggregate {
    fn new(definition: &MetricDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            metric_type: definition.metric_type.clone(),
            kind: definition.kind,
            score_sum: 0.0,
            seen: FxHashSet::default(),
        }
    }

    fn label(&self, markup: LabelMarkup) -> String {
        let count = self.seen.len();
        let average = self.score_sum / count as f64;
        let mut label = self.name.clone();
        if self.metric_type != self.name {
            let _ = write!(label, " ({})", self.metric_type);
        }
        if count > 1 {
            label.push(' ');
            label.push_str(&markup.small(&format!("({count} Residues avg.)")));
        }
        let _ = write!(label, ": {average:.2}");
        if self.kind == MetricKind::Plddt {
            label.push(' ');
            label.push_str(
                &markup.small(&format!("({})", plddt_category(average))),
            );
        }
        label
    }
}

/// One label per metric with at least one scored residue in `selection`,
/// in first-seen order.
pub fn labels_for(
    provider: &QualityAssessmentProvider,
    selection: &Selection<'_>,
    markup: LabelMarkup,
) -> Vec<String> {
    let mut aggregates: Vec<Aggregate> = Vec::new();
    let mut slots: FxHashMap<(String, String), usize> = FxHashMap::default();

    for group in &selection.groups {
        let unit = group.unit;
        if !unit.is_atomic() {
            continue;
        }
        let assessment = provider.obtain(unit.model);
        for metric in assessment.local() {
            let definition = &metric.definition;
            let key = (definition.name.clone(), definition.metric_type.clone());
            let slot = *slots.entry(key).or_insert_with(|| {
                aggregates.push(Aggregate::new(definition));
                aggregates.len() - 1
            });
            let aggregate = &mut aggregates[slot];
            for &index in &group.indices {
                let Some(residue) = unit
                    .element(index)
                    .and_then(|e| unit.model.residue_index(e))
                else {
                    continue;
                };
                if aggregate.seen.contains(&(residue, unit.id)) {
                    continue;
                }
                let Some(score) = metric.values.get(residue) else {
                    continue;
                };
                aggregate.score_sum += score;
                let _ = aggregate.seen.insert((residue, unit.id));
            }
        }
    }

    aggregates
        .iter()
        .filter(|a| !a.seen.is_empty())
        .map(|a| a.label(markup))
        .collect()
}

/// Tooltip text for a hovered selection, or `None` when tooltips are off or
/// nothing in the selection carries a metric.
pub fn tooltip(
    provider: &QualityAssessmentProvider,
    selection: &Selection<'_>,
    options: &LabelOptions,
) -> Option<String> {
    if !options.show_tooltip {
        return None;
    }
    let labels = labels_for(provider, selection, options.markup);
    if labels.is_empty() {
        return None;
    }
    Some(labels.join(options.markup.line_break()))
}
