//! Query-language symbols backed by the metric index.
//!
//! Symbols evaluate to a per-atom number. Atoms without a value evaluate to
//! `-1.0` so comparisons like `pLDDT > 70` simply fail for them.

use rustc_hash::FxHashMap;

use crate::model::{ElementIndex, Selection, SelectionGroup, Unit};
use crate::quality::{MetricKind, QualityAssessmentProvider};

/// pLDDT of the atom's residue (first pLDDT metric).
pub const PLDDT_SYMBOL: &str = "ma.quality-assessment.pLDDT";
/// QMEAN of the atom's residue (first QMEAN metric).
pub const QMEAN_SYMBOL: &str = "ma.quality-assessment.qmean";

/// Value of a symbol for atoms without data.
pub const NO_VALUE: f64 = -1.0;

/// The atom a symbol is evaluated for.
pub struct SymbolContext<'a> {
    /// Shared metric index.
    pub provider: &'a QualityAssessmentProvider,
    /// Unit of the atom.
    pub unit: &'a Unit<'a>,
    /// Atom index in model indexing.
    pub element: ElementIndex,
}

/// A symbol implementation.
pub type SymbolFn = fn(&SymbolContext<'_>) -> f64;

fn default_metric_value(ctx: &SymbolContext<'_>, kind: MetricKind) -> f64 {
    if !ctx.unit.is_atomic() {
        return NO_VALUE;
    }
    let Some(residue) = ctx.unit.model.residue_index(ctx.element) else {
        return NO_VALUE;
    };
    ctx.provider
        .obtain(ctx.unit.model)
        .values_or_default(None, kind)
        .and_then(|values| values.get(residue))
        .unwrap_or(NO_VALUE)
}

/// [`PLDDT_SYMBOL`].
pub fn plddt(ctx: &SymbolContext<'_>) -> f64 {
    default_metric_value(ctx, MetricKind::Plddt)
}

/// [`QMEAN_SYMBOL`].
pub fn qmean(ctx: &SymbolContext<'_>) -> f64 {
    default_metric_value(ctx, MetricKind::Qmean)
}

/// Symbols by name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<&'static str, SymbolFn>,
}

impl SymbolTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the pLDDT and QMEAN symbols.
    pub fn with_quality_symbols() -> Self {
        let mut table = Self::new();
        table.register(PLDDT_SYMBOL, plddt);
        table.register(QMEAN_SYMBOL, qmean);
        table
    }

    /// Add or replace a symbol.
    pub fn register(&mut self, name: &'static str, symbol: SymbolFn) {
        let _ = self.symbols.insert(name, symbol);
    }

    /// Remove a symbol, returning whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.symbols.remove(name).is_some()
    }

    /// Symbol by name.
    pub fn get(&self, name: &str) -> Option<SymbolFn> {
        self.symbols.get(name).copied()
    }

    /// Evaluate a symbol, `None` when it is not registered.
    pub fn evaluate(&self, name: &str, ctx: &SymbolContext<'_>) -> Option<f64> {
        self.get(name).map(|symbol| symbol(ctx))
    }
}

/// Display name of the confident-residue selection.
pub const CONFIDENT_PLDDT_LABEL: &str = "Confident pLDDT (> 70)";
/// Description of the confident-residue selection.
pub const CONFIDENT_PLDDT_DESCRIPTION: &str =
    "Select residues with a pLDDT > 70 (confident).";

const CONFIDENT_PLDDT_THRESHOLD: f64 = 70.0;

/// Atoms of residues with pLDDT above 70, whole residues at a time.
///
/// Only atomic units take part; units without a hit are left out of the
/// selection.
pub fn confident_plddt_residues<'a>(
    provider: &'a QualityAssessmentProvider,
    units: impl IntoIterator<Item = &'a Unit<'a>>,
) -> Selection<'a> {
    let groups = units
        .into_iter()
        .filter(|unit| unit.is_atomic())
        .filter_map(|unit| {
            let indices: Vec<usize> = unit
                .elements
                .iter()
                .enumerate()
                .filter(|&(_, &element)| {
                    plddt(&SymbolContext {
                        provider,
                        unit,
                        element,
                    }) > CONFIDENT_PLDDT_THRESHOLD
                })
                .map(|(index, _)| index)
                .collect();
            (!indices.is_empty()).then_some(SelectionGroup { unit, indices })
        })
        .collect();
    Selection { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitKind;
    use crate::testing::{metric_frame, plddt_model, MockModel};

    #[test]
    fn symbols_read_default_metrics() {
        let provider = QualityAssessmentProvider::new();
        let frame = metric_frame(
            &[
                (1, "pLDDT", "pLDDT", "local"),
                (2, "QMEAN", "QMEAN", "local"),
            ],
            &[(1, "A", 1, 1, 88.0), (2, "A", 2, 1, 0.4)],
        );
        let model = MockModel::single_chain(1, 2).with_source(frame);
        let unit = Unit::atomic(0, &model, model.all_atoms());
        let table = SymbolTable::with_quality_symbols();
        let at = |element| SymbolContext {
            provider: &provider,
            unit: &unit,
            element,
        };
        assert_eq!(table.evaluate(PLDDT_SYMBOL, &at(1)), Some(88.0));
        assert_eq!(table.evaluate(PLDDT_SYMBOL, &at(2)), Some(NO_VALUE));
        assert_eq!(table.evaluate(QMEAN_SYMBOL, &at(3)), Some(0.4));
        assert_eq!(table.evaluate(QMEAN_SYMBOL, &at(0)), Some(NO_VALUE));
        assert_eq!(table.evaluate("ma.other", &at(0)), None);
    }

    #[test]
    fn no_metadata_is_no_value() {
        let provider = QualityAssessmentProvider::new();
        let model = MockModel::single_chain(1, 1);
        let unit = Unit::atomic(0, &model, model.all_atoms());
        let ctx = SymbolContext {
            provider: &provider,
            unit: &unit,
            element: 0,
        };
        assert_eq!(plddt(&ctx), NO_VALUE);
        assert_eq!(qmean(&ctx), NO_VALUE);
    }

    #[test]
    fn register_and_remove() {
        let mut table = SymbolTable::new();
        assert!(table.get(PLDDT_SYMBOL).is_none());
        table.register(PLDDT_SYMBOL, plddt);
        assert!(table.get(PLDDT_SYMBOL).is_some());
        assert!(table.remove(PLDDT_SYMBOL));
        assert!(!table.remove(PLDDT_SYMBOL));
    }

    #[test]
    fn confident_residues_selected_whole() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[95.0, 70.0, 71.0]);
        let unit = Unit::atomic(3, &model, model.all_atoms());
        let coarse = Unit {
            kind: UnitKind::Spheres,
            ..Unit::atomic(4, &model, model.all_atoms())
        };
        let selection = confident_plddt_residues(&provider, [&unit, &coarse]);
        assert_eq!(selection.groups.len(), 1);
        assert_eq!(selection.groups[0].unit.id, 3);
        assert_eq!(selection.groups[0].indices, vec![0, 1, 4, 5]);
    }

    #[test]
    fn nothing_confident_is_empty() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[20.0, 70.0]);
        let unit = Unit::atomic(0, &model, model.all_atoms());
        assert!(confident_plddt_residues(&provider, [&unit]).is_empty());
    }
}
