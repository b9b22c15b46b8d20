//! Residue-pair metrics (predicted aligned error).
//!
//! Pairwise matrices can be large, so they are only built for a metric id
//! someone asks for. [`PairwiseCache`] memoizes those builds per
//! `(model, metric)`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::provider::BuildCache;
use super::reader::{
    MetricTable, ResidueLocator, SchemaError, PAIRWISE_CATEGORY,
};
use super::{widen, MetricMode, EMPTY_RANGE};
use crate::model::{ModelId, ResidueIndex, StructureModel};
use crate::table::{Column, Frame};

/// Pairwise metric families this crate understands are PAE-like.
const PAIRWISE_NAME_QUERY: &str = "pae";

/// A sparse, directional residue x residue matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMetric {
    /// `ma_qa_metric.id`.
    pub id: i32,
    /// `ma_qa_metric.name`.
    pub name: String,
    /// Smallest and largest residue index seen on either side.
    pub residue_range: [ResidueIndex; 2],
    /// `[min, max]` of the stored values.
    pub value_range: [f64; 2],
    /// `values[r1][r2]`, exactly as given (not symmetrized).
    pub values: FxHashMap<ResidueIndex, FxHashMap<ResidueIndex, f64>>,
}

impl PairwiseMetric {
    fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            residue_range: [ResidueIndex::MAX, ResidueIndex::MIN],
            value_range: EMPTY_RANGE,
            values: FxHashMap::default(),
        }
    }

    /// Value for the ordered pair `(r1, r2)`.
    pub fn get(&self, r1: ResidueIndex, r2: ResidueIndex) -> Option<f64> {
        self.values.get(&r1)?.get(&r2).copied()
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.values.values().map(FxHashMap::len).sum()
    }

    /// Whether no pair is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, r1: ResidueIndex, r2: ResidueIndex, value: f64) {
        let _ = self.values.entry(r1).or_default().insert(r2, value);
        for r in [r1, r2] {
            self.residue_range[0] = self.residue_range[0].min(r);
            self.residue_range[1] = self.residue_range[1].max(r);
        }
        widen(&mut self.value_range, value);
    }
}

/// Typed view of `ma_qa_metric_local_pairwise`.
struct PairwiseTable<'a> {
    model_id: Column<'a>,
    metric_id: Column<'a>,
    metric_value: Column<'a>,
    first: ResidueLocator<'a>,
    second: ResidueLocator<'a>,
    rows: usize,
}

impl<'a> PairwiseTable<'a> {
    fn new(frame: &'a Frame) -> Result<Self, SchemaError> {
        let cat = frame.category(PAIRWISE_CATEGORY).ok_or_else(|| {
            SchemaError::MissingCategory(PAIRWISE_CATEGORY.to_owned())
        })?;
        let column = |name: &str| {
            cat.column(name).ok_or_else(|| SchemaError::MissingColumn {
                category: PAIRWISE_CATEGORY.to_owned(),
                column: name.to_owned(),
            })
        };
        Ok(Self {
            model_id: column("model_id")?,
            metric_id: column("metric_id")?,
            metric_value: column("metric_value")?,
            first: ResidueLocator::new(cat, "_1")?,
            second: ResidueLocator::new(cat, "_2")?,
            rows: cat.nrows(),
        })
    }
}

/// PAE-like pairwise metrics declared in `frame`, as `(id, name)`.
///
/// Empty when the frame has no pairwise values at all.
pub fn list_pairwise_metrics(frame: &Frame) -> Vec<(i32, String)> {
    let (Ok(definitions), Ok(values)) =
        (MetricTable::new(frame), PairwiseTable::new(frame))
    else {
        return Vec::new();
    };
    if values.rows == 0 {
        return Vec::new();
    }
    definitions
        .definitions(MetricMode::LocalPairwise)
        .filter(|d| d.name.to_lowercase().contains(PAIRWISE_NAME_QUERY))
        .map(|d| (d.id, d.name))
        .collect()
}

/// Build the pairwise matrix of `metric_id` for `model`.
///
/// Returns `None` when no `local-pairwise` definition has that id, or the
/// frame has no pairwise values.
pub fn build_pairwise_metric(
    model: &dyn StructureModel,
    frame: &Frame,
    metric_id: i32,
) -> Option<PairwiseMetric> {
    let definitions = MetricTable::new(frame).ok()?;
    let table = PairwiseTable::new(frame).ok()?;
    if table.rows == 0 {
        return None;
    }
    let definition = definitions
        .definitions(MetricMode::LocalPairwise)
        .find(|d| d.id == metric_id)?;
    let mut metric = PairwiseMetric::new(definition.id, &definition.name);

    let model_num = model.model_num();
    for row in 0..table.rows {
        if table.model_id.i32(row) != Some(model_num)
            || table.metric_id.i32(row) != Some(metric_id)
        {
            continue;
        }
        let Some(r1) = table.first.resolve(model, row) else {
            continue;
        };
        let Some(r2) = table.second.resolve(model, row) else {
            continue;
        };
        let Some(value) = table.metric_value.f64(row) else {
            continue;
        };
        metric.insert(r1, r2, value);
    }

    log::debug!(
        "model {}: built pairwise metric {} '{}' with {} pairs",
        model.id(),
        metric.id,
        metric.name,
        metric.len()
    );
    Some(metric)
}

/// Build-once cache of pairwise matrices keyed by `(model, metric id)`.
pub struct PairwiseCache {
    cache: BuildCache<(ModelId, i32), Option<Arc<PairwiseMetric>>>,
}

impl Default for PairwiseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PairwiseCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            cache: BuildCache::new(),
        }
    }

    /// The matrix for `(model, metric_id)`, built on first request.
    ///
    /// A "no such metric" answer is cached too.
    pub fn obtain(
        &self,
        model: &dyn StructureModel,
        frame: &Frame,
        metric_id: i32,
    ) -> Option<Arc<PairwiseMetric>> {
        let built = self.cache.get_or_build((model.id(), metric_id), || {
            build_pairwise_metric(model, frame, metric_id).map(Arc::new)
        });
        (*built).clone()
    }

    /// Drop every matrix of a disposed model.
    pub fn evict(&self, model_id: ModelId) {
        self.cache.evict_where(|&(m, _)| m == model_id);
    }

    /// Number of builds performed so far.
    pub fn build_count(&self) -> usize {
        self.cache.build_count()
    }
}
