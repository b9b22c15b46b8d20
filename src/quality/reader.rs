//! Typed readers over the ModelCIF quality-assessment categories.
//!
//! Schema problems (missing category or column) surface as [`SchemaError`]
//! so callers can treat the model as "not applicable". Row-level problems
//! (unresolvable residues, unparsable numbers, rows for other models) are
//! skipped without error: this metadata is frequently inconsistent.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    widen, LocalMetric, MetricDefinition, MetricMode, PerResidueMetric,
};
use crate::model::{ResidueIndex, ResidueKey, StructureModel};
use crate::table::{Category, Column, Frame};

/// Metric definitions category.
pub const METRIC_CATEGORY: &str = "ma_qa_metric";
/// Per-residue values category.
pub const LOCAL_CATEGORY: &str = "ma_qa_metric_local";
/// Per-residue-pair values category.
pub const PAIRWISE_CATEGORY: &str = "ma_qa_metric_local_pairwise";

/// Missing pieces of the quality-assessment schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A whole category is absent.
    MissingCategory(String),
    /// A required column is absent from a category.
    MissingColumn {
        /// Category name.
        category: String,
        /// Column name.
        column: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory(name) => {
                write!(f, "missing category: {name}")
            }
            Self::MissingColumn { category, column } => {
                write!(f, "missing column {category}.{column}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

fn category<'a>(
    frame: &'a Frame,
    name: &str,
) -> Result<&'a Category, SchemaError> {
    frame
        .category(name)
        .ok_or_else(|| SchemaError::MissingCategory(name.to_owned()))
}

fn column<'a>(
    category: &'a Category,
    name: &str,
) -> Result<Column<'a>, SchemaError> {
    category
        .column(name)
        .ok_or_else(|| SchemaError::MissingColumn {
            category: category.name.clone(),
            column: name.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// ma_qa_metric
// ---------------------------------------------------------------------------

/// Typed view of `ma_qa_metric`.
pub struct MetricTable<'a> {
    id: Column<'a>,
    name: Column<'a>,
    metric_type: Column<'a>,
    mode: Column<'a>,
    rows: usize,
}

impl<'a> MetricTable<'a> {
    /// Bind the definitions table of a frame.
    pub fn new(frame: &'a Frame) -> Result<Self, SchemaError> {
        let cat = category(frame, METRIC_CATEGORY)?;
        Ok(Self {
            id: column(cat, "id")?,
            name: column(cat, "name")?,
            metric_type: column(cat, "type")?,
            mode: column(cat, "mode")?,
            rows: cat.nrows(),
        })
    }

    /// Definitions of the given mode, in table order.
    ///
    /// Rows without a numeric id are skipped.
    pub fn definitions(
        &self,
        mode: MetricMode,
    ) -> impl Iterator<Item = MetricDefinition> + '_ {
        (0..self.rows).filter_map(move |row| {
            if self.mode.str(row) != Some(mode.as_str()) {
                return None;
            }
            let id = self.id.i32(row)?;
            let name = self.name.str(row).unwrap_or_default();
            let metric_type = self.metric_type.str(row).unwrap_or_default();
            Some(MetricDefinition::new(id, name, metric_type))
        })
    }

    /// Whether any definition of `mode` has a name containing `query`
    /// (case-insensitive).
    pub fn has_named(&self, mode: MetricMode, query: &str) -> bool {
        let query = query.to_lowercase();
        self.definitions(mode)
            .any(|d| d.name.to_lowercase().contains(&query))
    }
}

// ---------------------------------------------------------------------------
// Residue locators
// ---------------------------------------------------------------------------

/// The `label_*` columns that locate one residue in a values row.
///
/// `suffix` selects the side of a pairwise row (`"_1"` / `"_2"`); local
/// rows use no suffix.
pub(crate) struct ResidueLocator<'a> {
    entity: Option<Column<'a>>,
    asym: Column<'a>,
    seq: Column<'a>,
    ins_code: Option<Column<'a>>,
}

impl<'a> ResidueLocator<'a> {
    pub(crate) fn new(
        cat: &'a Category,
        suffix: &str,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            entity: cat.column(&format!("label_entity_id{suffix}")),
            asym: column(cat, &format!("label_asym_id{suffix}"))?,
            seq: column(cat, &format!("label_seq_id{suffix}"))?,
            ins_code: cat.column(&format!("pdbx_PDB_ins_code{suffix}")),
        })
    }

    /// Resolve the row's locator to a residue of `model`.
    ///
    /// Rows without an entity column take the entity of the chain.
    pub(crate) fn resolve(
        &self,
        model: &dyn StructureModel,
        row: usize,
    ) -> Option<ResidueIndex> {
        let asym_id = self.asym.str(row)?;
        let seq_id = self.seq.i32(row)?;
        let entity_id = match self.entity.and_then(|c| c.str(row)) {
            Some(entity) => entity,
            None => model.entity_label(model.find_entity(asym_id)?)?,
        };
        let ins_code = self.ins_code.and_then(|c| c.str(row));
        model.find_residue_by_label(&ResidueKey {
            entity_id,
            asym_id,
            seq_id,
            ins_code,
        })
    }
}

// ---------------------------------------------------------------------------
// ma_qa_metric_local
// ---------------------------------------------------------------------------

/// Typed view of `ma_qa_metric_local`.
pub struct LocalTable<'a> {
    model_id: Column<'a>,
    metric_id: Column<'a>,
    metric_value: Column<'a>,
    locator: ResidueLocator<'a>,
    rows: usize,
}

impl<'a> LocalTable<'a> {
    /// Bind the per-residue values table of a frame.
    pub fn new(frame: &'a Frame) -> Result<Self, SchemaError> {
        let cat = category(frame, LOCAL_CATEGORY)?;
        Ok(Self {
            model_id: column(cat, "model_id")?,
            metric_id: column(cat, "metric_id")?,
            metric_value: column(cat, "metric_value")?,
            locator: ResidueLocator::new(cat, "")?,
            rows: cat.nrows(),
        })
    }

    /// Number of value rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Local metric definitions with duplicate names removed.
///
/// The first definition of a name wins; later ones are dropped with a
/// warning. Duplicate ids are dropped the same way.
pub fn local_definitions(table: &MetricTable<'_>) -> Vec<MetricDefinition> {
    let mut names = FxHashSet::default();
    let mut ids = FxHashSet::default();
    let mut out = Vec::new();
    for def in table.definitions(MetricMode::Local) {
        if names.contains(&def.name) {
            log::warn!(
                "local ma_qa_metric with name '{}' already added",
                def.name
            );
            continue;
        }
        if !ids.insert(def.id) {
            log::warn!("local ma_qa_metric with id {} already added", def.id);
            continue;
        }
        let _ = names.insert(def.name.clone());
        out.push(def);
    }
    out
}

/// Read every local metric of `model` from `frame`.
///
/// Returns metrics in first-seen definition order, each with its values
/// and final value range.
pub fn read_local_metrics(
    model: &dyn StructureModel,
    frame: &Frame,
) -> Result<Vec<LocalMetric>, SchemaError> {
    let definitions = MetricTable::new(frame)?;
    let table = LocalTable::new(frame)?;

    let mut metrics: Vec<LocalMetric> = local_definitions(&definitions)
        .into_iter()
        .map(|definition| LocalMetric {
            definition,
            values: PerResidueMetric::default(),
        })
        .collect();
    let slots: FxHashMap<i32, usize> = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| (m.definition.id, i))
        .collect();

    let model_num = model.model_num();
    let mut skipped = 0usize;
    for row in 0..table.rows {
        if table.model_id.i32(row) != Some(model_num) {
            continue;
        }
        let Some(metric) = table
            .metric_id
            .i32(row)
            .and_then(|id| slots.get(&id))
            .and_then(|&slot| metrics.get_mut(slot))
        else {
            continue;
        };
        let (Some(residue), Some(value)) = (
            table.locator.resolve(model, row),
            table.metric_value.f64(row),
        ) else {
            skipped += 1;
            log::trace!("skipping unresolvable {LOCAL_CATEGORY} row {row}");
            continue;
        };
        widen(&mut metric.definition.value_range, value);
        metric.values.insert(residue, value);
    }

    log::debug!(
        "model {}: read {} local metrics ({} rows skipped)",
        model.id(),
        metrics.len(),
        skipped
    );
    Ok(metrics)
}
