//! In-memory model and metadata builders shared by unit tests.

use crate::model::{
    ElementIndex, EntityIndex, ModelId, ResidueIndex, ResidueKey,
    StructureModel,
};
use crate::quality::reader::{LOCAL_CATEGORY, METRIC_CATEGORY};
use crate::table::{Category, Frame};

#[derive(Debug, Clone)]
struct ResidueLabel {
    entity: usize,
    asym: String,
    seq: i32,
    ins_code: Option<String>,
}

/// Minimal model: entities own chains, residues carry labels, atoms map to
/// residues.
#[derive(Debug, Clone)]
pub(crate) struct MockModel {
    pub(crate) id: ModelId,
    pub(crate) model_num: i32,
    pub(crate) source: Option<Frame>,
    /// (entity label, chains of the entity)
    entities: Vec<(String, Vec<String>)>,
    residues: Vec<ResidueLabel>,
    /// Residue of each atom.
    atoms: Vec<ResidueIndex>,
}

impl MockModel {
    /// One entity "1", chain "A", `n` residues numbered from 1, two atoms
    /// per residue.
    pub(crate) fn single_chain(model_num: i32, n: usize) -> Self {
        Self {
            id: 1,
            model_num,
            source: None,
            entities: vec![("1".to_owned(), vec!["A".to_owned()])],
            residues: (0..n)
                .map(|i| ResidueLabel {
                    entity: 0,
                    asym: "A".to_owned(),
                    seq: i as i32 + 1,
                    ins_code: None,
                })
                .collect(),
            atoms: (0..n as u32).flat_map(|r| [r, r]).collect(),
        }
    }

    /// Add chain `asym` of a new entity with `n` residues numbered from 1.
    pub(crate) fn with_chain(
        mut self,
        entity: &str,
        asym: &str,
        n: usize,
    ) -> Self {
        self.entities.push((entity.to_owned(), vec![asym.to_owned()]));
        let entity = self.entities.len() - 1;
        let first = self.residues.len() as u32;
        for i in 0..n {
            self.residues.push(ResidueLabel {
                entity,
                asym: asym.to_owned(),
                seq: i as i32 + 1,
                ins_code: None,
            });
        }
        for r in first..first + n as u32 {
            self.atoms.extend([r, r]);
        }
        self
    }

    pub(crate) fn with_ins_code(mut self, residue: usize, code: &str) -> Self {
        self.residues[residue].ins_code = Some(code.to_owned());
        self
    }

    pub(crate) fn with_id(mut self, id: ModelId) -> Self {
        self.id = id;
        self
    }

    pub(crate) fn with_source(mut self, frame: Frame) -> Self {
        self.source = Some(frame);
        self
    }

    /// Atom indices of a residue.
    pub(crate) fn atoms_of(&self, residue: ResidueIndex) -> Vec<ElementIndex> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == residue)
            .map(|(a, _)| a as ElementIndex)
            .collect()
    }

    pub(crate) fn all_atoms(&self) -> Vec<ElementIndex> {
        (0..self.atoms.len() as ElementIndex).collect()
    }
}

impl StructureModel for MockModel {
    fn id(&self) -> ModelId {
        self.id
    }

    fn model_num(&self) -> i32 {
        self.model_num
    }

    fn source(&self) -> Option<&Frame> {
        self.source.as_ref()
    }

    fn find_entity(&self, asym_id: &str) -> Option<EntityIndex> {
        self.entities
            .iter()
            .position(|(_, chains)| chains.iter().any(|c| c == asym_id))
            .map(|i| i as EntityIndex)
    }

    fn entity_label(&self, entity: EntityIndex) -> Option<&str> {
        self.entities
            .get(entity as usize)
            .map(|(label, _)| label.as_str())
    }

    fn find_residue_by_label(
        &self,
        key: &ResidueKey<'_>,
    ) -> Option<ResidueIndex> {
        self.residues
            .iter()
            .position(|r| {
                self.entities[r.entity].0 == key.entity_id
                    && r.asym == key.asym_id
                    && r.seq == key.seq_id
                    && r.ins_code.as_deref() == key.ins_code
            })
            .map(|i| i as ResidueIndex)
    }

    fn residue_index(&self, element: ElementIndex) -> Option<ResidueIndex> {
        self.atoms.get(element as usize).copied()
    }
}

/// `ma_qa_metric` rows: `(id, name, type, mode)`.
pub(crate) type DefRow<'a> = (i32, &'a str, &'a str, &'a str);
/// `ma_qa_metric_local` rows: `(metric_id, asym, seq, model_id, value)`.
pub(crate) type LocalRow<'a> = (i32, &'a str, i32, i32, f64);

/// Frame with `ma_qa_metric` and `ma_qa_metric_local` categories.
pub(crate) fn metric_frame(
    defs: &[DefRow<'_>],
    values: &[LocalRow<'_>],
) -> Frame {
    Frame::new("model")
        .with_category(metric_category(defs))
        .with_category(local_category(values))
}

pub(crate) fn metric_category(defs: &[DefRow<'_>]) -> Category {
    let mut cat =
        Category::new(METRIC_CATEGORY, &["id", "name", "type", "mode"]);
    for &(id, name, ty, mode) in defs {
        cat.push_row([
            id.to_string(),
            name.to_owned(),
            ty.to_owned(),
            mode.to_owned(),
        ]);
    }
    cat
}

pub(crate) fn local_category(values: &[LocalRow<'_>]) -> Category {
    let mut cat = Category::new(
        LOCAL_CATEGORY,
        &[
            "ordinal_id",
            "model_id",
            "label_asym_id",
            "label_seq_id",
            "metric_id",
            "metric_value",
        ],
    );
    for (i, &(metric, asym, seq, model, value)) in values.iter().enumerate() {
        cat.push_row([
            (i + 1).to_string(),
            model.to_string(),
            asym.to_owned(),
            seq.to_string(),
            metric.to_string(),
            value.to_string(),
        ]);
    }
    cat
}

/// Model 1 with chain A of `values.len()` residues and a single local
/// pLDDT metric (id 1) holding `values` in residue order.
pub(crate) fn plddt_model(values: &[f64]) -> MockModel {
    let rows: Vec<LocalRow<'_>> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (1, "A", i as i32 + 1, 1, v))
        .collect();
    let frame = metric_frame(&[(1, "pLDDT", "pLDDT", "local")], &rows);
    MockModel::single_chain(1, values.len()).with_source(frame)
}
