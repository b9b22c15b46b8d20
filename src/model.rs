//! Contract with the host that owns structural models.
//!
//! The host loads structures, assigns residue and atom indices, and decides
//! model lifetime. This crate only asks it to resolve residue labels, map
//! atoms to residues, and hand over the metadata [`Frame`].

use crate::table::Frame;

/// Model-local residue index assigned by the host.
pub type ResidueIndex = u32;
/// Model-local atom index assigned by the host.
pub type ElementIndex = u32;
/// Model-local entity index assigned by the host.
pub type EntityIndex = u32;
/// Identity of a loaded model. Used as the cache key.
pub type ModelId = u64;
/// Identity of a unit within a structure.
pub type UnitId = u32;

/// Label-based residue locator (`label_*` fields of mmCIF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueKey<'a> {
    /// `label_entity_id`.
    pub entity_id: &'a str,
    /// `label_asym_id`.
    pub asym_id: &'a str,
    /// `label_seq_id`.
    pub seq_id: i32,
    /// `pdbx_PDB_ins_code`, `None` when absent.
    pub ins_code: Option<&'a str>,
}

/// A loaded structural model as seen by the metric index.
pub trait StructureModel {
    /// Stable identity for the lifetime of the loaded model.
    fn id(&self) -> ModelId;

    /// Model number matched against `model_id` columns of metric tables.
    fn model_num(&self) -> i32;

    /// Metadata tables the model was loaded from, if tabular.
    fn source(&self) -> Option<&Frame>;

    /// Entity that owns the given chain (`label_asym_id`).
    fn find_entity(&self, asym_id: &str) -> Option<EntityIndex>;

    /// `label_entity_id` of an entity index.
    fn entity_label(&self, entity: EntityIndex) -> Option<&str>;

    /// Resolve a label locator to the model's residue index.
    fn find_residue_by_label(
        &self,
        key: &ResidueKey<'_>,
    ) -> Option<ResidueIndex>;

    /// Residue that owns the given atom.
    fn residue_index(&self, element: ElementIndex) -> Option<ResidueIndex>;
}

/// What kind of elements a unit holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitKind {
    /// Atoms with full residue hierarchy.
    #[default]
    Atomic,
    /// Coarse-grained spheres.
    Spheres,
    /// Coarse-grained gaussians.
    Gaussians,
}

/// One instance of a fragment of a model inside a structure.
pub struct Unit<'m> {
    /// Unit identity, unique within the structure.
    pub id: UnitId,
    /// Element kind.
    pub kind: UnitKind,
    /// Model this unit's elements index into.
    pub model: &'m dyn StructureModel,
    /// Atom indices of the unit, in model indexing.
    pub elements: Vec<ElementIndex>,
}

impl<'m> Unit<'m> {
    /// Atomic unit over the given atoms.
    pub fn atomic(
        id: UnitId,
        model: &'m dyn StructureModel,
        elements: Vec<ElementIndex>,
    ) -> Self {
        Self {
            id,
            kind: UnitKind::Atomic,
            model,
            elements,
        }
    }

    /// Whether elements are atoms with residue assignments.
    pub fn is_atomic(&self) -> bool {
        self.kind == UnitKind::Atomic
    }

    /// Model atom index at a unit-local position.
    pub fn element(&self, index: usize) -> Option<ElementIndex> {
        self.elements.get(index).copied()
    }
}

/// Selected unit-local positions within one unit.
pub struct SelectionGroup<'a> {
    /// The unit.
    pub unit: &'a Unit<'a>,
    /// Positions into [`Unit::elements`].
    pub indices: Vec<usize>,
}

/// A selection spanning any number of units.
#[derive(Default)]
pub struct Selection<'a> {
    /// Selected groups, one per touched unit.
    pub groups: Vec<SelectionGroup<'a>>,
}

impl<'a> Selection<'a> {
    /// Selection with a single group.
    pub fn single(unit: &'a Unit<'a>, indices: Vec<usize>) -> Self {
        Self {
            groups: vec![SelectionGroup { unit, indices }],
        }
    }

    /// Whether no element is selected.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.indices.is_empty())
    }
}

/// Something a color theme is asked to color.
pub enum Location<'a> {
    /// A single atom of a unit.
    Element {
        /// Owning unit.
        unit: &'a Unit<'a>,
        /// Atom index in model indexing.
        element: ElementIndex,
    },
    /// A bond between two unit-local positions.
    Bond {
        /// Unit of the first atom.
        a_unit: &'a Unit<'a>,
        /// Position of the first atom in `a_unit`.
        a_index: usize,
        /// Unit of the second atom.
        b_unit: &'a Unit<'a>,
        /// Position of the second atom in `b_unit`.
        b_index: usize,
    },
    /// Shapes, volumes and anything else without a residue.
    Other,
}

impl<'a> Location<'a> {
    /// The atom this location is colored by.
    ///
    /// Bonds resolve to their first atom.
    pub fn element(&self) -> Option<(&'a Unit<'a>, ElementIndex)> {
        match *self {
            Location::Element { unit, element } => Some((unit, element)),
            Location::Bond {
                a_unit, a_index, ..
            } => a_unit.element(a_index).map(|e| (a_unit, e)),
            Location::Other => None,
        }
    }
}
