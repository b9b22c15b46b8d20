//! Per-model quality-assessment index with a build-once cache.
//!
//! The host owns model lifetime: an entry is built the first time a model is
//! asked for and stays until [`QualityAssessmentProvider::evict`] is called
//! for that model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::reader::{
    read_local_metrics, LocalTable, MetricTable, SchemaError, METRIC_CATEGORY,
};
use super::{MetricKind, MetricMode, QualityAssessment};
use crate::error::QaError;
use crate::model::{ModelId, StructureModel};
use crate::options::QualityOptions;

type Slot<T> = Arc<OnceLock<Arc<T>>>;

/// Build-once cache keyed by `K`.
///
/// The map lock is only held to fetch a key's slot. The build runs under the
/// slot's [`OnceLock`], so concurrent callers for the same key wait for the
/// single build and share its result, while other keys build in parallel.
pub(crate) struct BuildCache<K, T> {
    slots: Mutex<FxHashMap<K, Slot<T>>>,
    builds: AtomicUsize,
}

impl<K: std::hash::Hash + Eq + Copy, T> BuildCache<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(FxHashMap::default()),
            builds: AtomicUsize::new(0),
        }
    }

    pub(crate) fn get_or_build(
        &self,
        key: K,
        build: impl FnOnce() -> T,
    ) -> Arc<T> {
        let slot = Arc::clone(self.slots.lock().entry(key).or_default());
        Arc::clone(slot.get_or_init(|| {
            let _ = self.builds.fetch_add(1, Ordering::Relaxed);
            Arc::new(build())
        }))
    }

    pub(crate) fn get(&self, key: K) -> Option<Arc<T>> {
        self.slots.lock().get(&key)?.get().cloned()
    }

    pub(crate) fn evict(&self, key: K) -> bool {
        self.slots.lock().remove(&key).is_some()
    }

    pub(crate) fn evict_where(&self, mut pred: impl FnMut(&K) -> bool) {
        self.slots.lock().retain(|k, _| !pred(k));
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub(crate) fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

/// Builds and caches [`QualityAssessment`]s per model.
pub struct QualityAssessmentProvider {
    cache: BuildCache<ModelId, QualityAssessment>,
}

impl Default for QualityAssessmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAssessmentProvider {
    /// Provider with an empty cache.
    pub fn new() -> Self {
        Self {
            cache: BuildCache::new(),
        }
    }

    /// Whether the model carries local metrics.
    ///
    /// With a `kind` filter, at least one `local` metric name must contain
    /// the family's name (case-insensitive). [`MetricKind::Unclassified`]
    /// has no name and behaves like no filter.
    pub fn is_applicable(
        &self,
        model: &dyn StructureModel,
        kind: Option<MetricKind>,
    ) -> bool {
        let Some(frame) = model.source() else {
            return false;
        };
        let (Ok(definitions), Ok(_)) =
            (MetricTable::new(frame), LocalTable::new(frame))
        else {
            return false;
        };
        match kind.and_then(MetricKind::name_query) {
            Some(query) => definitions.has_named(MetricMode::Local, query),
            None => true,
        }
    }

    /// The model's assessment, built on first request.
    ///
    /// Models without usable metadata get an empty assessment.
    pub fn obtain(
        &self,
        model: &dyn StructureModel,
    ) -> Arc<QualityAssessment> {
        self.cache.get_or_build(model.id(), || build(model))
    }

    /// Like [`obtain`](Self::obtain), but reports why a model has no
    /// metrics instead of returning an empty assessment.
    pub fn try_obtain(
        &self,
        model: &dyn StructureModel,
    ) -> Result<Arc<QualityAssessment>, QaError> {
        let frame = model.source().ok_or_else(|| {
            SchemaError::MissingCategory(METRIC_CATEGORY.to_owned())
        })?;
        let _ = MetricTable::new(frame)?;
        let _ = LocalTable::new(frame)?;
        Ok(self.obtain(model))
    }

    /// Hook for the host's model-loaded event. Builds eagerly when
    /// `auto_attach` is set.
    pub fn on_model_loaded(
        &self,
        model: &dyn StructureModel,
        options: &QualityOptions,
    ) {
        if options.auto_attach && self.is_applicable(model, None) {
            let _ = self.obtain(model);
        }
    }

    /// The cached assessment, without building.
    pub fn get(&self, model_id: ModelId) -> Option<Arc<QualityAssessment>> {
        self.cache.get(model_id)
    }

    /// Metric choices of one family as `(id, "<name> (<type>)")`, in
    /// first-seen order.
    pub fn local_options(
        &self,
        model: &dyn StructureModel,
        kind: MetricKind,
    ) -> Vec<(i32, String)> {
        self.obtain(model)
            .local()
            .iter()
            .filter(|m| m.definition.kind == kind)
            .map(|m| (m.definition.id, m.definition.option_label()))
            .collect()
    }

    /// Drop the cached assessment of a disposed model.
    ///
    /// Returns `true` if an entry existed.
    pub fn evict(&self, model_id: ModelId) -> bool {
        let removed = self.cache.evict(model_id);
        if removed {
            log::debug!("evicted quality assessment of model {model_id}");
        }
        removed
    }

    /// Number of cached models.
    pub fn cached_models(&self) -> usize {
        self.cache.len()
    }

    /// Number of builds performed so far.
    pub fn build_count(&self) -> usize {
        self.cache.build_count()
    }
}

fn build(model: &dyn StructureModel) -> QualityAssessment {
    let Some(frame) = model.source() else {
        return QualityAssessment::default();
    };
    match read_local_metrics(model, frame) {
        Ok(local) => QualityAssessment::new(local),
        Err(e) => {
            log::debug!("model {} has no quality assessment: {e}", model.id());
            QualityAssessment::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Frame;
    use crate::testing::{metric_frame, plddt_model, MockModel};

    #[test]
    fn not_applicable_without_metadata() {
        let provider = QualityAssessmentProvider::new();
        let bare = MockModel::single_chain(1, 3);
        assert!(!provider.is_applicable(&bare, None));
        let empty = bare.with_source(Frame::new("x"));
        assert!(!provider.is_applicable(&empty, None));
        assert!(provider.obtain(&empty).is_empty());
    }

    #[test]
    fn applicable_by_kind() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[80.0]);
        assert!(provider.is_applicable(&model, None));
        assert!(provider.is_applicable(&model, Some(MetricKind::Plddt)));
        assert!(!provider.is_applicable(&model, Some(MetricKind::Qmean)));
        assert!(provider.is_applicable(&model, Some(MetricKind::Unclassified)));
    }

    #[test]
    fn obtain_is_cached() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[55.0, 95.0]);
        let first = provider.obtain(&model);
        let second = provider.obtain(&model);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.build_count(), 1);
        assert_eq!(first.default_plddt().unwrap().get(1), Some(95.0));
    }

    #[test]
    fn get_does_not_build() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[55.0]);
        assert!(provider.get(model.id).is_none());
        let _ = provider.obtain(&model);
        assert!(provider.get(model.id).is_some());
        assert_eq!(provider.build_count(), 1);
    }

    #[test]
    fn evict_forces_rebuild() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[55.0]);
        let _ = provider.obtain(&model);
        assert!(provider.evict(model.id));
        assert!(!provider.evict(model.id));
        assert_eq!(provider.cached_models(), 0);
        let _ = provider.obtain(&model);
        assert_eq!(provider.build_count(), 2);
    }

    #[test]
    fn concurrent_obtain_builds_once() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[10.0, 20.0, 30.0]);
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| provider.obtain(&model)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(provider.build_count(), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn local_options_in_first_seen_order() {
        let provider = QualityAssessmentProvider::new();
        let frame = metric_frame(
            &[
                (4, "QMEAN", "normalized score", "local"),
                (2, "pLDDT", "pLDDT", "local"),
                (9, "pLDDT (refined)", "pLDDT", "local"),
            ],
            &[],
        );
        let model = MockModel::single_chain(1, 2).with_source(frame);
        assert_eq!(
            provider.local_options(&model, MetricKind::Plddt),
            vec![
                (2, "pLDDT (pLDDT)".to_owned()),
                (9, "pLDDT (refined) (pLDDT)".to_owned()),
            ]
        );
        assert_eq!(provider.local_options(&model, MetricKind::Qmean).len(), 1);
        assert!(provider
            .local_options(&model, MetricKind::Unclassified)
            .is_empty());
    }

    #[test]
    fn try_obtain_reports_schema_problems() {
        let provider = QualityAssessmentProvider::new();
        let bare = MockModel::single_chain(1, 1);
        assert!(matches!(
            provider.try_obtain(&bare),
            Err(QaError::Schema(SchemaError::MissingCategory(_)))
        ));
        let frame = metric_frame(&[(1, "pLDDT", "pLDDT", "local")], &[]);
        let frame_without_values = Frame::new("model").with_category(
            frame.category(METRIC_CATEGORY).unwrap().clone(),
        );
        let model = bare.clone().with_source(frame_without_values);
        let err = provider.try_obtain(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "metric schema error: missing category: ma_qa_metric_local"
        );
        assert_eq!(provider.build_count(), 0);
        let ok = bare.with_source(frame);
        assert!(provider.try_obtain(&ok).unwrap().default_plddt().is_some());
    }

    #[test]
    fn auto_attach_builds_on_load() {
        let provider = QualityAssessmentProvider::new();
        let model = plddt_model(&[80.0]);
        provider.on_model_loaded(&model, &QualityOptions::default());
        assert_eq!(provider.cached_models(), 0);
        let eager = QualityOptions {
            auto_attach: true,
            ..Default::default()
        };
        provider.on_model_loaded(&MockModel::single_chain(1, 1), &eager);
        assert_eq!(provider.cached_models(), 0);
        provider.on_model_loaded(&model, &eager);
        assert!(provider.get(model.id).is_some());
    }

    #[test]
    fn models_are_keyed_by_identity() {
        let provider = QualityAssessmentProvider::new();
        let a = plddt_model(&[10.0]);
        let b = plddt_model(&[90.0]).with_id(2);
        let first = |m: &MockModel| {
            provider.obtain(m).default_plddt().and_then(|v| v.get(0))
        };
        assert_eq!(first(&a), Some(10.0));
        assert_eq!(first(&b), Some(90.0));
        assert_eq!(provider.cached_models(), 2);
    }
}
