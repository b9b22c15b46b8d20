//! Theme and representation-preset registries.
//!
//! The host builds a [`ThemeRegistry`] once (usually with
//! [`ThemeRegistry::with_quality_themes`]) and passes it wherever themes are
//! picked by name.

use rustc_hash::FxHashMap;

use super::{
    ColorTheme, PlddtConfidenceTheme, QmeanScoreTheme, ThemeContext,
    ThemeParams,
};
use crate::quality::MetricKind;

/// Creates a theme for a context.
pub type ThemeFactory =
    fn(&ThemeContext<'_>, ThemeParams) -> Box<dyn ColorTheme>;

/// Registry entry describing one color theme.
#[derive(Debug, Clone, Copy)]
pub struct ThemeProvider {
    /// Unique id, e.g. `"plddt-confidence"`.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Metric family the theme colors by.
    pub kind: MetricKind,
    /// Constructor.
    pub factory: ThemeFactory,
}

fn plddt_factory(
    ctx: &ThemeContext<'_>,
    params: ThemeParams,
) -> Box<dyn ColorTheme> {
    Box::new(PlddtConfidenceTheme::new(ctx, params))
}

fn qmean_factory(
    ctx: &ThemeContext<'_>,
    params: ThemeParams,
) -> Box<dyn ColorTheme> {
    Box::new(QmeanScoreTheme::new(ctx, params))
}

impl ThemeProvider {
    /// pLDDT confidence bands.
    pub const PLDDT_CONFIDENCE: Self = Self {
        name: PlddtConfidenceTheme::NAME,
        label: PlddtConfidenceTheme::LABEL,
        kind: MetricKind::Plddt,
        factory: plddt_factory,
    };

    /// QMEAN score gradient.
    pub const QMEAN_SCORE: Self = Self {
        name: QmeanScoreTheme::NAME,
        label: QmeanScoreTheme::LABEL,
        kind: MetricKind::Qmean,
        factory: qmean_factory,
    };

    /// Whether any model of the context carries the theme's metric.
    pub fn is_applicable(&self, ctx: &ThemeContext<'_>) -> bool {
        ctx.is_applicable(self.kind)
    }

    /// Build the theme.
    pub fn create(
        &self,
        ctx: &ThemeContext<'_>,
        params: ThemeParams,
    ) -> Box<dyn ColorTheme> {
        (self.factory)(ctx, params)
    }
}

/// Themes by name.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    providers: FxHashMap<&'static str, ThemeProvider>,
}

impl ThemeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the pLDDT and QMEAN themes.
    pub fn with_quality_themes() -> Self {
        let mut registry = Self::new();
        let _ = registry.add(ThemeProvider::PLDDT_CONFIDENCE);
        let _ = registry.add(ThemeProvider::QMEAN_SCORE);
        registry
    }

    /// Register a provider, returning the one it replaced.
    pub fn add(&mut self, provider: ThemeProvider) -> Option<ThemeProvider> {
        self.providers.insert(provider.name, provider)
    }

    /// Unregister by name.
    pub fn remove(&mut self, name: &str) -> Option<ThemeProvider> {
        self.providers.remove(name)
    }

    /// Provider by name.
    pub fn get(&self, name: &str) -> Option<&ThemeProvider> {
        self.providers.get(name)
    }

    /// Number of registered themes.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no theme is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Providers applicable to `ctx`, sorted by name.
    pub fn applicable(&self, ctx: &ThemeContext<'_>) -> Vec<&ThemeProvider> {
        let mut found: Vec<_> = self
            .providers
            .values()
            .filter(|p| p.is_applicable(ctx))
            .collect();
        found.sort_by_key(|p| p.name);
        found
    }
}

/// A one-click representation setup that colors by a quality theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentationPreset {
    /// Unique id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Menu group.
    pub group: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Name of the theme the preset applies.
    pub theme: &'static str,
    /// Metric family that must be present.
    pub kind: MetricKind,
}

impl RepresentationPreset {
    /// Color by pLDDT confidence.
    pub const PLDDT: Self = Self {
        id: "preset-structure-representation-ma-quality-assessment-plddt",
        name: "Quality Assessment (pLDDT)",
        group: "Annotation",
        description: "Color structure based on pLDDT Confidence.",
        theme: PlddtConfidenceTheme::NAME,
        kind: MetricKind::Plddt,
    };

    /// Color by QMEAN score.
    pub const QMEAN: Self = Self {
        id: "preset-structure-representation-ma-quality-assessment-qmean",
        name: "Quality Assessment (QMEAN)",
        group: "Annotation",
        description: "Color structure based on QMEAN Score.",
        theme: QmeanScoreTheme::NAME,
        kind: MetricKind::Qmean,
    };

    /// Both quality presets.
    pub const ALL: [Self; 2] = [Self::PLDDT, Self::QMEAN];

    /// Whether any model carries the preset's metric.
    pub fn is_applicable(&self, ctx: &ThemeContext<'_>) -> bool {
        ctx.is_applicable(self.kind)
    }

    /// The preset's theme, or `None` when it is not registered or not
    /// applicable.
    pub fn apply(
        &self,
        registry: &ThemeRegistry,
        ctx: &ThemeContext<'_>,
        params: ThemeParams,
    ) -> Option<Box<dyn ColorTheme>> {
        if !self.is_applicable(ctx) {
            log::debug!("preset '{}' not applicable", self.name);
            return None;
        }
        let provider = registry.get(self.theme)?;
        Some(provider.create(ctx, params))
    }
}
