//! Legend descriptions shown next to a colored structure.

use serde::Serialize;

use super::scale::ColorList;
use super::Color;

/// A legend for a color theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Legend {
    /// A gradient between two labels.
    Scale(ScaleLegend),
    /// Named categories with one color each.
    Table(TableLegend),
}

/// Gradient legend derived from a color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleLegend {
    /// Label at the low end.
    pub min_label: String,
    /// Label at the high end.
    pub max_label: String,
    /// Colors in scale order.
    pub colors: ColorList,
}

/// Categorical legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLegend {
    /// `(category name, color)` in display order.
    pub entries: Vec<(String, Color)>,
}

impl TableLegend {
    /// Legend from static entries.
    pub fn new(entries: &[(&str, Color)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(name, color)| (name.to_owned(), color))
                .collect(),
        }
    }
}

impl Legend {
    /// JSON for the UI layer, empty if serialization fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("failed to serialize legend: {e}");
            String::new()
        })
    }
}
