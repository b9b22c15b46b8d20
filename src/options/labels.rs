use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format of selection labels.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LabelMarkup {
    /// Plain text, one label per line.
    #[default]
    Plain,
    /// HTML with de-emphasized qualifiers.
    Html,
}

impl LabelMarkup {
    /// Wrap a secondary part of a label.
    pub fn small(self, text: &str) -> String {
        match self {
            Self::Plain => text.to_owned(),
            Self::Html => format!("<small>{text}</small>"),
        }
    }

    /// Separator between labels in a tooltip.
    pub fn line_break(self) -> &'static str {
        match self {
            Self::Plain => "\n",
            Self::Html => "</br>",
        }
    }
}

/// Hover label options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Labels", inline)]
#[serde(default)]
pub struct LabelOptions {
    /// Show metric averages when hovering a selection.
    #[schemars(title = "Show Tooltip")]
    pub show_tooltip: bool,
    /// Label format.
    #[schemars(title = "Markup")]
    pub markup: LabelMarkup,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            show_tooltip: true,
            markup: LabelMarkup::Plain,
        }
    }
}
