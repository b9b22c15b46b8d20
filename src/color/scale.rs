//! Numeric value → color mapping over a domain.
//!
//! Two modes:
//! - **Continuous** (`ColorScale::continuous`): interpolates between
//!   neighbouring colors.
//! - **Discrete** (`ColorScale::discrete`): picks one color per interval,
//!   no interpolation.
//!
//! Colors are either spaced uniformly ([`ColorList::Uniform`]) or placed at
//! explicit offsets in `[0, 1]` ([`ColorList::Offsets`]). Values outside
//! the domain clamp to the end colors.

use serde::Serialize;

use super::legend::{Legend, ScaleLegend};
use super::Color;

/// Colors of a scale, with or without explicit offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorList {
    /// Evenly spaced across the domain.
    Uniform(Vec<Color>),
    /// `(color, offset)` pairs, offsets in `[0, 1]`.
    Offsets(Vec<(Color, f64)>),
}

impl ColorList {
    /// Classify mixed entries: offsets are only honoured when every entry
    /// carries one.
    pub fn from_entries(entries: &[(Color, Option<f64>)]) -> Self {
        let offsets: Option<Vec<(Color, f64)>> = entries
            .iter()
            .map(|&(color, offset)| offset.map(|o| (color, o)))
            .collect();
        match offsets {
            Some(offsets) => Self::Offsets(offsets),
            None => Self::Uniform(entries.iter().map(|&(c, _)| c).collect()),
        }
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        match self {
            Self::Uniform(c) => c.len(),
            Self::Offsets(c) => c.len(),
        }
    }

    /// Whether the list has no colors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reversed(mut self) -> Self {
        match &mut self {
            Self::Uniform(c) => c.reverse(),
            Self::Offsets(c) => c.reverse(),
        }
        self
    }
}

/// Red → yellow → blue, eleven stops.
pub const RED_YELLOW_BLUE: [Color; 11] = [
    Color(0xa50026),
    Color(0xd73027),
    Color(0xf46d43),
    Color(0xfdae61),
    Color(0xfee090),
    Color(0xffffbf),
    Color(0xe0f3f8),
    Color(0xabd9e9),
    Color(0x74add1),
    Color(0x4575b4),
    Color(0x313695),
];

/// Construction parameters of a [`ColorScale`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleProps {
    /// `[min, max]` of the mapped values.
    pub domain: [f64; 2],
    /// Reverse the color list before use.
    pub reverse: bool,
    /// Colors, uniform or with offsets.
    pub list: ColorList,
    /// Legend label at the low end; defaults to the domain minimum.
    pub min_label: Option<String>,
    /// Legend label at the high end; defaults to the domain maximum.
    pub max_label: Option<String>,
}

impl Default for ColorScaleProps {
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            reverse: false,
            list: ColorList::Uniform(RED_YELLOW_BLUE.to_vec()),
            min_label: None,
            max_label: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Continuous,
    Discrete,
}

/// A value → color function over a mutable domain.
#[derive(Debug, Clone)]
pub struct ColorScale {
    mode: Mode,
    /// Colors in evaluation order (sorted by offset when offsets are used).
    colors: Vec<Color>,
    /// Sorted offsets, parallel to `colors`.
    offsets: Option<Vec<f64>>,
    /// List as given (after `reverse`), for the legend.
    list: ColorList,
    min: f64,
    max: f64,
    diff: f64,
    min_label: Option<String>,
    max_label: Option<String>,
}

impl ColorScale {
    /// Interpolating scale.
    pub fn continuous(props: ColorScaleProps) -> Self {
        Self::build(props, Mode::Continuous)
    }

    /// Stepped scale.
    pub fn discrete(props: ColorScaleProps) -> Self {
        Self::build(props, Mode::Discrete)
    }

    fn build(props: ColorScaleProps, mode: Mode) -> Self {
        let list = if props.reverse {
            props.list.reversed()
        } else {
            props.list
        };
        let (colors, offsets) = match &list {
            ColorList::Uniform(colors) => (colors.clone(), None),
            ColorList::Offsets(entries) => {
                let mut sorted = entries.clone();
                sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
                let (colors, offsets): (Vec<Color>, Vec<f64>) =
                    sorted.into_iter().unzip();
                (colors, Some(offsets))
            }
        };
        let mut scale = Self {
            mode,
            colors,
            offsets,
            list,
            min: 0.0,
            max: 0.0,
            diff: 0.0,
            min_label: props.min_label,
            max_label: props.max_label,
        };
        scale.set_domain(props.domain[0], props.domain[1]);
        scale
    }

    /// Change the domain, keeping the colors.
    ///
    /// A zero-width domain maps with width 1.
    pub fn set_domain(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
        let diff = max - min;
        self.diff = if diff == 0.0 { 1.0 } else { diff };
    }

    /// Current `[min, max]`.
    pub fn domain(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// Color of `value`.
    pub fn color(&self, value: f64) -> Color {
        match (self.mode, &self.offsets) {
            (Mode::Continuous, None) => self.uniform_continuous(value),
            (Mode::Discrete, None) => self.uniform_discrete(value),
            (Mode::Continuous, Some(offsets)) => {
                self.offset_color(value, offsets, true)
            }
            (Mode::Discrete, Some(offsets)) => {
                self.offset_color(value, offsets, false)
            }
        }
    }

    /// Write the 8-bit channels of `value`'s color at `offset`.
    pub fn color_to_array(&self, value: f64, array: &mut [f32], offset: usize) {
        self.color(value).to_array(array, offset);
    }

    /// Write the normalized channels of `value`'s color at `offset`.
    pub fn normalized_color_to_array(
        &self,
        value: f64,
        array: &mut [f32],
        offset: usize,
    ) {
        self.color(value).to_array_normalized(array, offset);
    }

    /// Legend for the current domain.
    pub fn legend(&self) -> Legend {
        Legend::Scale(ScaleLegend {
            min_label: self
                .min_label
                .clone()
                .unwrap_or_else(|| self.min.to_string()),
            max_label: self
                .max_label
                .clone()
                .unwrap_or_else(|| self.max.to_string()),
            colors: self.list.clone(),
        })
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`.
    fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / self.diff).clamp(0.0, 1.0)
    }

    fn uniform_continuous(&self, value: f64) -> Color {
        let Some(last) = self.colors.len().checked_sub(1) else {
            return Color::BLACK;
        };
        let n = self.colors.len() as f64;
        let t = (self.normalize(value) * n - 1.0).clamp(0.0, last as f64);
        let lo = t.floor();
        let a = self.colors[lo as usize];
        let b = self.colors[t.ceil() as usize];
        Color::interpolate(a, b, t - lo)
    }

    fn uniform_discrete(&self, value: f64) -> Color {
        let (Some(&first), Some(&last)) =
            (self.colors.first(), self.colors.last())
        else {
            return Color::BLACK;
        };
        if value <= self.min {
            return first;
        }
        if value >= self.max {
            return last;
        }
        let n = self.colors.len();
        let interval = self.diff / n as f64;
        let i = (((value - self.min) / interval).floor() as usize).min(n - 1);
        self.colors[i]
    }

    fn offset_color(
        &self,
        value: f64,
        offsets: &[f64],
        interpolate: bool,
    ) -> Color {
        let (Some(&first), Some(&last)) =
            (self.colors.first(), self.colors.last())
        else {
            return Color::BLACK;
        };
        let t = self.normalize(value);
        let i = offsets.partition_point(|&o| o < t);
        if i == 0 {
            return first;
        }
        if i >= self.colors.len() {
            return last;
        }
        if !interpolate {
            return self.colors[i];
        }
        let (o1, o2) = (offsets[i - 1], offsets[i]);
        let local = ((t - o1) / (o2 - o1)).clamp(0.0, 1.0);
        Color::interpolate(self.colors[i - 1], self.colors[i], local)
    }
}
