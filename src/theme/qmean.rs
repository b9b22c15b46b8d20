//! QMEAN local score coloring, orange (poor) to blue (good).

use std::sync::Arc;

use super::{
    location_score, ColorTheme, ThemeContext, ThemeParams, NO_DATA_COLOR,
};
use crate::color::legend::Legend;
use crate::color::scale::{ColorList, ColorScale, ColorScaleProps};
use crate::color::Color;
use crate::model::Location;
use crate::quality::{MetricKind, QualityAssessmentProvider};

/// Colors residues by QMEAN score on a `[0, 1]` gradient.
pub struct QmeanScoreTheme {
    provider: Arc<QualityAssessmentProvider>,
    metric_id: Option<i32>,
    scale: ColorScale,
}

impl QmeanScoreTheme {
    /// Registry id.
    pub const NAME: &'static str = "qmean-score";
    /// Display label.
    pub const LABEL: &'static str = "QMEAN Score";

    /// Theme for `ctx`.
    pub fn new(ctx: &ThemeContext<'_>, params: ThemeParams) -> Self {
        let scale = ColorScale::continuous(ColorScaleProps {
            domain: [0.0, 1.0],
            list: ColorList::Offsets(vec![
                (Color(0xff5000), 0.5),
                (Color(0x025afd), 1.0),
            ]),
            ..Default::default()
        });
        Self {
            provider: Arc::clone(&ctx.provider),
            metric_id: params
                .metric_id
                .or_else(|| ctx.default_metric_id(MetricKind::Qmean)),
            scale,
        }
    }

    /// Metric this theme colors by, if any was available.
    pub fn metric_id(&self) -> Option<i32> {
        self.metric_id
    }
}

impl ColorTheme for QmeanScoreTheme {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn color(&self, location: &Location<'_>) -> Color {
        location_score(
            &self.provider,
            location,
            self.metric_id,
            MetricKind::Qmean,
        )
        .map_or(NO_DATA_COLOR, |score| self.scale.color(score))
    }

    fn legend(&self) -> Legend {
        self.scale.legend()
    }

    fn description(&self) -> &'static str {
        "Assigns residue colors according to the QMEAN score."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use crate::testing::{metric_frame, MockModel};

    fn qmean_model(values: &[f64]) -> MockModel {
        let rows: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (5, "A", i as i32 + 1, 1, v))
            .collect();
        let frame = metric_frame(
            &[
                (2, "pLDDT", "pLDDT", "local"),
                (5, "QMEANDisCo", "normalized score", "local"),
            ],
            &rows,
        );
        MockModel::single_chain(1, values.len()).with_source(frame)
    }

    #[test]
    fn gradient_above_half() {
        let model = qmean_model(&[0.2, 0.5, 0.75, 1.0]);
        let ctx = ThemeContext::new(
            Arc::new(QualityAssessmentProvider::new()),
            vec![&model],
        );
        let theme = QmeanScoreTheme::new(&ctx, ThemeParams::default());
        assert_eq!(theme.metric_id(), Some(5));
        let unit = Unit::atomic(0, &model, model.all_atoms());
        let color = |element| {
            theme.color(&Location::Element {
                unit: &unit,
                element,
            })
        };
        assert_eq!(color(0), Color(0xff5000));
        assert_eq!(color(2), Color(0xff5000));
        assert_eq!(
            color(4),
            Color::interpolate(Color(0xff5000), Color(0x025afd), 0.5)
        );
        assert_eq!(color(6), Color(0x025afd));
    }

    #[test]
    fn bond_uses_first_atom() {
        let model = qmean_model(&[0.2, 1.0]);
        let ctx = ThemeContext::new(
            Arc::new(QualityAssessmentProvider::new()),
            vec![&model],
        );
        let theme = QmeanScoreTheme::new(&ctx, ThemeParams::default());
        let unit = Unit::atomic(0, &model, model.all_atoms());
        let bond = Location::Bond {
            a_unit: &unit,
            a_index: 3,
            b_unit: &unit,
            b_index: 0,
        };
        assert_eq!(theme.color(&bond), Color(0x025afd));
    }

    #[test]
    fn unknown_metric_id_falls_back_to_default() {
        let model = qmean_model(&[1.0]);
        let ctx = ThemeContext::new(
            Arc::new(QualityAssessmentProvider::new()),
            vec![&model],
        );
        let theme = QmeanScoreTheme::new(
            &ctx,
            ThemeParams {
                metric_id: Some(99),
            },
        );
        let unit = Unit::atomic(0, &model, model.all_atoms());
        let atom = Location::Element {
            unit: &unit,
            element: 0,
        };
        assert_eq!(theme.color(&atom), Color(0x025afd));
    }

    #[test]
    fn legend_is_scale() {
        let model = qmean_model(&[0.5]);
        let ctx = ThemeContext::new(
            Arc::new(QualityAssessmentProvider::new()),
            vec![&model],
        );
        let theme = QmeanScoreTheme::new(&ctx, ThemeParams::default());
        let Legend::Scale(legend) = theme.legend() else {
            panic!("expected scale legend");
        };
        assert_eq!(legend.min_label, "0");
        assert_eq!(legend.max_label, "1");
    }
}
