//! PNG drawing of chart models

use std::{iter, path::Path};

use plotters::{prelude::*, series::DashedLineSeries};
use survchart_analysis::chart::{ChartSpec, MEDIAN_LEVEL};

/// Default matplotlib color cycle
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Image height that sizes are expressed against.
const REFERENCE_HEIGHT: f64 = 480.0;

const BAND_OPACITY: f64 = 0.5;

/// Converts sizes given for a 480 px high image to the actual image.
#[derive(Debug, Clone, Copy)]
struct Scale(f64);

impl Scale {
    fn for_height(height: u32) -> Self {
        Self(f64::from(height) / REFERENCE_HEIGHT)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn px(self, size: f64) -> u32 {
        (size * self.0).round().max(1.0) as u32
    }

    fn font(self, size: f64) -> FontDesc<'static> {
        ("sans-serif", size * self.0).into_font()
    }
}

/// Draws a chart and saves it as an image at `path`.
///
/// The drawing backend is dropped, and the file released, before returning.
pub(crate) fn draw_chart(chart: &ChartSpec, path: &Path, size: (u32, u32)) -> anyhow::Result<()> {
    let scale = Scale::for_height(size.1);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, scale.font(14.0))
        .margin(scale.px(12.0))
        .x_label_area_size(scale.px(40.0))
        .y_label_area_size(scale.px(50.0))
        .build_cartesian_2d(
            chart.x_axis.min..chart.x_axis.max,
            chart.y_axis.min..chart.y_axis.max,
        )?;

    let y_formatter = |y: &f64| format!("{y:.1}");
    {
        let mut mesh = ctx.configure_mesh();
        mesh.x_desc(&chart.x_axis.label)
            .y_desc(&chart.y_axis.label)
            .label_style(scale.font(10.0))
            .axis_desc_style(scale.font(11.0))
            .light_line_style(TRANSPARENT)
            .y_label_formatter(&y_formatter);
        if let Some(step) = chart.y_axis.tick_step {
            mesh.y_labels(tick_count(chart.y_axis.min, chart.y_axis.max, step));
        }
        mesh.draw()?;
    }

    for (series, &color) in chart.series.iter().zip(PALETTE.iter().cycle()) {
        let band = series
            .points
            .iter()
            .map(|p| (f64::from(p.time), p.upper.min(chart.y_axis.max)))
            .chain(
                series
                    .points
                    .iter()
                    .rev()
                    .map(|p| (f64::from(p.time), p.lower.max(chart.y_axis.min))),
            )
            .collect::<Vec<_>>();
        ctx.draw_series(iter::once(Polygon::new(
            band,
            color.mix(BAND_OPACITY).filled(),
        )))?;

        let line_width = scale.px(2.0);
        ctx.draw_series(LineSeries::new(
            series.points.iter().map(|p| (f64::from(p.time), p.survival)),
            color.stroke_width(line_width),
        ))?
        .label(&series.label)
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(line_width))
        });

        if let Some(crosshair) = &series.crosshair {
            let time = f64::from(crosshair.time);
            let style = BLACK.stroke_width(scale.px(0.8));
            let (dash, gap) = (scale.px(4.0), scale.px(2.0));
            ctx.draw_series(DashedLineSeries::new(
                vec![(chart.x_axis.min, MEDIAN_LEVEL), (time, MEDIAN_LEVEL)],
                dash,
                gap,
                style,
            ))?;
            ctx.draw_series(DashedLineSeries::new(
                vec![(time, chart.y_axis.min), (time, MEDIAN_LEVEL)],
                dash,
                gap,
                style,
            ))?;
        }
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(scale.font(10.0))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Number of ticks from `min` to `max` inclusive, `step` apart.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tick_count(min: f64, max: f64, step: f64) -> usize {
    ((max - min) / step).round().max(0.0) as usize + 1
}
