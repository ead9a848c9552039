//! Simple SVG line plots with optional error bars.

use std::{ error::Error, path::Path };
use plotters::prelude::*;
use otoc_sim::stats::Series;

/// A single labeled curve.
#[derive(Clone, Debug)]
pub struct Curve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub err: Option<Vec<f64>>,
}

impl Curve {
    pub fn new<S>(label: S, points: Vec<(f64, f64)>) -> Self
    where S: Into<String>
    {
        Self { label: label.into(), points, err: None }
    }

    /// Plot the means of a series with its standard errors as error bars.
    pub fn from_series<S>(label: S, series: &Series) -> Self
    where S: Into<String>
    {
        let points: Vec<(f64, f64)>
            = series.points().map(|(p, m, _)| (p, m)).collect();
        Self {
            label: label.into(),
            points,
            err: Some(series.err().to_vec()),
        }
    }

    /// Like [`Self::from_series`], but without error bars.
    pub fn from_series_means<S>(label: S, series: &Series) -> Self
    where S: Into<String>
    {
        Self::new(label, series.points().map(|(p, m, _)| (p, m)).collect())
    }

    fn bounds(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.points.iter().enumerate()
            .map(|(k, &(x, y))| {
                let e = self.err.as_ref()
                    .and_then(|err| err.get(k).copied())
                    .unwrap_or(0.0);
                (x, y - e, y + e)
            })
            .filter(|(x, lo, hi)| x.is_finite() && lo.is_finite() && hi.is_finite())
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if hi - lo < 1e-12 {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    }
}

/// Draw `curves` on a common set of axes and save the result to `path` as an
/// SVG.
pub fn line_plot<P>(
    path: P,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    curves: &[Curve],
) -> Result<(), Box<dyn Error>>
where P: AsRef<Path>
{
    let (xmin, xmax, ymin, ymax)
        = curves.iter()
        .flat_map(Curve::bounds)
        .fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), (x, lo, hi)| {
                (x0.min(x), x1.max(x), y0.min(lo), y1.max(hi))
            },
        );
    let (x0, x1) = padded(xmin, xmax);
    let (y0, y1) = padded(ymin, ymax);

    let root = SVGBackend::new(path.as_ref(), (960, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(
                LineSeries::new(curve.points.iter().copied(), color.stroke_width(2)))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        if let Some(err) = curve.err.as_ref() {
            chart.draw_series(
                curve.points.iter().zip(err)
                    .map(|(&(x, y), &e)| {
                        ErrorBar::new_vertical(x, y - e, y, y + e, color.filled(), 6)
                    })
            )?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
