use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info};

use crate::process::record::GroupedSeries;

/// Draw one line per group (cumulative total against date) into an SVG.
/// Legend labels read `"<Candidate> <STATE>"`.
pub fn draw_chart(path: impl AsRef<Path>, series: &GroupedSeries, size: (u32, u32)) -> Result<()> {
    let path = path.as_ref();
    info!("building graph");

    let (x_range, y_range) = bounds(series);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative receipts", ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(RangedDateTime::from(x_range), y_range)?;

    chart
        .configure_mesh()
        .x_desc("date")
        .y_desc("total")
        .x_label_formatter(&|d: &NaiveDateTime| d.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .draw()?;

    for (idx, (key, points)) in series.iter().enumerate() {
        if points.is_empty() {
            debug!(group = %key, "no points to draw");
            continue;
        }
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.date, p.total)),
                color.stroke_width(2),
            ))?
            .label(key.series_label())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("writing chart {:?}", path))?;
    Ok(())
}

/// Axis ranges covering every point. Degenerate spans are widened so the
/// chart always has a drawable area.
fn bounds(
    series: &GroupedSeries,
) -> (std::ops::Range<NaiveDateTime>, std::ops::Range<f64>) {
    let mut points = series.values().flatten();
    let Some(first) = points.next() else {
        let start = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        return (start..start + Duration::days(1), 0.0..1.0);
    };

    let (mut x_min, mut x_max) = (first.date, first.date);
    let (mut y_min, mut y_max) = (first.total.min(0.0), first.total.max(0.0));
    for p in points {
        x_min = x_min.min(p.date);
        x_max = x_max.max(p.date);
        y_min = y_min.min(p.total);
        y_max = y_max.max(p.total);
    }
    if x_min == x_max {
        x_max = x_min + Duration::days(1);
    }
    if y_min == y_max {
        y_max = y_min + 1.0;
    }
    (x_min..x_max, y_min..y_max * 1.05)
}
