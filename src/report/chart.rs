//! Horizontal bar chart of the best ranked courses.
//!
//! The first entry is drawn at the top. Each bar is annotated with its score.

use course_ranking::{RankingEntry, ScoreWeights};
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use std::path::Path;

use crate::report::*;

/// 12 x 7 inches at 150 DPI.
pub const CHART_SIZE: (u32, u32) = (1800, 1050);

const BAR_COLOR: RGBColor = RGBColor(0x2b, 0x6c, 0xb0);

/// Gap between the end of a bar and its annotation, in score units.
const ANNOTATION_OFFSET: f64 = 0.01;

pub fn x_axis_label(weights: &ScoreWeights) -> String {
    format!(
        "Score = ({}*Most + {}*Neutral + {}*Least) / N",
        weights.most, weights.neutral, weights.least
    )
}

/// The vertical slot of the entry at `idx` among `n` entries. Slot 0 is at the bottom.
fn bar_slot(idx: usize, n: usize) -> i32 {
    (n - 1 - idx) as i32
}

/// The number of slots on the y axis, one per entry. A single entry still gets two slots:
/// plotters cannot map a range that holds one value.
fn slot_count(n: usize) -> usize {
    n.max(2)
}

/// The upper edge of the bar in `slot`.
fn bar_top(slot: i32, slots: usize) -> SegmentValue<i32> {
    if slot + 1 >= slots as i32 {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(slot + 1)
    }
}

/// The course drawn in the given slot.
fn slot_label(entries: &[RankingEntry], slot: i32) -> String {
    let n = entries.len() as i32;
    if slot < 0 || slot >= n {
        return String::new();
    }
    entries[(n - 1 - slot) as usize].course.clone()
}

/// Upper bound of the x axis, leaving room for the annotations.
fn x_axis_end(entries: &[RankingEntry]) -> f64 {
    let max = entries
        .iter()
        .map(|e| e.score.value())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.15 + 0.1
    }
}

fn label_area_width(entries: &[RankingEntry]) -> u32 {
    let longest = entries
        .iter()
        .map(|e| e.course.chars().count())
        .max()
        .unwrap_or(0) as u32;
    (longest * 11 + 40).clamp(120, 700)
}

/// Renders the entries, in order, to a PNG file at `path`.
pub fn render_chart(
    path: &Path,
    entries: &[RankingEntry],
    title: &str,
    x_label: &str,
) -> ReportResult<()> {
    debug!("render_chart: {:?}: {} entries", path, entries.len());
    draw_chart(path, entries, title, x_label).map_err(|e| ReportError::Drawing {
        path: display_path(path),
        message: e.to_string(),
    })
}

fn draw_chart(
    path: &Path,
    entries: &[RankingEntry],
    title: &str,
    x_label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = entries.len();
    if n == 0 {
        root.present()?;
        return Ok(());
    }

    // Integer ranges are inclusive.
    let slots = slot_count(n);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 36))
        .margin(30)
        .x_label_area_size(80)
        .y_label_area_size(label_area_width(entries))
        .build_cartesian_2d(
            0.0..x_axis_end(entries),
            (0..slots as i32 - 1).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(slot) => slot_label(entries, *slot),
            _ => String::new(),
        })
        .x_desc(x_label)
        .y_desc("Course")
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 24))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(idx, e)| {
        let slot = bar_slot(idx, n);
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(slot)),
                (e.score.value(), bar_top(slot, slots)),
            ],
            BAR_COLOR.filled(),
        );
        bar.set_margin(8, 8, 0, 0);
        bar
    }))?;

    let annotation_style =
        TextStyle::from(("sans-serif", 20).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(entries.iter().enumerate().map(|(idx, e)| {
        Text::new(
            format!("{:.2}", e.score.value()),
            (
                e.score.value() + ANNOTATION_OFFSET,
                SegmentValue::CenterOf(bar_slot(idx, n)),
            ),
            annotation_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}
