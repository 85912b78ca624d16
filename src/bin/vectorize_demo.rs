use chart_vectorizer::config::load_config;
use chart_vectorizer::pipeline::ChartVectorizer;
use chart_vectorizer::raster::io::{load_color_image, write_json_file, ColorImageU32};
use chart_vectorizer::raster::{BorderMask, LabelImage};
use chart_vectorizer::shapes::{Rectangle, RegionSet};
use chart_vectorizer::trace::TraceStats;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let colors = load_color_image(&config.input)?;
    let raster = label_components(&colors);
    let border = BorderMask::of_regions(&raster);
    let mut regions = RegionSet::collect(&raster, Some(colors.pixels()));

    let vectorizer = ChartVectorizer::new(config.pipeline);
    let report = vectorizer.process(&raster, &border, &mut regions);

    let result = DemoOutput {
        width: colors.width(),
        height: colors.height(),
        region_count: regions.len(),
        primitive_count: regions.iter().map(|r| r.prim_count()).sum(),
        rectangle_count: report.rectangles.len(),
        trace: report.trace,
        latency_ms: report.latency_ms,
        rectangles: report.rectangles,
    };
    write_json_file(&config.output.shapes_json, &result)?;

    println!(
        "Saved {} rectangles from {} regions to {}",
        result.rectangle_count,
        result.region_count,
        config.output.shapes_json.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: vectorize_demo <config.json>".to_string()
}

/// Label 4-connected same-color components. The most frequent color is taken
/// as the chart background and stays unlabeled.
fn label_components(colors: &ColorImageU32) -> LabelImage {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &c in colors.pixels() {
        *counts.entry(c).or_default() += 1;
    }
    let background_color = counts
        .into_iter()
        .max_by_key(|&(_, n)| n)
        .map(|(c, _)| c)
        .unwrap_or(0);

    let width = colors.width();
    let height = colors.height();
    let mut raster = LabelImage::new(width, height, 0);
    let mut next_label = 1;
    for row in 0..height {
        for col in 0..width {
            if colors.pixel(row, col) == background_color
                || raster.labels[row * width + col] != 0
            {
                continue;
            }
            let color = colors.pixel(row, col);
            let label = next_label;
            next_label += 1;
            raster.set_label(row as i32, col as i32, label);
            let mut stack = vec![(row, col)];
            while let Some((r, c)) = stack.pop() {
                let mut visit = |nr: usize, nc: usize| {
                    if colors.pixel(nr, nc) == color && raster.labels[nr * width + nc] == 0 {
                        raster.set_label(nr as i32, nc as i32, label);
                        stack.push((nr, nc));
                    }
                };
                if r > 0 {
                    visit(r - 1, c);
                }
                if r + 1 < height {
                    visit(r + 1, c);
                }
                if c > 0 {
                    visit(r, c - 1);
                }
                if c + 1 < width {
                    visit(r, c + 1);
                }
            }
        }
    }
    raster
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoOutput {
    width: usize,
    height: usize,
    region_count: usize,
    primitive_count: usize,
    rectangle_count: usize,
    trace: TraceStats,
    latency_ms: f64,
    rectangles: Vec<Rectangle>,
}
