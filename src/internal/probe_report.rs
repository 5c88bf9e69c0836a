#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::too_many_lines)]

//! Fills and drains a `HashTable` with random keys and plots how probe lengths and
//! capacity evolve.

use std::error::Error;

use log::{LevelFilter, info};
use plotters::prelude::*;
use primehash::{DEFAULT_GROW_PERCENT, HashTable};
use rand::{Rng, distr::Alphanumeric};

const STEPS: usize = 25;
const KEYS_PER_STEP: usize = 1_000;
const KEY_LEN: usize = 12;
// Probe lengths are averaged over this many absent keys per sample
const MISS_SAMPLES: usize = 500;

/// Table state after a batch of inserts or deletes.
#[derive(Debug, Clone, Copy)]
struct Sample {
    live_keys: usize,
    avg_hit_probes: f64,
    avg_miss_probes: f64,
    worst_probes: usize,
    capacity: usize,
    load_factor: f64,
}

fn random_key(rng: &mut impl Rng) -> String {
    (0..KEY_LEN).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

fn measure<S: AsRef<str>>(
    table: &HashTable,
    live: impl Iterator<Item = S>,
    misses: &[String],
) -> Sample {
    let mut hits: usize = 0;
    let mut total: usize = 0;
    let mut worst: usize = 0;
    for key in live {
        let probes = table.probe_count(key.as_ref());
        hits += 1;
        total += probes;
        worst = worst.max(probes);
    }
    let miss_total: usize = misses.iter().map(|key| table.probe_count(key)).sum();

    Sample {
        live_keys: table.len(),
        avg_hit_probes: if hits == 0 { 0.0 } else { total as f64 / hits as f64 },
        avg_miss_probes: miss_total as f64 / misses.len().max(1) as f64,
        worst_probes: worst,
        capacity: table.capacity(),
        load_factor: table.load_factor(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init()?;

    let mut rng = rand::rng();
    let keys: Vec<String> = (0..STEPS * KEYS_PER_STEP).map(|_| random_key(&mut rng)).collect();
    // Longer than any generated key, so never present
    let misses: Vec<String> =
        (0..MISS_SAMPLES).map(|i| format!("{}-{i}", random_key(&mut rng))).collect();

    let mut table = HashTable::new();
    let mut samples: Vec<Sample> = Vec::with_capacity(2 * STEPS + 1);
    samples.push(measure(&table, keys.iter().take(0), &misses));

    // Fill phase
    for (step, chunk) in keys.chunks(KEYS_PER_STEP).enumerate() {
        table.extend(chunk.iter().map(|key| (key, key)));
        let inserted = (step + 1) * KEYS_PER_STEP;
        samples.push(measure(&table, keys.iter().take(inserted), &misses));
    }

    // Drain phase
    for (step, chunk) in keys.chunks(KEYS_PER_STEP).enumerate() {
        for key in chunk {
            table.delete(key);
        }
        let deleted = (step + 1) * KEYS_PER_STEP;
        samples.push(measure(&table, keys.iter().skip(deleted), &misses));
    }

    for (i, sample) in samples.iter().enumerate() {
        info!(
            "sample {i:>2}: {} keys, capacity {}, load {:.2}, avg hit {:.2}, avg miss {:.2}, worst {}",
            sample.live_keys,
            sample.capacity,
            sample.load_factor,
            sample.avg_hit_probes,
            sample.avg_miss_probes,
            sample.worst_probes
        );
    }

    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
        RGBColor(50, 180, 50), // Bright green
    ];
    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;
    let last = samples.len() - 1;

    // Plot 1: probe lengths over the fill and drain phases
    let root = BitMapBackend::new("probe_length.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_probes = samples
        .iter()
        .map(|s| s.avg_hit_probes.max(s.avg_miss_probes).max(s.worst_probes as f64))
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Probe Length While Filling and Draining", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..last, 0.0..max_probes)?;

    chart
        .configure_mesh()
        .x_labels(samples.len().min(26))
        .x_label_formatter(&|x| samples.get(*x).map_or(String::new(), |s| s.live_keys.to_string()))
        .x_desc("Live Keys")
        .y_desc("Slots Inspected")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Vertical line where the fill phase turns into the drain phase
    let turn_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(vec![(STEPS, 0.0), (STEPS, max_probes)], turn_style))?
        .label("Fill / drain boundary")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], turn_style));

    let series: [(&str, fn(&Sample) -> f64); 3] = [
        ("Average hit", |s| s.avg_hit_probes),
        ("Average miss", |s| s.avg_miss_probes),
        ("Worst hit", |s| s.worst_probes as f64),
    ];
    for (idx, (label, value)) in series.iter().enumerate() {
        let color = &colors[idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                samples.iter().enumerate().map(|(i, s)| (i, value(s))),
                line_style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            samples
                .iter()
                .enumerate()
                .map(|(i, s)| Circle::new((i, value(s)), marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: capacity and load factor, split vertically
    let root = BitMapBackend::new("capacity_growth.png", (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let max_capacity = samples.iter().map(|s| s.capacity).max().unwrap_or(1) as f64 * 1.1;

    let mut capacity_chart = ChartBuilder::on(&areas[0])
        .caption("Capacity (prime number of slots)", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..last, 0.0..max_capacity)?;

    capacity_chart
        .configure_mesh()
        .x_labels(samples.len().min(26))
        .x_label_formatter(&|x| samples.get(*x).map_or(String::new(), |s| s.live_keys.to_string()))
        .x_desc("Live Keys")
        .y_desc("Slots")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let capacity_style = ShapeStyle::from(&colors[1]).stroke_width(line_width);
    capacity_chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, s)| (i, s.capacity as f64)),
            capacity_style,
        ))?
        .label("Capacity")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], capacity_style));

    capacity_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    let mut load_chart = ChartBuilder::on(&areas[1])
        .caption("Load Factor", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..last, 0.0..1.0)?;

    load_chart
        .configure_mesh()
        .x_labels(samples.len().min(26))
        .x_label_formatter(&|x| samples.get(*x).map_or(String::new(), |s| s.live_keys.to_string()))
        .x_desc("Live Keys")
        .y_desc("Occupied / Capacity")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let threshold = DEFAULT_GROW_PERCENT as f64 / 100.0;
    let threshold_style = ShapeStyle::from(&RED.mix(0.3)).stroke_width(1);
    load_chart
        .draw_series(LineSeries::new(vec![(0, threshold), (last, threshold)], threshold_style))?
        .label("Grow threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

    let load_style = ShapeStyle::from(&colors[2]).stroke_width(line_width);
    load_chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, s)| (i, s.load_factor)),
            load_style,
        ))?
        .label("Load factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], load_style));
    load_chart.draw_series(
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| Circle::new((i, s.load_factor), marker_size, colors[2].filled())),
    )?;

    load_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    info!("Generated plot images: probe_length.png, capacity_growth.png");

    Ok(())
}
