#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]

use open_address::OpenAddressTable;
use plotters::prelude::*;
use rand::Rng;
use std::collections::HashSet;

const TABLE_SIZE: usize = 100_000;
// Fill ratios from 0.1 to 0.95
const NUM_LOAD_FACTORS: usize = 10;
// Absent keys looked up per fill ratio
const MISS_SAMPLES: usize = 10_000;

const SERIES: [&str; 2] = ["Successful lookup", "Unsuccessful lookup"];

#[derive(Debug, Default)]
struct ProbeSummary {
    average: f64,
    worst: usize,
}

fn summarize(lengths: &[usize]) -> ProbeSummary {
    if lengths.is_empty() {
        return ProbeSummary::default();
    }
    ProbeSummary {
        average: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
        worst: lengths.iter().copied().max().unwrap_or(0),
    }
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    x_labels: &[String],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flatten().fold(0.0_f64, |max, &y| max.max(y)) * 1.1;
    let points = x_labels.len();

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..points.saturating_sub(1), 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_labels(points)
        .x_label_formatter(&|x| x_labels.get(*x).cloned().unwrap_or_default())
        .x_desc("Fill ratio")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (values, (&name, color)) in series.iter().zip(SERIES.iter().zip(colors)) {
        let style = ShapeStyle::from(&color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(values.iter().copied().enumerate(), style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        chart.draw_series(
            values.iter().enumerate().map(|(i, &y)| Circle::new((i, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fill_ratios: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();

    let mut rng = rand::rng();
    let mut average = vec![Vec::new(); SERIES.len()];
    let mut worst = vec![Vec::new(); SERIES.len()];

    for &ratio in &fill_ratios {
        let n_keys = (TABLE_SIZE as f64 * ratio) as usize;

        // A load factor of 1 keeps the table at its initial capacity while it fills
        let mut table = OpenAddressTable::new(TABLE_SIZE, 1.0)?;
        let mut keys = HashSet::with_capacity(n_keys);
        while keys.len() < n_keys {
            let key: u64 = rng.random();
            if keys.insert(key) {
                table.put(key, ());
            }
        }

        let hits: Vec<usize> = keys.iter().map(|key| table.probe_length(key)).collect();
        let misses: Vec<usize> = (0..MISS_SAMPLES)
            .map(|_| rng.random::<u64>())
            .filter(|key| !keys.contains(key))
            .map(|key| table.probe_length(&key))
            .collect();

        for (series, lengths) in [hits, misses].iter().enumerate() {
            let summary = summarize(lengths);
            println!(
                "  {:.2} {}: Avg probes = {:.2}, Worst = {}",
                ratio, SERIES[series], summary.average, summary.worst
            );
            average[series].push(summary.average);
            worst[series].push(summary.worst as f64);
        }

        println!(
            "Filled {} of {} slots, capacity {}, resizes {}",
            table.size(),
            TABLE_SIZE,
            table.capacity(),
            table.resize_count()
        );
    }

    let x_labels: Vec<String> = fill_ratios.iter().map(|ratio| format!("{ratio:.2}")).collect();

    draw_chart(
        "average_probe_length.png",
        "Average Probe Length of Linear Probing",
        "Average probes",
        &x_labels,
        &average,
    )?;
    draw_chart(
        "worst_case_probes.png",
        "Worst-Case Probe Length of Linear Probing",
        "Worst-case probes",
        &x_labels,
        &worst,
    )?;

    println!("Generated plot images: average_probe_length.png, worst_case_probes.png");

    Ok(())
}
