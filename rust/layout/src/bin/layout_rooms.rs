// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Detect enclosed rooms in a saved structure record file
//!
//! Usage:
//!   layout-rooms <records.json> [options]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use building_layout::{
    load_records_from_path, AnalysisConfig, FloorReport, LayoutAnalyzer, LayoutReport,
    StructureSummary,
};
use tracing_subscriber::EnvFilter;

struct Options {
    records_path: PathBuf,
    floors: Vec<i32>,
    all_floors: bool,
    config: AnalysisConfig,
    csv_path: Option<PathBuf>,
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let options = parse_args(&args[1..])?;
    run(&options)
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        records_path: PathBuf::from(&args[0]),
        floors: Vec::new(),
        all_floors: false,
        config: AnalysisConfig::from_env(),
        csv_path: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--floor" => options.floors.push(parse_value(args, &mut i, "--floor")?),
            "--all-floors" => options.all_floors = true,
            "--base-z" => options.config.base_z = parse_value(args, &mut i, "--base-z")?,
            "--floor-height" => {
                options.config.floor_height = parse_value(args, &mut i, "--floor-height")?
            }
            "--extend" => options.config.extend = parse_value(args, &mut i, "--extend")?,
            "--precision" => options.config.precision = parse_value(args, &mut i, "--precision")?,
            "--csv" => options.csv_path = Some(parse_value(args, &mut i, "--csv")?),
            "--json" => options.json = true,
            other => bail!("unknown option: {other} (see --help)"),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_value<T>(args: &[String], i: &mut usize, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    *i += 1;
    let raw = args
        .get(*i)
        .with_context(|| format!("{flag} requires a value"))?;
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

fn run(options: &Options) -> Result<()> {
    let set = load_records_from_path(&options.records_path)
        .with_context(|| format!("cannot load records from {}", options.records_path.display()))?;
    let analyzer = LayoutAnalyzer::new(options.config)?;

    let floors = if options.all_floors {
        analyzer.occupied_floors(&set.records)
    } else if options.floors.is_empty() {
        vec![0]
    } else {
        options.floors.clone()
    };

    let report = LayoutReport {
        config: options.config,
        summary: StructureSummary::from_records(&set.records),
        floors: analyzer.analyze_floors(&set.records, &floors)?,
        unplaced: analyzer.unplaced_walls(&set.records),
    };

    if let Some(path) = &options.csv_path {
        report
            .summary
            .write_csv_to_path(path)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Structure counts ===");
    for row in &report.summary.blueprints {
        println!("  {:6}  {}", row.count, row.blueprint);
    }
    if !set.skipped.is_empty() {
        println!();
        println!("  Unreadable records: {}", set.skipped.len());
        for skipped in &set.skipped {
            println!("    #{}: {}", skipped.index, skipped.message);
        }
    }

    if !report.unplaced.is_empty() {
        println!();
        println!("  Walls on no floor: {}", report.unplaced.len());
        for skipped in &report.unplaced {
            println!("    #{}: {}", skipped.index, skipped.message);
        }
    }

    for floor in &report.floors {
        print_floor(floor, &options.config);
    }

    println!();
    println!("Possible roof slots: {}", report.summary.roof_slots());

    if let Some(path) = &options.csv_path {
        println!();
        println!("Summary written to: {}", path.display());
    }

    Ok(())
}

fn print_floor(floor: &FloorReport, config: &AnalysisConfig) {
    println!();
    println!(
        "=== Floor {} (z ≈ {}) ===",
        floor.floor,
        config.base_z + floor.floor as f64 * config.floor_height
    );
    println!(
        "  Walls: {}  nodes: {}  edges: {}  components: {}  open ends: {}",
        floor.wall_count,
        floor.node_count,
        floor.edge_count,
        floor.component_count,
        floor.dangling_count
    );

    if floor.is_empty_floor() && floor.skipped.is_empty() {
        println!("  No walls on this floor");
    }

    println!("  Enclosed rooms: {}", floor.room_count());
    for (i, room) in floor.rooms.iter().enumerate() {
        let vertices: Vec<String> = room.vertices.iter().map(|v| v.to_string()).collect();
        println!(
            "    Room {}: area {:.1}, vertices [{}]",
            i + 1,
            room.area,
            vertices.join(", ")
        );
    }

    if !floor.skipped.is_empty() {
        println!("  Skipped walls: {}", floor.skipped.len());
        for skipped in &floor.skipped {
            println!("    #{} {:?}: {}", skipped.index, skipped.kind, skipped.message);
        }
    }
}

fn print_usage() {
    println!(
        r#"Layout Room Detector
====================

Reads structure records saved by the building system and reports enclosed
rooms per floor, plus per-blueprint structure counts. Records are numbered
(#N) by their position in the input file.

USAGE:
  layout-rooms <records.json> [OPTIONS]

ARGUMENTS:
  <records.json>            Structure record file (JSON array)

OPTIONS:
  --floor <n>               Floor to analyze; repeatable (default: 0)
  --all-floors              Analyze every floor that holds a wall
  --base-z <z>              Ground floor wall elevation (default: 10.0)
  --floor-height <h>        Height of one floor (default: 300.0)
  --extend <d>              Wall half-length along its run (default: 50.0)
  --precision <decimals>    Endpoint quantization decimals (default: 0)
  --csv <path>              Write the Blueprint,Count table to a CSV file
  --json                    Print the full report as JSON
  -h, --help                Show this help message

ENVIRONMENT:
  LAYOUT_BASE_Z, LAYOUT_FLOOR_HEIGHT, LAYOUT_EXTEND, LAYOUT_PRECISION
                            Defaults for the matching options
  RUST_LOG                  Log filter (default: info)
"#
    );
}
