use guide_detector::image::io::write_json_file;
use guide_detector::pipeline::{FrameReport, GuideDetector};
use guide_detector::runner::TickRunner;
use guide_detector::source::{FrameSource, StillImageSource};
use guide_detector::tracker::TrackerOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Parameter file re-read on every tick; missing file means defaults.
    #[serde(default = "default_params_path")]
    pub params: PathBuf,
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub dual_hough: bool,
    pub report_json: Option<PathBuf>,
}

fn default_params_path() -> PathBuf {
    PathBuf::from("params.json")
}

fn default_ticks() -> usize {
    30
}

fn default_interval_ms() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let source = StillImageSource::open(&config.input)?;
    let region = source.region();
    let detector = GuideDetector::new(TrackerOptions::default(), config.dual_hough);
    let mut runner = TickRunner::new(source, detector, config.params.clone())
        .with_interval(Duration::from_millis(config.interval_ms));

    let reports = runner.run_ticks(config.ticks.max(1));
    let last = reports.last().ok_or("No ticks were run")?;
    print_text_summary(last, &reports);

    if let Some(path) = &config.report_json {
        let summary = RunSummary {
            input: config.input.clone(),
            width: region.width,
            height: region.height,
            ticks: reports.len(),
            interval_ms: config.interval_ms,
            reports,
        };
        write_json_file(path, &summary)?;
        println!("\nJSON report written to {}", path.display());
    }

    Ok(())
}

fn print_text_summary(last: &FrameReport, reports: &[FrameReport]) {
    let skipped = reports.iter().filter(|r| r.skipped).count();
    let mean_latency =
        reports.iter().map(|r| r.latency_ms).sum::<f64>() / reports.len().max(1) as f64;

    println!("Run summary");
    println!("  ticks: {} (skipped: {skipped})", reports.len());
    println!("  mean latency_ms: {mean_latency:.3}");
    println!("\nLast tick");
    println!("  candidates: {}", last.candidate_count);
    println!("  edge points: {}", last.point_count);
    println!("  verified: {}", last.verified_count);
    println!(
        "  timings (ms): features={:.3} verify={:.3} total={:.3}",
        last.features_ms, last.verify_ms, last.latency_ms
    );
    for guide in &last.guides {
        let (a, b) = guide.endpoints;
        println!(
            "  guide: ({}, {}) -> ({}, {}) confidence={} extended={}",
            a[0], a[1], b[0], b[1], guide.confidence, guide.extended
        );
    }
    if last.guides.is_empty() {
        println!("  guide: none");
    }
}

fn usage() -> String {
    "Usage: guide_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    input: PathBuf,
    width: i32,
    height: i32,
    ticks: usize,
    interval_ms: u64,
    reports: Vec<FrameReport>,
}
