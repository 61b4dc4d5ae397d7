mod config;

use anyhow::Context;
use hdrhistogram::Histogram;
use monotime::{TickUnit, Timer};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct Stats {
    min: u64,
    p50: u64,
    p95: u64,
    p99: u64,
    max: u64,
    mean: f64,
}

impl Stats {
    fn from_histogram(hist: &Histogram<u64>) -> Self {
        Self {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    clock_source: &'static str,
    tick_unit: TickUnit,
    call_overhead_ns: Stats,
    busy_wait_target_ms: u64,
    busy_wait_ns: Stats,
    busy_wait_out_of_tolerance: usize,
    sleep_target_ms: u64,
    sleep_measured_ns: f64,
}

fn new_histogram() -> anyhow::Result<Histogram<u64>> {
    // Up to 10s
    Histogram::<u64>::new_with_bounds(1, 10_000_000_000, 3).context("Failed to create histogram")
}

fn bench_overhead(timer: &Timer, iterations: usize) -> anyhow::Result<Histogram<u64>> {
    let mut hist = new_histogram()?;

    println!("Running now() Overhead Benchmark ({} iterations)...", iterations);

    for _ in 0..iterations {
        let t0 = timer.now();
        let t1 = timer.now();
        hist.saturating_record(timer.elapsed_nanos(t0, t1));
    }
    Ok(hist)
}

fn busy_wait(target: Duration) {
    let start = Instant::now();
    while start.elapsed() < target {
        std::hint::spin_loop();
    }
}

fn bench_busy_wait(
    timer: &Timer,
    target_ms: u64,
    trials: usize,
    tolerance: f64,
) -> anyhow::Result<(Histogram<u64>, usize)> {
    let mut hist = new_histogram()?;
    let target = Duration::from_millis(target_ms);
    let mut misses = 0;

    println!("Running Busy-Wait Accuracy Benchmark ({} trials of {}ms)...", trials, target_ms);

    for trial in 0..trials {
        let wall_start = Instant::now();
        let t0 = timer.now();
        busy_wait(target);
        let t1 = timer.now();
        let wall = wall_start.elapsed().as_nanos() as f64;

        let measured = timer.elapsed_nanos(t0, t1);
        hist.saturating_record(measured);

        let error = (measured as f64 - wall).abs() / wall;
        if error > tolerance {
            misses += 1;
            tracing::warn!(trial, measured_ns = measured, wall_ns = wall, error, "busy-wait out of tolerance");
        }
    }
    Ok((hist, misses))
}

fn print_stats(name: &str, stats: &Stats) {
    println!("\n--- {} Results (ns) ---", name);
    println!("Min:    {}", stats.min);
    println!("p50:    {}", stats.p50);
    println!("p95:    {}", stats.p95);
    println!("p99:    {}", stats.p99);
    println!("Max:    {}", stats.max);
    println!("Mean:   {:.2}", stats.mean);
}

fn pin_to_last_core() {
    if let Some(core_ids) = core_affinity::get_core_ids() {
        if let Some(core_id) = core_ids.last() {
            if core_affinity::set_for_current(*core_id) {
                tracing::info!("Benchmark thread pinned to core {:?}", core_id);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bench.toml"));
    let config = config::load(&config_path)?;
    let settings = &config.bench;

    let _guard = telemetry::init(&config.telemetry).context("Failed to initialize telemetry")?;

    let timer = match monotime::init() {
        Ok(timer) => timer,
        Err(e) => {
            tracing::error!(error = %e, "Monotonic clock unusable - measurement disabled");
            return Err(e.into());
        }
    };
    println!("Clock source: {} (unit {:?})", timer.clock_source(), timer.tick_unit());

    if settings.pin_core {
        pin_to_last_core();
    }

    let overhead = Stats::from_histogram(&bench_overhead(&timer, settings.iterations)?);
    print_stats("now() Call Overhead", &overhead);

    let (busy_hist, misses) =
        bench_busy_wait(&timer, settings.busy_wait_ms, settings.trials, settings.tolerance)?;
    let busy = Stats::from_histogram(&busy_hist);
    print_stats("Busy-Wait Measurement", &busy);
    println!("Out of tolerance: {}/{}", misses, settings.trials);

    let t0 = timer.now();
    std::thread::sleep(Duration::from_millis(settings.sleep_ms));
    let t1 = timer.now();
    let sleep_ns = timer.tick_unit().ticks_to_nanos(t1 - t0);
    println!("\nSleep {}ms measured as {:.3}ms", settings.sleep_ms, sleep_ns / 1e6);

    let report = Report {
        clock_source: timer.clock_source(),
        tick_unit: timer.tick_unit(),
        call_overhead_ns: overhead,
        busy_wait_target_ms: settings.busy_wait_ms,
        busy_wait_ns: busy,
        busy_wait_out_of_tolerance: misses,
        sleep_target_ms: settings.sleep_ms,
        sleep_measured_ns: sleep_ns,
    };

    if let Some(path) = &settings.report_path {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(path = %path.display(), "Report written");
    }

    if misses > 0 {
        anyhow::bail!("{} of {} busy-wait trials outside ±{:.0}%", misses, settings.trials, settings.tolerance * 100.0);
    }

    Ok(())
}
