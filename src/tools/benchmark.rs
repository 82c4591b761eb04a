use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use rustseq_sw::{
    align, align_batch, align_parallel,
    config::normalize_count,
    error::{handle_error_and_exit, Result},
    logging::init_verbose,
    mutate::random_sequence,
    system_info::{get_system_info, SystemInfo},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Mode {
    All,
    Sequential,
    Parallel,
    BatchSeq,
    BatchPar,
}

#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Time the sequential, parallel and batch Smith-Waterman engines")]
struct Args {
    /// which engines to time
    #[arg(short, long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// length of every generated sequence
    #[arg(short, long, default_value = "1000")]
    length: usize,

    /// workers for the parallel engines (0 or less = all cores)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    workers: i64,

    /// references per batch
    #[arg(short, long, default_value = "10")]
    batch: usize,

    /// repetitions averaged per mode
    #[arg(short, long, default_value = "3")]
    reps: u32,

    /// seed for sequence generation
    #[arg(long, default_value = "42")]
    seed: u64,

    /// where to write the JSON report
    #[arg(short, long, default_value = "benchmark_results.json")]
    output: String,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[derive(Debug, Serialize, Clone)]
struct ModeResult {
    mode: Mode,
    mean_time_ms: f64,
    mean_score: f64,
    workers: usize,
}

#[derive(Debug, Serialize, Clone)]
struct BenchmarkReport {
    timestamp: DateTime<Utc>,
    run_id: String,
    sequence_length: usize,
    batch_size: usize,
    repetitions: u32,
    seed: u64,
    results: Vec<ModeResult>,
    speedup_single: Option<f64>,
    speedup_batch: Option<f64>,
    completed: bool,
    system_info: SystemInfo,
}

impl BenchmarkReport {
    fn new(args: &Args) -> Self {
        let timestamp = Utc::now();
        Self {
            run_id: format!("run_{}", timestamp.timestamp()),
            timestamp,
            sequence_length: args.length,
            batch_size: args.batch,
            repetitions: args.reps,
            seed: args.seed,
            results: Vec::new(),
            speedup_single: None,
            speedup_batch: None,
            completed: false,
            system_info: get_system_info().clone(),
        }
    }

    fn time_of(&self, mode: Mode) -> Option<f64> {
        self.results.iter().find(|r| r.mode == mode).map(|r| r.mean_time_ms)
    }

    fn finish(&mut self) {
        self.speedup_single = speedup(self.time_of(Mode::Sequential), self.time_of(Mode::Parallel));
        self.speedup_batch = speedup(self.time_of(Mode::BatchSeq), self.time_of(Mode::BatchPar));
        self.completed = true;
    }

    fn save(&self, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)?;
        file.write_all(json.as_bytes())?;
        log::info!("Benchmark report written to {}", filename);
        Ok(())
    }
}

fn speedup(baseline: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (baseline, candidate) {
        (Some(b), Some(c)) if c > 0.0 => Some(b / c),
        _ => None,
    }
}

/// Average wall time and average score over `reps` runs of `op`.
fn time_runs(reps: u32, mut op: impl FnMut() -> f64) -> (Duration, f64) {
    let reps = reps.max(1);
    let mut total = Duration::ZERO;
    let mut score = 0.0;
    for _ in 0..reps {
        let start = Instant::now();
        score += op();
        total += start.elapsed();
    }
    (total / reps, score / f64::from(reps))
}

fn mean_score(results: &[rustseq_sw::AlignmentResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.max_score as f64).sum::<f64>() / results.len() as f64
}

fn run(args: Args) -> Result<()> {
    let modes = match args.mode {
        Mode::All => vec![Mode::Sequential, Mode::Parallel, Mode::BatchSeq, Mode::BatchPar],
        m => vec![m],
    };

    let report = Arc::new(Mutex::new(BenchmarkReport::new(&args)));
    {
        let report = Arc::clone(&report);
        let output = args.output.clone();
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, saving partial results");
            if let Ok(report) = report.lock() {
                if let Err(e) = report.save(&output) {
                    log::error!("{}", e);
                }
            }
            std::process::exit(130);
        })
        .unwrap_or_else(|e| log::warn!("Could not install Ctrl-C handler: {}", e));
    }

    get_system_info().log_info();
    log::info!("Generating test sequences (length: {}, seed: {})", args.length, args.seed);
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let query = random_sequence(&mut rng, args.length);
    let reference = random_sequence(&mut rng, args.length);
    let references: Vec<String> = (0..args.batch)
        .map(|_| random_sequence(&mut rng, args.length))
        .collect();
    let (q, r) = (query.as_bytes(), reference.as_bytes());
    let workers = normalize_count(args.workers);

    for mode in modes {
        println!("\n=== Benchmarking {:?} mode ===", mode);
        let (elapsed, score) = match mode {
            Mode::Sequential => time_runs(args.reps, || align(q, r).max_score as f64),
            Mode::Parallel => time_runs(args.reps, || {
                align_parallel(q, r, workers).max_score as f64
            }),
            Mode::BatchSeq => time_runs(args.reps, || {
                let results: Vec<_> = references.iter().map(|s| align(q, s.as_bytes())).collect();
                mean_score(&results)
            }),
            Mode::BatchPar => time_runs(args.reps, || {
                mean_score(&align_batch(q, &references, workers))
            }),
            Mode::All => unreachable!("expanded above"),
        };
        println!("Mean time: {:.2?}  Score: {:.1}", elapsed, score);

        let mut report = report.lock().unwrap_or_else(|e| e.into_inner());
        report.results.push(ModeResult {
            mode,
            mean_time_ms: elapsed.as_secs_f64() * 1000.0,
            mean_score: score,
            workers,
        });
        report.save(&args.output)?;
    }

    let mut report = report.lock().unwrap_or_else(|e| e.into_inner());
    report.finish();
    report.save(&args.output)?;

    if let Some(s) = report.speedup_single {
        println!("Single alignment speedup (parallel vs sequential): {:.2}x", s);
    }
    if let Some(s) = report.speedup_batch {
        println!("Batch speedup (parallel vs sequential): {:.2}x", s);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_verbose(args.verbosity);
    if let Err(e) = run(args) {
        handle_error_and_exit(e);
    }
}
