//! Benchmarks for the PD controller and the demo loop drivers.

use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use criterion::{black_box, Criterion};

use common::{ControllerConfig, CycleRecord, LoopConfig, PdController};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Threaded,
    Async,
    Both,
}

#[derive(Parser)]
#[command(version, about = "PD controller benchmarks", long_about = None)]
struct Args {
    /// Which loop driver to run.
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,
    /// Cycles per closed-loop run.
    #[arg(long, default_value_t = 10_000)]
    cycles: u64,
    /// Run criterion micro-benchmarks of the controller itself.
    #[arg(long)]
    criterion: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn analyze_trace(results: &[CycleRecord], name: &str, elapsed: Duration) {
    if results.is_empty() {
        println!("{}: No results to analyze", name);
        return;
    }

    let total = results.len();
    let saturated = results.iter().filter(|r| r.saturated).count();
    let max_abs_output = results
        .iter()
        .fold(0.0_f64, |acc, r| acc.max(r.output.abs()));
    let settled_at = results
        .iter()
        .position(|r| (r.reference - r.measured).abs() < 1e-3);

    println!("\n=== {} Analysis ===", name);
    println!("Total cycles: {}", total);
    println!(
        "Throughput: {:.0} cycles/sec",
        total as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("Saturated outputs: {} ({:.2}%)", saturated, saturated as f64 / total as f64 * 100.0);
    println!("Max |u|: {:.4}", max_abs_output);
    match settled_at {
        Some(cycle) => println!("Settled within 1e-3 at cycle {}", cycle),
        None => println!("Did not settle within 1e-3"),
    }
}

fn benchmark_controller(c: &mut Criterion) {
    c.bench_function("pd_compute", |b| {
        let mut pd = PdController::default();
        let mut e = 1.0;
        b.iter(|| {
            e = -e;
            black_box(pd.compute(black_box(e), None).ok());
        });
    });

    c.bench_function("pd_step_clamped", |b| {
        let mut pd = PdController::new(10.0, 0.5, Some(-1.0), Some(1.0));
        b.iter(|| black_box(pd.step(black_box(1.0), black_box(0.25)).ok()));
    });
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let controller = ControllerConfig::default();
    let config = LoopConfig {
        cycles: args.cycles,
        ..LoopConfig::default()
    };

    println!("========================================");
    println!("PD Controller Benchmark");
    println!("========================================");
    println!("Gains: kp={}, kd={}", controller.kp, controller.kd);
    println!("Cycles: {}", config.cycles);
    println!("Mode: {:?}", args.mode);
    println!("========================================");

    if args.criterion {
        let mut criterion = Criterion::default()
            .sample_size(50)
            .measurement_time(Duration::from_secs(5));
        benchmark_controller(&mut criterion);
        criterion.final_summary();
    }

    if args.mode == Mode::Threaded || args.mode == Mode::Both {
        let start = Instant::now();
        let outcome = threaded_impl::run_closed_loop(controller, config.clone())?;
        analyze_trace(&outcome.trace.get_results(), "THREADED", start.elapsed());
    }

    if args.mode == Mode::Async || args.mode == Mode::Both {
        let runtime = tokio::runtime::Runtime::new()?;
        let start = Instant::now();
        let outcome = runtime.block_on(async_impl::run_closed_loop(controller, config))?;
        analyze_trace(&outcome.trace.get_results(), "ASYNC", start.elapsed());
    }

    println!("\n========================================");
    println!("Benchmark complete!");
    println!("========================================");

    Ok(())
}
