use std::io;

use clap::{Parser, ValueEnum};

use common::{ControllerConfig, LoopConfig, LoopOutcome};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Driver {
    Threaded,
    Async,
}

#[derive(Parser)]
#[command(version, about = "Discrete PD controller demo", long_about = None)]
struct Args {
    /// Proportional gain.
    #[arg(long, default_value_t = common::pd::DEFAULT_KP, allow_hyphen_values = true)]
    kp: f64,
    /// Derivative gain.
    #[arg(long, default_value_t = common::pd::DEFAULT_KD, allow_hyphen_values = true)]
    kd: f64,
    /// Lower output bound.
    #[arg(long, allow_hyphen_values = true)]
    u_min: Option<f64>,
    /// Upper output bound.
    #[arg(long, allow_hyphen_values = true)]
    u_max: Option<f64>,
    /// Reference (target) value.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    reference: f64,
    /// Measured value for the single step.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    measured: f64,
    /// Close the loop around a first-order plant instead of a single step.
    #[arg(long, value_enum)]
    simulate: Option<Driver>,
    /// Number of cycles to simulate.
    #[arg(long, default_value_t = 50)]
    cycles: u64,
    /// Cycle period in milliseconds (0 runs unpaced).
    #[arg(long, default_value_t = 0)]
    period_ms: u64,
    /// Write the simulated trace as CSV to stdout.
    #[arg(long)]
    csv: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let controller = ControllerConfig {
        kp: args.kp,
        kd: args.kd,
        u_min: args.u_min,
        u_max: args.u_max,
    };
    log::trace!("{:#?}", controller);

    let driver = match args.simulate {
        Some(driver) => driver,
        None => {
            let mut pd = controller.build();
            let u = pd.step(args.reference, args.measured)?;
            println!("PD test u: {}", u);
            return Ok(());
        }
    };

    let config = LoopConfig {
        cycles: args.cycles,
        period_ms: args.period_ms,
        reference: args.reference,
        initial_measured: args.measured,
        ..LoopConfig::default()
    };

    let outcome: LoopOutcome = match driver {
        Driver::Threaded => threaded_impl::run_closed_loop(controller, config)?,
        Driver::Async => tokio::runtime::Runtime::new()?
            .block_on(async_impl::run_closed_loop(controller, config))?,
    };

    if args.csv {
        outcome.trace.write_csv(io::stdout().lock())?;
    } else {
        println!("{:?} loop: {}", driver, outcome.summary());
    }

    Ok(())
}
