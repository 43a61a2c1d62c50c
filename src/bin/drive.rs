use clap::Parser;
use drive_mdp::mdp::{solve, write_report, SolverConfig};
use log::{info, LevelFilter};

/// Value iteration and policy convergence for the drive / don't-drive MDP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of steps in the fixed-horizon rollout
    #[arg(long, default_value_t = 59)]
    horizon: usize,

    /// Discount factor for the rollout and the fixed-point solve
    #[arg(long, default_value_t = 0.8)]
    discount: f64,

    /// Discount factor for the policy convergence loop
    #[arg(long, default_value_t = 1.0)]
    convergence_discount: f64,

    /// Iteration budget for the convergence loop and the fixed-point solve
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,

    /// Value-change threshold for the fixed-point solve
    #[arg(long, default_value_t = 1e-9)]
    tolerance: f64,

    /// Log level for stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl From<&Args> for SolverConfig {
    fn from(args: &Args) -> Self {
        Self {
            horizon: args.horizon,
            discount: args.discount,
            convergence_discount: args.convergence_discount,
            max_iterations: args.max_iterations,
            tolerance: args.tolerance,
        }
    }
}

/// Logs to stderr only; stdout carries the report.
fn log(level: LevelFilter) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    if let Err(e) = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("logging disabled: {}", e);
    }
}

fn main() -> drive_mdp::Result<()> {
    let args = Args::parse();
    log(args.log_level);

    let config = SolverConfig::from(&args);
    let analysis = drive_mdp::analyze(&config)?;

    let solution = solve(&config.model()?, &config);
    info!(
        "fixed point after {} iterations (delta {:e}): values {:?}, policy {:?}",
        solution.iterations, solution.delta, solution.values, solution.policy
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &analysis.rollout, &analysis.policy_run)
}
