use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use maxsat_model::cnf::dimacs::read_dimacs_file;
use maxsat_model::model::config::{ModelConfiguration, load_model, to_model_json};
use maxsat_model::model::{Counter, CounterWidth, MaxSat, MaxSat32, StateModel};
use maxsat_model::rng::trajectory_rng;

#[derive(Debug, Parser)]
#[command(name = "maxsat")]
#[command(about = "Weighted MAX-SAT model: statistics, evaluation and random states")]
struct Cli {
    /// Counter width in bits (8, 16 or 32); picked from the widest clause if omitted.
    #[arg(long, global = true)]
    counter: Option<u32>,
    /// Log configuration details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Clone, Subcommand)]
enum Cmd {
    Profile {
        path: String,
    },
    Eval {
        path: String,
        /// One 0/1 character per simulated variable, in ascending name order.
        #[arg(long)]
        assign: String,
    },
    Random {
        path: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        count: u64,
    },
    /// Rewrites a .cnf/.wcnf instance as a JSON model document.
    Convert {
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let path = match &cli.command {
        Cmd::Convert { path } => return convert_cmd(path),
        Cmd::Profile { path } | Cmd::Eval { path, .. } | Cmd::Random { path, .. } => path,
    };
    let model: MaxSat32 =
        load_model(path).with_context(|| format!("failed to load model from {path}"))?;

    let width = match cli.counter {
        Some(bits) => CounterWidth::from_bits(bits)
            .ok_or_else(|| anyhow::anyhow!("unsupported counter width {bits}, expected 8|16|32"))?,
        None => CounterWidth::for_max_vars_in_clause(model.max_vars_in_clause()),
    };
    info!(bits = width.bits(), "selected counter width");
    match width {
        CounterWidth::U8 => run(model.into_counter::<u8>()?, &cli.command),
        CounterWidth::U16 => run(model.into_counter::<u16>()?, &cli.command),
        CounterWidth::U32 => run(model, &cli.command),
    }
}

fn convert_cmd(path: &str) -> Result<()> {
    let cnf = read_dimacs_file(path).with_context(|| format!("failed to read {path}"))?;
    let cfg = ModelConfiguration::from_clauses(&cnf.clauses)?;
    println!("{}", to_model_json(&cfg)?);
    Ok(())
}

fn run<C: Counter>(model: MaxSat<C>, cmd: &Cmd) -> Result<()> {
    match cmd {
        Cmd::Profile { .. } => profile_cmd(&model),
        Cmd::Eval { assign, .. } => eval_cmd(&model, assign),
        Cmd::Random { seed, count, .. } => random_cmd(&model, *seed, *count),
        Cmd::Convert { path } => convert_cmd(path),
    }
}

fn profile_cmd<C: Counter>(model: &MaxSat<C>) -> Result<()> {
    println!("PROFILE");
    println!("model={} version={}", model.identifier(), model.version());
    println!(
        "vars={} free_vars={} clauses={} empty={}",
        model.num_vars(),
        model.free_variables().len(),
        model.term_count(),
        model.is_empty()
    );
    println!(
        "max_weight={} max_vars_in_clause={}",
        model.max_weight(),
        model.max_vars_in_clause()
    );
    println!(
        "state_bytes={} state_only_bytes={}",
        model.state_memory_estimate(),
        model.state_only_memory_estimate()
    );
    println!(
        "max_cost_diff={} min_cost_diff={}",
        model.estimate_max_cost_diff(),
        model.estimate_min_cost_diff()
    );
    Ok(())
}

fn eval_cmd<C: Counter>(model: &MaxSat<C>, assign: &str) -> Result<()> {
    let bits = assign
        .chars()
        .map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(anyhow::anyhow!("invalid assignment character '{ch}', expected 0|1")),
        })
        .collect::<Result<Vec<_>>>()?;
    let state = model.create_state_from(&bits)?;
    println!("cost={}", model.cost(&state));
    println!("{}", serde_json::to_string(&model.render_state(&state)?)?);
    Ok(())
}

fn random_cmd<C: Counter>(model: &MaxSat<C>, seed: u64, count: u64) -> Result<()> {
    for i in 0..count {
        let mut rng = trajectory_rng(seed, i);
        let state = model.random_state(&mut rng)?;
        println!(
            "RANDOM {}: cost={} {}",
            i,
            model.cost(&state),
            serde_json::to_string(&model.render_state(&state)?)?
        );
    }
    Ok(())
}
