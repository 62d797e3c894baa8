//! FCC Ball Puzzle Solver
//!
//! Command-line front-end: solves FCC containers with a chosen engine,
//! writing a JSONL event log and a solution file; verifies solution files
//! against their containers; recomputes container CIDs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ballpack::canonical::cid_sha256;
use ballpack::events::{Caps, Flags, HolePruning, ShufflePolicy, SolveEvent, SolveOptions};
use ballpack::inventory::{parse_inline, PieceCounts};
use ballpack::persistence::{
    load_container, load_inventory, load_solution, write_solution, EventLog, SolverMeta,
};
use ballpack::pieces::PieceLibrary;
use ballpack::solution::{stub_record, verify_record, SolutionRecord};
use ballpack::{engine, render, ENGINE_NAMES};

/// Solves FCC ball-puzzle containers and manages solution files.
#[derive(Parser)]
#[command(name = "ballpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a container and write the event log and solution file.
    Solve(SolveArgs),
    /// Re-check a solution file against its container.
    Verify {
        /// Path to the solution JSON.
        solution: PathBuf,
        /// Path to the container JSON.
        container: PathBuf,
    },
    /// Recompute and print a container's CID.
    Cid {
        /// Path to the container JSON.
        container: PathBuf,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Path to the FCC container JSON.
    container: PathBuf,
    /// Engine to run.
    #[arg(long, default_value = "dfs")]
    engine: String,
    /// Inline inventory, e.g. A=1,B=2. Takes precedence over --inventory.
    #[arg(long)]
    pieces: Option<String>,
    /// Path to an inventory JSON ({"pieces": {...}}).
    #[arg(long)]
    inventory: Option<PathBuf>,
    /// Event log output path (one JSON event per line).
    #[arg(long, default_value = "events.jsonl")]
    eventlog: PathBuf,
    /// Solution output path.
    #[arg(long, default_value = "solution.json")]
    solution: PathBuf,
    /// Seed for tie-shuffles and internal RNG.
    #[arg(long, default_value_t = 9000)]
    seed: u64,
    /// Stop after this many distinct solutions.
    #[arg(long, default_value_t = 1)]
    max_results: u64,
    /// Wall-clock limit in seconds; 0 is unlimited.
    #[arg(long, default_value_t = 0.0)]
    time_limit: f64,
    /// Node cap; 0 is unlimited.
    #[arg(long, default_value_t = 0)]
    max_nodes: u64,
    /// Depth cap; 0 is unlimited.
    #[arg(long, default_value_t = 0)]
    max_depth: u32,
    /// DLX row cap; 0 is unlimited.
    #[arg(long, default_value_t = 0)]
    max_rows: u64,
    /// Tick cadence in milliseconds; 0 emits no ticks.
    #[arg(long, default_value_t = 0)]
    progress_interval_ms: u64,
    /// Enable MRV target-cell ordering (DFS).
    #[arg(long)]
    mrv: bool,
    /// Enable support-biased ordering (DFS).
    #[arg(long)]
    support_bias: bool,
    /// Hole pruning mode (DFS).
    #[arg(long, value_enum, default_value_t = HolePruningArg::None)]
    hole_pruning: HolePruningArg,
    /// Enable the depth-0 anchor symmetry break (DFS).
    #[arg(long)]
    anchor_rule: bool,
    /// Rotate the depth-0 piece preference every N combinations; 0 is off.
    #[arg(long, default_value_t = 0)]
    pivot_cycle: u64,
    /// Row-ordering shuffle policy (DLX).
    #[arg(long, value_enum, default_value_t = ShuffleArg::None)]
    shuffle: ShuffleArg,
    /// Print each solution as text slices.
    #[arg(long)]
    print: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HolePruningArg {
    None,
    Lt4,
    SingleComponent,
}

impl From<HolePruningArg> for HolePruning {
    fn from(arg: HolePruningArg) -> Self {
        match arg {
            HolePruningArg::None => HolePruning::None,
            HolePruningArg::Lt4 => HolePruning::Lt4,
            HolePruningArg::SingleComponent => HolePruning::SingleComponent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ShuffleArg {
    None,
    TiesOnly,
    Full,
}

impl From<ShuffleArg> for ShufflePolicy {
    fn from(arg: ShuffleArg) -> Self {
        match arg {
            ShuffleArg::None => ShufflePolicy::None,
            ShuffleArg::TiesOnly => ShufflePolicy::TiesOnly,
            ShuffleArg::Full => ShufflePolicy::Full,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Verify {
            solution,
            container,
        } => run_verify(&solution, &container),
        Command::Cid { container } => run_cid(&container),
    }
}

fn run_solve(args: SolveArgs) -> ExitCode {
    let container = match load_container(&args.container) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load container: {e}");
            return ExitCode::from(2);
        }
    };

    let inventory = match resolve_inventory(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("failed to resolve inventory: {e}");
            return ExitCode::from(2);
        }
    };

    let Some(engine) = engine(&args.engine) else {
        eprintln!(
            "unknown engine {:?}; available: {}",
            args.engine,
            ENGINE_NAMES.join(", ")
        );
        return ExitCode::from(2);
    };

    let options = SolveOptions {
        seed: args.seed,
        max_results: args.max_results,
        time_limit: args.time_limit,
        caps: Caps {
            max_nodes: args.max_nodes,
            max_depth: args.max_depth,
            max_rows: args.max_rows,
        },
        progress_interval_ms: args.progress_interval_ms,
        flags: Flags {
            mrv_pieces: args.mrv,
            support_bias: args.support_bias,
        },
        hole_pruning: args.hole_pruning.into(),
        anchor_rule: args.anchor_rule,
        pivot_cycle: args.pivot_cycle,
        shuffle: args.shuffle.into(),
    };

    let mut log = match EventLog::create(&args.eventlog) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("failed to open event log: {e}");
            return ExitCode::from(2);
        }
    };

    let meta = SolverMeta {
        engine: engine.name().to_string(),
        seed: args.seed,
    };
    let library = PieceLibrary::standard();
    let mut emitted: Vec<SolutionRecord> = Vec::new();
    let mut failed = false;

    {
        let mut sink = |event: SolveEvent| -> bool {
            if let Err(e) = log.write(&event) {
                eprintln!("failed to write event: {e}");
                failed = true;
                return false;
            }
            if let SolveEvent::Solution { solution, .. } = &event {
                if let Err(e) = write_solution(&args.solution, solution, &meta) {
                    eprintln!("failed to write solution: {e}");
                    failed = true;
                    return false;
                }
                if args.print {
                    println!("{}", render::format_solution(&container, solution));
                }
                emitted.push(solution.clone());
            }
            true
        };
        engine.solve(&container, &inventory, library, &options, &mut sink);
    }

    if let Err(e) = log.flush() {
        eprintln!("failed to flush event log: {e}");
        failed = true;
    }
    if failed {
        return ExitCode::from(1);
    }

    // Always leave a solution file behind, stub included.
    if emitted.is_empty() {
        let stub = stub_record(&container, inventory.to_map());
        if let Err(e) = write_solution(&args.solution, &stub, &meta) {
            eprintln!("failed to write stub solution: {e}");
            return ExitCode::from(1);
        }
        println!("no solution found; wrote stub to {}", args.solution.display());
    } else {
        println!(
            "found {} solution(s); wrote {} and {}",
            emitted.len(),
            args.solution.display(),
            args.eventlog.display()
        );
    }
    ExitCode::SUCCESS
}

fn resolve_inventory(args: &SolveArgs) -> Result<PieceCounts, ballpack::persistence::LoadError> {
    if let Some(inline) = &args.pieces {
        return parse_inline(inline);
    }
    if let Some(path) = &args.inventory {
        return load_inventory(path);
    }
    Ok(PieceCounts::default())
}

fn run_verify(solution_path: &PathBuf, container_path: &PathBuf) -> ExitCode {
    let container = match load_container(container_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load container: {e}");
            return ExitCode::from(2);
        }
    };
    let file = match load_solution(solution_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to load solution: {e}");
            return ExitCode::from(2);
        }
    };
    match verify_record(&file.record, &container, PieceLibrary::standard()) {
        Ok(()) => {
            println!("OK: solution verifies against {}", container.cid());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("verification failed: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_cid(container_path: &PathBuf) -> ExitCode {
    match load_container(container_path) {
        Ok(container) => {
            println!("{}", cid_sha256(container.cells()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to load container: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_args_parse() {
        let cli = Cli::parse_from([
            "ballpack",
            "solve",
            "container.json",
            "--engine",
            "dlx",
            "--pieces",
            "A=1,B=2",
            "--seed",
            "7",
            "--max-results",
            "3",
            "--hole-pruning",
            "lt4",
            "--shuffle",
            "ties-only",
        ]);
        match cli.command {
            Command::Solve(args) => {
                assert_eq!(args.engine, "dlx");
                assert_eq!(args.seed, 7);
                assert_eq!(args.max_results, 3);
                assert!(matches!(args.hole_pruning, HolePruningArg::Lt4));
                assert!(matches!(args.shuffle, ShuffleArg::TiesOnly));
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_verify_args_parse() {
        let cli = Cli::parse_from(["ballpack", "verify", "solution.json", "container.json"]);
        assert!(matches!(cli.command, Command::Verify { .. }));
    }
}
