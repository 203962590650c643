use clap::{Parser, ValueEnum};
use log::info;
use poker_arena::arena::Match;
use poker_arena::config::{MatchConfig, TableConfig};
use poker_arena::strategy::{BotProfile, BotStrategy, CallingStation, StrategyHandle};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Blinds, preflop plus flop, turn and river.
    Holdem,
    /// Flat ante, three betting rounds on flop, turn and river.
    ThreeStreet,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Run a match between the built-in bots", long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value_t = Preset::ThreeStreet)]
    preset: Preset,
    #[arg(long, default_value_t = 50)]
    hands: u32,
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=10))]
    players: u8,
    /// Starting stack; defaults to the preset's.
    #[arg(long)]
    stack: Option<u64>,
    /// Seed for shuffles and bot decisions.
    #[arg(long)]
    seed: Option<u64>,
    /// Per-decision time limit in milliseconds; 0 runs strategies inline.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Forfeit a player after this many strategy faults.
    #[arg(long)]
    fault_limit: Option<u32>,
}

fn table(args: &Args) -> TableConfig {
    let table = match args.preset {
        Preset::Holdem => TableConfig::holdem(5, 10),
        Preset::ThreeStreet => TableConfig::three_street(),
    };
    let table = match args.stack {
        Some(stack) => table.with_starting_stack(stack),
        None => table,
    };
    let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));
    table.with_decision_timeout(timeout)
}

fn lineup(players: u8, seed: Option<u64>) -> Vec<StrategyHandle> {
    (0..u64::from(players))
        .map(|i| {
            let (label, profile) = match i % 4 {
                0 => ("tight", BotProfile::tight()),
                1 => ("loose", BotProfile::loose()),
                2 => return StrategyHandle::new(format!("station-{i}"), CallingStation),
                _ => ("bot", BotProfile::default()),
            };
            let profile = match seed {
                Some(s) => profile.with_seed(s.wrapping_add(i)),
                None => profile,
            };
            StrategyHandle::new(format!("{label}-{i}"), BotStrategy::new(profile))
        })
        .collect()
}

fn main() -> ExitCode {
    env_logger::builder().format_target(false).init();
    let args = Args::parse();

    let mut config = MatchConfig::new(table(&args), args.hands);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(limit) = args.fault_limit {
        config = config.with_fault_limit(limit);
    }

    let mut arena = match Match::new(config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    for handle in lineup(args.players, args.seed) {
        info!("seating {}", handle.name());
        arena.join(handle);
    }
    match arena.run() {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("match aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
