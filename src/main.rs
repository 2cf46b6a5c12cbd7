use clap::Parser;

use lightcycle::benchmark::{BenchmarkConfig, Standing, run_benchmark};
use lightcycle::games::lightcycle::LightcycleConfig;

#[derive(Parser, Debug)]
#[command(name = "lightcycle", version, about = "Benchmark light-cycle strategies against each other")]
struct Args {
    /// Number of rounds to play
    #[arg(short = 'n', long, default_value_t = 100, allow_negative_numbers = true)]
    runs: i64,

    /// Contenders drawn into each round
    #[arg(long, default_value_t = 4)]
    players: usize,

    /// Grid width, border included
    #[arg(long, default_value_t = 30)]
    width: u32,

    /// Grid height, border included
    #[arg(long, default_value_t = 30)]
    height: u32,

    /// Plies searched by the minimax contender
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Base seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn print_standings(standings: &[Standing]) {
    println!("{:<16} {:>10} {:>8} {:>12}", "strategy", "total", "games", "normalized");
    for standing in standings {
        println!(
            "{:<16} {:>10} {:>8} {:>12.3}",
            standing.name, standing.total_score, standing.games, standing.normalized
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lightcycle=info".parse()?),
        )
        .init();

    let args = Args::parse();
    if args.runs <= 0 {
        eprintln!("run count must be positive, got {}", args.runs);
        std::process::exit(2);
    }

    let config = BenchmarkConfig {
        runs: args.runs as usize,
        players_per_round: args.players,
        seed: args.seed.unwrap_or_else(rand::random),
        arena: LightcycleConfig::with_grid_size(args.width, args.height),
        search_depth: args.depth,
    };

    let standings = run_benchmark(config).await?;
    print_standings(&standings);

    Ok(())
}
