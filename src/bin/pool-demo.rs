use std::process::exit;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use taskpool::{PoolConfig, Result, SharedQueueThreadPool, ThreadPool, WaitStrategy};

const DEFAULT_ROUNDS: u32 = 10;
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Parser)]
#[command(name = "pool-demo", version, about = "Feeds sample jobs to a thread pool")]
struct Cli {
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Number of submission rounds
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    rounds: u32,

    /// Pause after each round, in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS, value_name = "MS")]
    interval_ms: u64,

    /// Idle workers sleep on the queue instead of polling it
    #[arg(long)]
    blocking: bool,

    /// Print a JSON run report to stdout on exit
    #[arg(long)]
    json: bool,
}

/// Summary of a demo run.
#[derive(Serialize)]
struct Report {
    config: PoolConfig,
    threads: usize,
    rounds: u32,
    submitted: usize,
    abandoned: usize,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PoolConfig {
        threads: cli.threads,
        wait: if cli.blocking {
            WaitStrategy::Block
        } else {
            WaitStrategy::Yield
        },
        ..PoolConfig::default()
    };

    info!("pool-demo {}", env!("CARGO_PKG_VERSION"));
    let pool = SharedQueueThreadPool::with_config(config.clone())?;
    let threads = pool.threads();

    let mut submitted = 0;
    for round in 0..cli.rounds {
        info!("Round {}", round + 1);
        pool.submit(function_test1);
        pool.submit(function_test2);
        submitted += 2;
        thread::sleep(Duration::from_millis(cli.interval_ms));
    }

    let abandoned = pool.shutdown();

    if cli.json {
        let report = Report {
            config,
            threads,
            rounds: cli.rounds,
            submitted,
            abandoned,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn function_test1() {
    thread::sleep(Duration::from_millis(200));
    println!("function_test1");
}

fn function_test2() {
    thread::sleep(Duration::from_millis(500));
    println!("function_test2");
}
