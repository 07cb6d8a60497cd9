use clap::Parser;
use dotenvy::dotenv;
use sn_common::db::{apply_seed, create_pool_from_url, run_migrations};
use sn_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use sn_common::seed::{SeedConfig, generate};
use tracing::info;

const MAX_USERS: usize = 10_000;

#[derive(Debug, Parser)]
#[command(
    name = "sn-seed",
    about = "Load a deterministic demo social network into PostgreSQL"
)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    db_url: String,

    /// Number of users to generate
    #[arg(long, default_value_t = 100)]
    users: usize,

    /// Target average number of connections per user
    #[arg(long, default_value_t = 15)]
    avg_connections: usize,

    /// RNG seed; the same seed always produces the same network
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Truncate the graph tables before inserting
    #[arg(long, default_value_t = false)]
    reset: bool,
}

impl Cli {
    fn seed_config(&self) -> Result<SeedConfig, String> {
        if !(1..=MAX_USERS).contains(&self.users) {
            return Err(format!("--users must be between 1 and {MAX_USERS}"));
        }

        Ok(SeedConfig {
            users: self.users,
            avg_connections: self.avg_connections,
            seed: self.seed,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let args = Cli::parse();
    let config = args.seed_config()?;

    let pool = create_pool_from_url(&args.db_url)?;
    run_migrations(&pool).await?;

    let network = generate(config);
    info!(
        users = network.users.len(),
        connections = network.connections.len(),
        seed = config.seed,
        reset = args.reset,
        "generated demo network"
    );

    let summary = apply_seed(&pool, &network, args.reset).await?;
    info!(
        users = summary.users,
        user_skills = summary.user_skills,
        employments = summary.employments,
        connections = summary.connections,
        "seed applied"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("sn-seed failed: {err}");
        std::process::exit(1);
    }
}
