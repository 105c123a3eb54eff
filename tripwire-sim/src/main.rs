//! Tripwire Simulation
//!
//! Replays a synthetic price walk from concurrent workers into a single
//! fire-once trigger and prints what happened as JSON lines.
//!
//! # Usage
//!
//! ```bash
//! # Default run: 8 workers, 32 ticks each
//! cargo run -p tripwire-sim
//!
//! # Make the first buy fail
//! TRIPWIRE_FAIL_BUYS=1 RUST_LOG=debug cargo run -p tripwire-sim
//! ```
//!
//! # Environment Variables
//!
//! - `TRIPWIRE_EQUITY_CODE`: Equity (default: GBPEUR)
//! - `TRIPWIRE_THRESHOLD`: Buy threshold (default: 300)
//! - `TRIPWIRE_START_PRICE`: First tick price (default: 320)
//! - `TRIPWIRE_PRICE_STEP`: Price change per tick (default: -2.5)
//! - `TRIPWIRE_TICKS`: Ticks per worker (default: 32)
//! - `TRIPWIRE_WORKERS`: Concurrent workers (default: 8)
//! - `TRIPWIRE_FAIL_BUYS`: Leading buys to reject (default: 0)

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tripwire_sim::{SimConfig, Simulation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("tripwire_sim=info".parse()?)
                .add_directive("tripwire_exec=info".parse()?),
        )
        .init();

    // Load configuration
    let config = SimConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        equity_code = %config.equity_code,
        threshold = %config.threshold,
        workers = config.workers,
        "Tripwire simulation"
    );

    let simulation = Simulation::new(config)?;
    let mut events = simulation.subscribe();

    let report = simulation.run().await?;

    let drained = events.drain();
    if drained.missed > 0 {
        warn!(missed = drained.missed, "Event bus receiver lagged");
    }
    for event in &drained.events {
        println!("{}", serde_json::to_string(event)?);
    }
    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}
