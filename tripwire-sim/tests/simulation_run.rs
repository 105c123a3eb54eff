//! E2E test: configured simulations end in exactly one outcome.
//!
//! Flow:
//! 1. Build a config (as the binary would from the environment)
//! 2. Run the simulation with many workers
//! 3. Verify: one buy, one notification on the bus, report matches

use rust_decimal_macros::dec;
use tripwire_sim::{SimConfig, Simulation, TriggerEvent};

fn config_with(workers: usize, fail_buys: usize) -> SimConfig {
    SimConfig {
        workers,
        fail_buys,
        ticks: 16,
        ..SimConfig::test()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simulation_places_once_for_any_worker_count() -> anyhow::Result<()> {
    for workers in [1, 5, 8, 17] {
        let sim = Simulation::new(config_with(workers, 0))?;
        let mut events = sim.subscribe();

        let report = sim.run().await?;

        assert_eq!(report.ticks_sent, workers * 16);
        assert_eq!(report.buys, 1, "workers = {}", workers);
        assert_eq!(report.placed, 1, "workers = {}", workers);
        assert_eq!(report.errored, 0, "workers = {}", workers);
        assert!(report.fired);
        assert!(matches!(events.try_recv(), Some(Ok(TriggerEvent::Placed(_)))));
        assert!(events.try_recv().is_none());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simulation_failed_buy_is_terminal() -> anyhow::Result<()> {
    for workers in [1, 5, 8, 17] {
        // The placer would succeed after the first call, but no retry happens
        let sim = Simulation::new(config_with(workers, 1))?;
        let mut events = sim.subscribe();

        let report = sim.run().await?;

        assert_eq!(report.buys, 1, "workers = {}", workers);
        assert_eq!(report.placed, 0, "workers = {}", workers);
        assert_eq!(report.errored, 1, "workers = {}", workers);
        assert!(report.fired);

        match events.try_recv() {
            Some(Ok(TriggerEvent::Errored(errored))) => {
                assert_eq!(errored.equity_code, "GBPEUR");
                assert_eq!(errored.price, dec!(295));
            }
            other => panic!("Expected Errored event, got {:?}", other),
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_simulation_from_lookup_config() -> anyhow::Result<()> {
    let config = SimConfig::from_lookup(|key| match key {
        "TRIPWIRE_THRESHOLD" => Some("100".to_string()),
        "TRIPWIRE_START_PRICE" => Some("101".to_string()),
        "TRIPWIRE_PRICE_STEP" => Some("-0.5".to_string()),
        "TRIPWIRE_TICKS" => Some("4".to_string()),
        "TRIPWIRE_WORKERS" => Some("3".to_string()),
        _ => None,
    })?;
    let sim = Simulation::new(config)?;

    let report = sim.run().await?;

    // Walk: 101, 100.5, 100, 99.5 -> only the last tick qualifies
    assert_eq!(report.buys, 1);
    assert!(sim.trigger().is_fired());
    assert_eq!(sim.trigger().threshold(), dec!(100));
    Ok(())
}
