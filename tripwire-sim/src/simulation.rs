//! Tick replay against a single trigger.
//!
//! Every worker replays the same descending price walk, so all of them reach
//! the threshold crossing at roughly the same moment and race for the buy.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use tripwire_domain::Tick;
use tripwire_exec::{EquityTrigger, StubOrderPlacer, TracingLogger};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::event_bus::{EventBus, EventReceiver, TriggerEvent};

/// Outcome of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimReport {
    /// Ticks delivered across all workers
    pub ticks_sent: usize,
    /// Buy calls that reached the order placer
    pub buys: usize,
    /// Placed notifications observed
    pub placed: usize,
    /// Errored notifications observed
    pub errored: usize,
    /// Final trigger state
    pub fired: bool,
}

/// One trigger, a stub order placer and a set of tick workers.
pub struct Simulation {
    config: SimConfig,
    placer: Arc<StubOrderPlacer>,
    trigger: Arc<EquityTrigger>,
    bus: Arc<EventBus>,
    placed: Arc<AtomicUsize>,
    errored: Arc<AtomicUsize>,
}

impl Simulation {
    /// Wire a trigger for `config` and route its notifications onto the bus.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let placer = Arc::new(StubOrderPlacer::failing_first(config.fail_buys));
        let trigger = Arc::new(
            EquityTrigger::builder(config.threshold)
                .order_placer(placer.clone())
                .logger(Arc::new(TracingLogger::new("tripwire-sim")))
                .build()?,
        );
        let bus = Arc::new(EventBus::default());
        let placed = Arc::new(AtomicUsize::new(0));
        let errored = Arc::new(AtomicUsize::new(0));

        {
            let bus = Arc::clone(&bus);
            let placed = Arc::clone(&placed);
            trigger.on_order_placed(move |event| {
                placed.fetch_add(1, Ordering::SeqCst);
                bus.send(TriggerEvent::Placed(event.clone()));
            });
        }
        {
            let bus = Arc::clone(&bus);
            let errored = Arc::clone(&errored);
            trigger.on_order_errored(move |event| {
                errored.fetch_add(1, Ordering::SeqCst);
                bus.send(TriggerEvent::Errored(event.clone()));
            });
        }

        Ok(Self {
            config,
            placer,
            trigger,
            bus,
            placed,
            errored,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn trigger(&self) -> &Arc<EquityTrigger> {
        &self.trigger
    }

    /// Subscribe to trigger notifications. Subscribe before `run`.
    pub fn subscribe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    /// Replay the tick walk on every worker and wait for all of them.
    pub async fn run(&self) -> SimResult<SimReport> {
        let ticks = (0..self.config.ticks)
            .map(|i| Ok(Tick::new(self.config.equity_code.as_str(), self.config.price_at(i)?)?))
            .collect::<SimResult<Vec<_>>>()?;
        let ticks = Arc::new(ticks);

        info!(
            trigger_id = %self.trigger.id(),
            equity_code = %self.config.equity_code,
            threshold = %self.config.threshold,
            workers = self.config.workers,
            ticks = self.config.ticks,
            "Starting tick replay"
        );

        let handles: Vec<_> = (0..self.config.workers)
            .map(|_| {
                let trigger = Arc::clone(&self.trigger);
                let ticks = Arc::clone(&ticks);
                tokio::task::spawn_blocking(move || {
                    for tick in ticks.iter() {
                        trigger.receive(tick);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle
                .await
                .map_err(|e| SimError::Worker(e.to_string()))?;
        }

        let report = SimReport {
            ticks_sent: self.config.workers * self.config.ticks,
            buys: self.placer.buy_count(),
            placed: self.placed.load(Ordering::SeqCst),
            errored: self.errored.load(Ordering::SeqCst),
            fired: self.trigger.is_fired(),
        };

        if !report.fired {
            warn!(
                threshold = %self.config.threshold,
                "Price walk never crossed below the threshold"
            );
        }
        info!(?report, "Tick replay complete");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_fires_once() {
        let sim = Simulation::new(SimConfig::test()).unwrap();
        let mut events = sim.subscribe();

        let report = sim.run().await.unwrap();

        assert_eq!(report.ticks_sent, 32);
        assert_eq!(report.buys, 1);
        assert_eq!(report.placed, 1);
        assert_eq!(report.errored, 0);
        assert!(report.fired);

        match events.try_recv() {
            Some(Ok(TriggerEvent::Placed(placed))) => {
                assert_eq!(placed.equity_code, "GBPEUR");
                // First price strictly below 300 on the walk 310, 305, 300, 295
                assert_eq!(placed.price, dec!(295));
            }
            other => panic!("Expected Placed event, got {:?}", other),
        }
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_run_rejects_overflowing_walk() {
        // Built directly, bypassing the checks in `from_lookup`
        let config = SimConfig {
            start_price: Decimal::MAX,
            price_step: dec!(1),
            ..SimConfig::test()
        };
        let sim = Simulation::new(config).unwrap();

        let result = sim.run().await;

        assert!(matches!(result, Err(SimError::Config(_))));
        assert!(!sim.trigger().is_fired());
    }

    #[tokio::test]
    async fn test_run_without_crossing() {
        let config = SimConfig {
            price_step: dec!(1),
            ..SimConfig::test()
        };
        let sim = Simulation::new(config).unwrap();

        let report = sim.run().await.unwrap();

        assert_eq!(report.buys, 0);
        assert!(!report.fired);
    }
}
