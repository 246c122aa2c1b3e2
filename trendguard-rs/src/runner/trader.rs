//! Fixed-interval driver around the trend follower

use std::future::Future;

use tracing::{debug, error, info, warn};

use crate::config::TraderSettings;
use crate::exchange::{ExecutionGateway, OrderRouter};
use crate::portfolio::Position;
use crate::runner::EngineError;
use crate::strategy::{Decision, TrendFollower};

/// Why a cycle made no decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Bar fetch failed or returned nothing
    NoBars,
    /// Too few bars or out-of-range indicator readings
    NoSnapshot { bars: usize },
}

/// Result of one non-fatal cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Completed(Decision),
    Skipped(SkipReason),
}

/// Owns the gateway, the engine and the one position of the process
pub struct Trader<G: ExecutionGateway> {
    gateway: G,
    strategy: TrendFollower,
    settings: TraderSettings,
    position: Position,
    cycles: u64,
}

impl<G: ExecutionGateway> Trader<G> {
    /// Starts flat
    pub fn new(gateway: G, strategy: TrendFollower, settings: TraderSettings) -> Self {
        Self {
            gateway,
            strategy,
            settings,
            position: Position::flat(),
            cycles: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn settings(&self) -> &TraderSettings {
        &self.settings
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn strategy(&self) -> &TrendFollower {
        &self.strategy
    }

    /// Cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One poll: fetch bars, analyze, step the state machine, commit the position.
    ///
    /// Data and order failures are logged and reported through the outcome. The
    /// only error is a position that fails its invariant, in which case the
    /// previous position is kept.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, EngineError> {
        self.cycles += 1;
        let settings = &self.settings;

        let bars = match self
            .gateway
            .fetch_bars(&settings.symbol, settings.timeframe, settings.bar_limit)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!("Data Error: {}", e);
                Vec::new()
            }
        };
        if bars.is_empty() {
            info!("No bars for {}, skipping cycle", settings.symbol);
            return Ok(CycleOutcome::Skipped(SkipReason::NoBars));
        }

        let snapshot = self.strategy.analyze(&bars);
        match &snapshot {
            Some(s) => info!(
                "Price: ${:.2} | RSI: {:.2} | Stop: ${:.2}",
                s.price(),
                s.momentum(),
                self.position.trailing_stop()
            ),
            None => info!(
                "Waiting for usable indicators ({} bars, need {})",
                bars.len(),
                self.strategy.config().min_bars
            ),
        }

        let router = OrderRouter::new(&self.gateway, &settings.symbol, settings.trading_enabled);
        let (next, decision) = self
            .strategy
            .step(self.position, snapshot.as_ref(), &router)
            .await;

        if !next.is_consistent() {
            return Err(EngineError::InconsistentPosition(next));
        }
        self.position = next;

        Ok(match decision {
            Decision::NoSignal => CycleOutcome::Skipped(SkipReason::NoSnapshot { bars: bars.len() }),
            decision => CycleOutcome::Completed(decision),
        })
    }

    /// Run cycles until `shutdown` resolves or a cycle fails fatally.
    ///
    /// Shutdown is only observed between cycles, while sleeping.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), EngineError>
    where
        F: Future,
    {
        tokio::pin!(shutdown);

        loop {
            match self.run_cycle().await {
                Ok(outcome) => debug!("Cycle {}: {:?}", self.cycles, outcome),
                Err(e) => {
                    error!("Cycle {} failed: {}", self.cycles, e);
                    return Err(e);
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("🛑 Shutdown requested, stopping after {} cycles ({})", self.cycles, self.position.state());
                    return Ok(());
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }
}
