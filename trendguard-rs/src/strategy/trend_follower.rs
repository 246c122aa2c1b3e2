//! Trend-following state machine: FLAT -> LONG on trend and momentum,
//! LONG -> FLAT when price falls through the ATR trailing stop.

use crate::config::StrategyConfig;
use crate::data::Bar;
use crate::exchange::{ExecutionGateway, GatewayError, OrderRouter, OrderSide};
use crate::portfolio::{Position, PositionSizer, TrailingStop};
use crate::strategy::{MarketSnapshot, SignalCalculator, ENTRY_MOMENTUM};
use crate::Result;
use tracing::{error, info, warn};

/// What one step of the state machine did
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No usable snapshot; position logic skipped
    NoSignal,
    /// Flat and the entry conditions are not met
    StayFlat,
    /// Entry conditions met but the position sized to zero
    InsufficientCollateral,
    Entered {
        quantity: f64,
        price: f64,
        margin_cost: f64,
        trailing_stop: f64,
        simulated: bool,
    },
    /// Buy failed; still flat
    EntryFailed(GatewayError),
    Holding {
        trailing_stop: f64,
        raised: bool,
    },
    Exited {
        quantity: f64,
        price: f64,
        simulated: bool,
    },
    /// Sell failed; position kept and the exit is retried next cycle
    ExitFailed(GatewayError),
}

impl Decision {
    pub fn is_order_failure(&self) -> bool {
        matches!(self, Self::EntryFailed(_) | Self::ExitFailed(_))
    }
}

/// The decision engine
#[derive(Debug, Clone)]
pub struct TrendFollower {
    config: StrategyConfig,
    calculator: SignalCalculator,
    sizer: PositionSizer,
    stop: TrailingStop,
}

impl TrendFollower {
    /// Build the engine; fails on an invalid config
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            calculator: SignalCalculator::new(config.min_bars)?,
            sizer: PositionSizer::new(&config),
            stop: TrailingStop::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    pub fn trailing_stop(&self) -> &TrailingStop {
        &self.stop
    }

    /// Validated snapshot of the latest bar
    pub fn analyze(&self, bars: &[Bar]) -> Option<MarketSnapshot> {
        self.calculator.analyze(bars)
    }

    /// Price above the trend average and momentum above 50
    pub fn entry_signal(&self, snapshot: &MarketSnapshot) -> bool {
        snapshot.is_uptrend() && snapshot.momentum() > ENTRY_MOMENTUM
    }

    /// Advance the state machine by one cycle.
    ///
    /// Takes the current position by value and returns the one to keep. On
    /// order failure the returned position equals the one passed in.
    pub async fn step<G>(
        &self,
        position: Position,
        snapshot: Option<&MarketSnapshot>,
        router: &OrderRouter<'_, G>,
    ) -> (Position, Decision)
    where
        G: ExecutionGateway + ?Sized,
    {
        let Some(snapshot) = snapshot else {
            return (position, Decision::NoSignal);
        };

        if position.is_open() {
            self.manage_long(position, snapshot, router).await
        } else {
            self.try_enter(position, snapshot, router).await
        }
    }

    async fn try_enter<G>(
        &self,
        position: Position,
        snapshot: &MarketSnapshot,
        router: &OrderRouter<'_, G>,
    ) -> (Position, Decision)
    where
        G: ExecutionGateway + ?Sized,
    {
        if !self.entry_signal(snapshot) {
            return (position, Decision::StayFlat);
        }

        let price = snapshot.price();
        let collateral = router.gateway().fetch_free_collateral().await;
        let sizing = self.sizer.size_from_lookup(price, collateral);
        if !sizing.is_tradable() {
            info!("Entry signal but nothing to trade (sized to zero)");
            return (position, Decision::InsufficientCollateral);
        }

        info!(
            "🚀 ENTER LONG: Buying {:.4} {} (Cost: ${:.2})",
            sizing.quantity,
            router.symbol(),
            sizing.margin_cost
        );

        match router.submit(OrderSide::Buy, sizing.quantity).await {
            Ok(fill) => {
                let trailing_stop = self.stop.initial(price, snapshot.volatility());
                info!("   Initial stop: ${:.2}", trailing_stop);
                (
                    Position::open(sizing.quantity, trailing_stop),
                    Decision::Entered {
                        quantity: sizing.quantity,
                        price,
                        margin_cost: sizing.margin_cost,
                        trailing_stop,
                        simulated: fill.is_simulated(),
                    },
                )
            }
            Err(e) => {
                error!("❌ Order failed: {} (staying flat)", e);
                (position, Decision::EntryFailed(e))
            }
        }
    }

    async fn manage_long<G>(
        &self,
        position: Position,
        snapshot: &MarketSnapshot,
        router: &OrderRouter<'_, G>,
    ) -> (Position, Decision)
    where
        G: ExecutionGateway + ?Sized,
    {
        let price = snapshot.price();
        let previous = position.trailing_stop();
        let trailing_stop = self.stop.ratchet(previous, price, snapshot.volatility());
        let raised = trailing_stop > previous;
        let position = position.with_trailing_stop(trailing_stop);

        if raised {
            info!("🛡️ Trailing stop raised: ${:.2} -> ${:.2}", previous, trailing_stop);
        }

        if !TrailingStop::is_triggered(price, trailing_stop) {
            return (position, Decision::Holding { trailing_stop, raised });
        }

        warn!("🚨 STOP LOSS TRIGGERED at ${:.2}", price);
        let quantity = position.quantity();

        match router.submit(OrderSide::Sell, quantity).await {
            Ok(fill) => (
                Position::flat(),
                Decision::Exited {
                    quantity,
                    price,
                    simulated: fill.is_simulated(),
                },
            ),
            Err(e) => {
                error!("❌ Order failed: {} (keeping position, retrying next cycle)", e);
                (position, Decision::ExitFailed(e))
            }
        }
    }
}
