use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::errors::Result;
use crate::holdings::HoldingsServiceTrait;
use crate::instruments::InstrumentServiceTrait;

use super::allocator::{allocate, PlanInput};
use super::planner_model::{Plan, PlanMode};

/// Assembles an input snapshot from the registry and holdings calculator and
/// hands it to the pure allocator. Holds no mutable state of its own; every
/// invocation re-reads the current snapshot.
pub struct PlannerService {
    instrument_service: Arc<dyn InstrumentServiceTrait>,
    holdings_service: Arc<dyn HoldingsServiceTrait>,
}

impl PlannerService {
    pub fn new(
        instrument_service: Arc<dyn InstrumentServiceTrait>,
        holdings_service: Arc<dyn HoldingsServiceTrait>,
    ) -> Self {
        Self {
            instrument_service,
            holdings_service,
        }
    }

    pub fn compute_plan(&self, amount: Decimal, mode: PlanMode, precision: u32) -> Result<Plan> {
        let instruments = self.instrument_service.list_instruments()?;

        let mut inputs = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let holding = self.holdings_service.holdings_for(&instrument.id)?;
            inputs.push(PlanInput {
                instrument,
                holding,
            });
        }

        debug!(
            "Planning {:?} allocation of {} across {} instruments",
            mode,
            amount,
            inputs.len()
        );
        Ok(allocate(&inputs, amount, mode, precision))
    }
}
