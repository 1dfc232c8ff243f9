//! The allocation algorithm: turns a cash amount and a snapshot of
//! instruments with holdings into a buy plan.
//!
//! The computation is pure and synchronous. Share quantities from the first
//! allocation pass are floored toward negative infinity at each instrument's
//! effective precision so the plan never overshoots a target value; the cash
//! left over by that flooring is then redistributed proportionally among
//! fractional-capable priced instruments, unrounded.

use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::LEFTOVER_EPSILON;
use crate::holdings::HoldingSnapshot;
use crate::instruments::Instrument;

use super::planner_model::{Plan, PlanMode, PlanRow};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// One instrument plus its current derived position.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub instrument: Instrument,
    pub holding: HoldingSnapshot,
}

/// Computes a buy plan for the given snapshot.
///
/// Negative amounts are not rejected; every raw buy clamps at zero, so they
/// degenerate into an all-zero plan. Instruments without a usable price are
/// reported in `missing_prices` and excluded from buying.
pub fn allocate(inputs: &[PlanInput], amount: Decimal, mode: PlanMode, precision: u32) -> Plan {
    let total_current: Decimal = inputs.iter().map(|i| i.holding.market_value).sum();
    let total_after = total_current + amount;

    let mut rows: Vec<PlanRow> = Vec::with_capacity(inputs.len());
    let mut fractional_priced: Vec<usize> = Vec::new();
    let mut planned_spend = Decimal::ZERO;
    let mut missing_prices: Vec<String> = Vec::new();

    for input in inputs {
        let instrument = &input.instrument;
        // Whole units only for instruments without fractional support
        let effective_precision = if instrument.supports_fractions {
            precision
        } else {
            0
        };

        let target_value = match mode {
            PlanMode::New => amount * instrument.target_pct / HUNDRED,
            PlanMode::Rebalance => total_after * instrument.target_pct / HUNDRED,
        };
        let raw_to_buy_amount = match mode {
            PlanMode::New => target_value,
            PlanMode::Rebalance => target_value - input.holding.market_value,
        }
        .max(Decimal::ZERO);

        let (to_buy_shares, to_buy_amount) = match instrument.usable_price() {
            None => {
                missing_prices.push(instrument.ticker.clone());
                (None, Decimal::ZERO)
            }
            Some(price) => {
                let raw_shares = raw_to_buy_amount / price;
                let floored_shares = floor_shares(raw_shares, effective_precision);
                (Some(floored_shares), floored_shares * price)
            }
        };

        if to_buy_shares.is_some() && instrument.supports_fractions {
            fractional_priced.push(rows.len());
        }

        planned_spend += to_buy_amount;
        rows.push(PlanRow {
            instrument_id: instrument.id.clone(),
            ticker: instrument.ticker.clone(),
            target_pct: instrument.target_pct,
            current_shares: input.holding.shares,
            last_price: instrument.usable_price(),
            current_value: input.holding.market_value,
            target_value,
            to_buy_amount,
            to_buy_shares,
        });
    }

    let mut leftover = (amount - planned_spend).max(Decimal::ZERO);

    // Redistribute flooring leftover among fractional-capable priced
    // instruments, weighted by target percentage within that subset. The
    // extra share quantities stay unrounded.
    let epsilon: Decimal = LEFTOVER_EPSILON.parse().unwrap_or_default();
    if leftover > epsilon {
        let total_frac_pct: Decimal = fractional_priced
            .iter()
            .map(|&i| rows[i].target_pct)
            .sum();

        if total_frac_pct > Decimal::ZERO {
            for &i in &fractional_priced {
                let row = &mut rows[i];
                let Some(price) = row.last_price else { continue };
                let allocated = leftover * (row.target_pct / total_frac_pct);
                let extra_shares = allocated / price;
                row.to_buy_shares = Some(row.to_buy_shares.unwrap_or_default() + extra_shares);
                row.to_buy_amount += allocated;
                planned_spend += allocated;
            }

            leftover = (amount - planned_spend).max(Decimal::ZERO);
        } else {
            debug!("No fractional-capable priced instrument; leftover stays unspent");
        }
    }

    Plan {
        mode,
        amount,
        precision,
        total_current,
        total_after,
        rows,
        planned_spend,
        leftover,
        missing_prices,
    }
}

/// Floors a share quantity to `precision` decimal places, toward negative
/// infinity. Decimal arithmetic keeps the flooring exact; a binary-float
/// `5.4499999…` artifact can never round up here.
fn floor_shares(shares: Decimal, precision: u32) -> Decimal {
    shares.round_dp_with_strategy(precision, RoundingStrategy::ToNegativeInfinity)
}
