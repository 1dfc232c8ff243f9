// Tests for the pure allocation algorithm

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::holdings::HoldingSnapshot;
use crate::instruments::Instrument;
use crate::planner::allocator::{allocate, PlanInput};
use crate::planner::planner_model::{Plan, PlanMode, PlanRow};

// Helper to build an instrument without touching storage
fn instrument(
    id: &str,
    ticker: &str,
    target_pct: Decimal,
    supports_fractions: bool,
    last_price: Option<Decimal>,
) -> Instrument {
    Instrument {
        id: id.to_string(),
        ticker: ticker.to_string(),
        target_pct,
        supports_fractions,
        resolved_symbol: None,
        last_price,
        last_updated: None,
        created_at: Utc::now().naive_utc(),
    }
}

fn input(instrument: Instrument, shares: Decimal, market_value: Decimal) -> PlanInput {
    let holding = HoldingSnapshot {
        instrument_id: instrument.id.clone(),
        shares,
        market_value,
    };
    PlanInput {
        instrument,
        holding,
    }
}

fn row<'a>(plan: &'a Plan, ticker: &str) -> &'a PlanRow {
    plan.rows
        .iter()
        .find(|r| r.ticker == ticker)
        .unwrap_or_else(|| panic!("no row for {}", ticker))
}

fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() < dec!(0.000000001),
        "expected {} ≈ {}",
        actual,
        expected
    );
}

#[test]
fn new_mode_floors_shares_and_redistributes_leftover() {
    // X: target 60% at 110, Y: target 40% at 55, invest 1000 at precision 2.
    // Raw targets 600/400 floor to 5.45 and 7.27 shares (999.35 spent); the
    // 0.65 leftover is split 60/40 as unrounded share increments.
    let inputs = vec![
        input(
            instrument("x", "ETF1", dec!(60), true, Some(dec!(110))),
            dec!(1),
            dec!(110),
        ),
        input(
            instrument("y", "ETF2", dec!(40), true, Some(dec!(55))),
            dec!(2),
            dec!(110),
        ),
    ];

    let plan = allocate(&inputs, dec!(1000), PlanMode::New, 2);

    let x = row(&plan, "ETF1");
    let y = row(&plan, "ETF2");
    assert_eq!(x.target_value, dec!(600));
    assert_eq!(y.target_value, dec!(400));
    assert_close(x.to_buy_shares.unwrap(), dec!(5.45) + dec!(0.39) / dec!(110));
    assert_close(y.to_buy_shares.unwrap(), dec!(7.27) + dec!(0.26) / dec!(55));
    assert_close(x.to_buy_amount, dec!(599.89));
    assert_close(y.to_buy_amount, dec!(400.11));
    assert_close(plan.planned_spend, dec!(1000));
    assert_close(plan.leftover, dec!(0));
    assert!(plan.missing_prices.is_empty());
}

#[test]
fn planned_spend_matches_row_sum_and_never_exceeds_amount() {
    let inputs = vec![
        input(
            instrument("a", "AAA", dec!(50), true, Some(dec!(33.33))),
            dec!(0),
            dec!(0),
        ),
        input(
            instrument("b", "BBB", dec!(30), false, Some(dec!(217.9))),
            dec!(0),
            dec!(0),
        ),
        input(instrument("c", "CCC", dec!(20), true, None), dec!(0), dec!(0)),
    ];

    let plan = allocate(&inputs, dec!(750), PlanMode::New, 4);

    let row_sum: Decimal = plan.rows.iter().map(|r| r.to_buy_amount).sum();
    assert_eq!(plan.planned_spend, row_sum);
    assert!(plan.planned_spend <= plan.amount + dec!(0.001));
}

#[test]
fn rebalance_buys_the_shortfall_at_parity() {
    // A and B each hold 100 worth, each targets 50%; investing 100 makes the
    // target 150 apiece, so both buy 50.
    let inputs = vec![
        input(
            instrument("a", "A", dec!(50), true, Some(dec!(10))),
            dec!(10),
            dec!(100),
        ),
        input(
            instrument("b", "B", dec!(50), true, Some(dec!(20))),
            dec!(5),
            dec!(100),
        ),
    ];

    let plan = allocate(&inputs, dec!(100), PlanMode::Rebalance, 3);

    assert_eq!(plan.total_current, dec!(200));
    assert_eq!(plan.total_after, dec!(300));
    assert_close(row(&plan, "A").to_buy_amount, dec!(50));
    assert_close(row(&plan, "B").to_buy_amount, dec!(50));
    assert_close(plan.planned_spend, dec!(100));
}

#[test]
fn rebalance_clamps_overweight_instruments_to_zero() {
    // A is far above its target; the shortfall is negative and must clamp to
    // a zero buy, never a sell.
    let inputs = vec![
        input(
            instrument("a", "A", dec!(10), true, Some(dec!(10))),
            dec!(50),
            dec!(500),
        ),
        input(
            instrument("b", "B", dec!(90), true, Some(dec!(20))),
            dec!(5),
            dec!(100),
        ),
    ];

    let plan = allocate(&inputs, dec!(100), PlanMode::Rebalance, 6);

    let a = row(&plan, "A");
    assert_eq!(a.to_buy_amount, Decimal::ZERO);
    assert_eq!(a.to_buy_shares, Some(Decimal::ZERO));
    assert!(row(&plan, "B").to_buy_amount > Decimal::ZERO);
    assert!(plan.rows.iter().all(|r| r.to_buy_amount >= Decimal::ZERO));
}

#[test]
fn non_fractional_instruments_buy_whole_units_only() {
    let inputs = vec![input(
        instrument("a", "WHOLE", dec!(100), false, Some(dec!(30))),
        dec!(0),
        dec!(0),
    )];

    // Requested precision 4 is overridden by the missing fractional support
    let plan = allocate(&inputs, dec!(100), PlanMode::New, 4);

    let a = row(&plan, "WHOLE");
    assert_eq!(a.to_buy_shares, Some(dec!(3)));
    assert_eq!(a.to_buy_amount, dec!(90));
}

#[test]
fn leftover_stays_unspent_without_fractional_instruments() {
    // Two whole-unit instruments leave flooring leftover with nowhere to go
    let inputs = vec![
        input(
            instrument("a", "AAA", dec!(60), false, Some(dec!(70))),
            dec!(0),
            dec!(0),
        ),
        input(
            instrument("b", "BBB", dec!(40), false, Some(dec!(90))),
            dec!(0),
            dec!(0),
        ),
    ];

    let plan = allocate(&inputs, dec!(500), PlanMode::New, 6);

    // 300/70 -> 4 shares (280), 200/90 -> 2 shares (180)
    assert_eq!(plan.planned_spend, dec!(460));
    assert_eq!(plan.leftover, dec!(40));
}

#[test]
fn missing_price_excludes_row_without_affecting_others() {
    let with_unpriced = vec![
        input(
            instrument("x", "X", dec!(60), true, Some(dec!(110))),
            dec!(0),
            dec!(0),
        ),
        input(instrument("z", "Z", dec!(20), true, None), dec!(0), dec!(0)),
    ];
    let without_unpriced = vec![input(
        instrument("x", "X", dec!(60), true, Some(dec!(110))),
        dec!(0),
        dec!(0),
    )];

    let plan = allocate(&with_unpriced, dec!(500), PlanMode::New, 2);
    let reference = allocate(&without_unpriced, dec!(500), PlanMode::New, 2);

    let z = row(&plan, "Z");
    assert_eq!(z.to_buy_shares, None);
    assert_eq!(z.to_buy_amount, Decimal::ZERO);
    assert_eq!(plan.missing_prices, vec!["Z".to_string()]);
    assert_eq!(row(&plan, "X"), row(&reference, "X"));
}

#[test]
fn unpriced_fractional_instruments_are_excluded_from_redistribution() {
    // Z supports fractions but has no price; the whole leftover goes to X
    let inputs = vec![
        input(
            instrument("x", "X", dec!(60), true, Some(dec!(110))),
            dec!(0),
            dec!(0),
        ),
        input(instrument("z", "Z", dec!(20), true, None), dec!(0), dec!(0)),
    ];

    let plan = allocate(&inputs, dec!(1000), PlanMode::New, 2);

    // X targets 600, floors to 5.45 shares (599.5); everything unspent on X
    // flows back to it and Z still buys nothing
    let x = row(&plan, "X");
    assert_close(x.to_buy_amount, dec!(1000));
    assert_eq!(row(&plan, "Z").to_buy_amount, Decimal::ZERO);
    assert_close(plan.leftover, dec!(0));
}

#[test]
fn tiny_leftover_below_epsilon_is_not_redistributed() {
    // 100 target at price 99.9995, precision 4: floors to 1.0000 shares,
    // leaving 0.0005 which sits below the epsilon threshold
    let inputs = vec![input(
        instrument("a", "AAA", dec!(100), true, Some(dec!(99.9995))),
        dec!(0),
        dec!(0),
    )];

    let plan = allocate(&inputs, dec!(100), PlanMode::New, 4);

    assert_eq!(row(&plan, "AAA").to_buy_shares, Some(dec!(1)));
    assert_eq!(plan.leftover, dec!(0.0005));
}

#[test]
fn zero_target_percentages_leave_leftover_unspent() {
    let inputs = vec![input(
        instrument("a", "AAA", dec!(0), true, Some(dec!(10))),
        dec!(0),
        dec!(0),
    )];

    let plan = allocate(&inputs, dec!(100), PlanMode::New, 2);

    assert_eq!(plan.planned_spend, Decimal::ZERO);
    assert_eq!(plan.leftover, dec!(100));
}

#[test]
fn negative_amount_degenerates_to_an_all_zero_plan() {
    let inputs = vec![
        input(
            instrument("a", "AAA", dec!(60), true, Some(dec!(50))),
            dec!(2),
            dec!(100),
        ),
        input(
            instrument("b", "BBB", dec!(40), false, Some(dec!(25))),
            dec!(4),
            dec!(100),
        ),
    ];

    let plan = allocate(&inputs, dec!(-1), PlanMode::New, 2);

    assert!(plan
        .rows
        .iter()
        .all(|r| r.to_buy_amount == Decimal::ZERO
            && r.to_buy_shares == Some(Decimal::ZERO)));
    assert_eq!(plan.planned_spend, Decimal::ZERO);
    assert_eq!(plan.leftover, Decimal::ZERO);
}

#[test]
fn empty_instrument_list_yields_an_empty_plan() {
    let plan = allocate(&[], dec!(250), PlanMode::Rebalance, 6);

    assert!(plan.rows.is_empty());
    assert_eq!(plan.planned_spend, Decimal::ZERO);
    assert_eq!(plan.leftover, dec!(250));
    assert!(plan.missing_prices.is_empty());
}

#[test]
fn identical_inputs_produce_identical_plans() {
    let inputs = vec![
        input(
            instrument("a", "AAA", dec!(55), true, Some(dec!(123.45))),
            dec!(3),
            dec!(370.35),
        ),
        input(
            instrument("b", "BBB", dec!(45), false, Some(dec!(67.89))),
            dec!(1),
            dec!(67.89),
        ),
    ];

    let first = allocate(&inputs, dec!(1234.56), PlanMode::Rebalance, 3);
    let second = allocate(&inputs, dec!(1234.56), PlanMode::Rebalance, 3);

    assert_eq!(first, second);
}
