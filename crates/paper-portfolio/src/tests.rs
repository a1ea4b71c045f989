use crate::account::{reduce, PaperAccount};
use crate::action::TradeAction;

fn account(cash: f64) -> PaperAccount {
    PaperAccount::new(cash)
}

// =============================================================================
// Long entries
// =============================================================================

#[test]
fn long_entries_average_and_debit_cash() {
    let mut acct = account(10_000.0);
    for price in [100.0, 110.0, 120.0] {
        acct.apply(&TradeAction::enter_long(price, 1));
    }

    assert_eq!(acct.long_shares(), 3);
    assert!((acct.avg_entry_price - 110.0).abs() < 1e-9);
    assert!((acct.cash - (10_000.0 - 330.0)).abs() < 1e-9);
    assert!((acct.long_cost_basis() - 330.0).abs() < 1e-9);
}

#[test]
fn multi_share_fill_appends_one_entry_per_share() {
    let acct = reduce(&account(10_000.0), &TradeAction::enter_long(50.0, 4));
    assert_eq!(acct.long_fills, vec![50.0; 4]);
    assert_eq!(acct.avg_entry_price, 50.0);
    assert_eq!(acct.cash, 9_800.0);
}

#[test]
fn insufficient_cash_long_is_a_bit_for_bit_noop() {
    let before = account(50.0);
    let after = reduce(&before, &TradeAction::enter_long(100.0, 1));
    assert_eq!(after, before);
}

// =============================================================================
// Short entries
// =============================================================================

#[test]
fn short_entry_requires_five_x_margin() {
    // Margin for one share at 50 is 250.
    let funded = reduce(&account(10_000.0), &TradeAction::enter_short(50.0, 1));
    assert_eq!(funded.short_shares(), 1);
    assert_eq!(funded.avg_short_price, 50.0);
    assert!((funded.cash - 10_050.0).abs() < 1e-9, "proceeds credited at entry");

    let broke = account(200.0);
    assert_eq!(reduce(&broke, &TradeAction::enter_short(50.0, 1)), broke);
}

#[test]
fn short_fills_average_like_long_fills() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_short(40.0, 1));
    acct.apply(&TradeAction::enter_short(60.0, 1));
    assert!((acct.avg_short_price - 50.0).abs() < 1e-9);
}

// =============================================================================
// Exits and P&L attribution
// =============================================================================

#[test]
fn breakeven_round_trip_is_cash_neutral() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_long(100.0, 1));
    acct.apply(&TradeAction::exit(100.0));

    assert!((acct.cash - 10_000.0).abs() < 1e-9);
    assert_eq!(acct.realized_pnl, 0.0);
    assert_eq!(acct.long_shares(), 0);
    assert_eq!(acct.avg_entry_price, 0.0);
}

#[test]
fn winning_long_round_trip() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_long(100.0, 1));
    assert!((acct.cash - 9_900.0).abs() < 1e-9);

    acct.apply(&TradeAction::mark(110.0));
    assert!((acct.mark_value - 10_010.0).abs() < 1e-9);

    acct.apply(&TradeAction::exit(110.0));
    assert!((acct.cash - 10_010.0).abs() < 1e-9);
    assert!((acct.realized_pnl - 10.0).abs() < 1e-9);
    assert!((acct.pnl_total - 10.0).abs() < 1e-9);
}

#[test]
fn short_round_trip_is_breakeven_neutral_and_profits_on_decline() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_short(50.0, 1));
    assert!((acct.cash - 10_050.0).abs() < 1e-9);

    // Cover at 40: the entry already credited 50, the cover debits 40.
    acct.apply(&TradeAction::exit(40.0));
    assert!((acct.cash - 10_010.0).abs() < 1e-9);
    assert!((acct.realized_pnl - 10.0).abs() < 1e-9);
    assert_eq!(acct.short_shares(), 0);

    // Breakeven variant nets exactly zero.
    let mut flat = account(10_000.0);
    flat.apply(&TradeAction::enter_short(50.0, 1));
    flat.apply(&TradeAction::exit(50.0));
    assert!((flat.cash - 10_000.0).abs() < 1e-9);
    assert_eq!(flat.realized_pnl, 0.0);
}

#[test]
fn exit_unwinds_hedged_exposure_at_once() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_long(100.0, 1));
    acct.apply(&TradeAction::enter_short(100.0, 1));
    acct.apply(&TradeAction::exit(90.0));

    // Long loses 10, short gains 10.
    assert_eq!(acct.realized_pnl, 0.0);
    assert_eq!(acct.long_shares(), 0);
    assert_eq!(acct.short_shares(), 0);
    assert!((acct.cash - 10_000.0).abs() < 1e-9);
}

#[test]
fn exit_with_no_exposure_clears_harmlessly() {
    let before = account(10_000.0);
    let after = reduce(&before, &TradeAction::exit(123.0));
    assert_eq!(after.cash, before.cash);
    assert_eq!(after.realized_pnl, 0.0);
}

#[test]
fn category_attribution_sums_to_total() {
    let mut acct = account(10_000.0);

    acct.apply(&TradeAction::set_category("hammer"));
    acct.apply(&TradeAction::enter_long(100.0, 1));
    acct.apply(&TradeAction::exit(120.0));

    acct.apply(&TradeAction::set_category("double_bottom"));
    acct.apply(&TradeAction::enter_long(100.0, 1));
    acct.apply(&TradeAction::exit(95.0));

    assert!((acct.pnl_for("hammer") - 20.0).abs() < 1e-9);
    assert!((acct.pnl_for("double_bottom") + 5.0).abs() < 1e-9);

    let by_category: f64 = acct.pnl_by_category.values().sum();
    assert!((by_category - acct.pnl_total).abs() < 1e-9);
    assert!((acct.pnl_total - 15.0).abs() < 1e-9);
    assert!((acct.realized_pnl - 15.0).abs() < 1e-9);
}

// =============================================================================
// Mark-to-market
// =============================================================================

#[test]
fn mark_tracks_short_exposure_inversely() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_short(50.0, 2));
    assert!((acct.cash - 10_100.0).abs() < 1e-9);

    acct.apply(&TradeAction::mark(40.0));
    assert!((acct.mark_value - (10_100.0 - 80.0)).abs() < 1e-9);

    // Mark changes nothing else.
    assert_eq!(acct.short_shares(), 2);
    assert!((acct.cash - 10_100.0).abs() < 1e-9);
}

// =============================================================================
// Defensive arithmetic
// =============================================================================

#[test]
fn non_finite_prices_cannot_poison_the_account() {
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::mark(f64::INFINITY));
    acct.apply(&TradeAction::exit(f64::NAN));

    assert!(acct.cash.is_finite());
    assert!(acct.mark_value.is_finite());
    assert!(acct.realized_pnl.is_finite());
    assert!(acct.avg_entry_price.is_finite());
}

#[test]
fn malformed_entry_prices_are_rejected_outright() {
    let before = account(10_000.0);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(reduce(&before, &TradeAction::enter_long(bad, 1)), before);
        assert_eq!(reduce(&before, &TradeAction::enter_short(bad, 1)), before);
    }

    // A rejected NaN entry leaves no zero-price fill behind, so a
    // later exit at a real price realizes nothing.
    let mut acct = account(10_000.0);
    acct.apply(&TradeAction::enter_long(f64::NAN, 1));
    acct.apply(&TradeAction::exit(100.0));
    assert_eq!(acct.long_shares(), 0);
    assert_eq!(acct.realized_pnl, 0.0);
    assert!((acct.cash - 10_000.0).abs() < 1e-9);
}

// =============================================================================
// Wire format
// =============================================================================

#[test]
fn actions_deserialize_from_tagged_json() {
    let action: TradeAction =
        serde_json::from_str(r#"{"type": "enter_long", "price": 100.0, "shares": 2}"#).unwrap();
    assert_eq!(action, TradeAction::enter_long(100.0, 2));

    let action: TradeAction =
        serde_json::from_str(r#"{"type": "set_category", "label": "hammer"}"#).unwrap();
    assert_eq!(action, TradeAction::set_category("hammer"));
}

#[test]
fn zero_share_orders_are_noops() {
    let before = account(10_000.0);
    assert_eq!(reduce(&before, &TradeAction::enter_long(100.0, 0)), before);
    assert_eq!(reduce(&before, &TradeAction::enter_short(100.0, 0)), before);
}
