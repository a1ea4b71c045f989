use std::collections::HashMap;

use replay_core::finite_or_zero;
use serde::{Deserialize, Serialize};

use crate::action::TradeAction;

/// Capital required per unit of short notional (5x = 20% margin).
pub const SHORT_MARGIN_MULTIPLIER: f64 = 5.0;

/// Opening balance of a fresh simulated account.
pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

/// The simulated trading account.
///
/// Share counts are the fill-ledger lengths: every entry fill appends
/// one unit-price per share, and the average entry price is the ledger
/// mean. Long and short exposure can coexist (a hedge); `Exit` unwinds
/// both at once.
///
/// The account deliberately survives series reloads so a user can
/// evaluate performance across patterns; only explicit construction
/// resets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperAccount {
    /// Uncommitted buying power. May legitimately exceed the starting
    /// balance while shorts are open (short proceeds are credited at
    /// entry).
    pub cash: f64,
    pub long_fills: Vec<f64>,
    pub short_fills: Vec<f64>,
    pub avg_entry_price: f64,
    pub avg_short_price: f64,
    /// Cumulative profit from closed round-trips.
    pub realized_pnl: f64,
    /// cash + long exposure - short exposure at the last marked price.
    pub mark_value: f64,
    /// Category applied to the next realized close.
    pub active_category: String,
    pub pnl_by_category: HashMap<String, f64>,
    /// Distinguished aggregate over all categories.
    pub pnl_total: f64,
}

impl PaperAccount {
    pub fn new(starting_cash: f64) -> Self {
        let starting_cash = finite_or_zero(starting_cash);
        Self {
            cash: starting_cash,
            long_fills: Vec::new(),
            short_fills: Vec::new(),
            avg_entry_price: 0.0,
            avg_short_price: 0.0,
            realized_pnl: 0.0,
            mark_value: starting_cash,
            active_category: "random".to_string(),
            pnl_by_category: HashMap::new(),
            pnl_total: 0.0,
        }
    }

    pub fn long_shares(&self) -> usize {
        self.long_fills.len()
    }

    pub fn short_shares(&self) -> usize {
        self.short_fills.len()
    }

    pub fn long_cost_basis(&self) -> f64 {
        finite_or_zero(self.avg_entry_price * self.long_shares() as f64)
    }

    pub fn short_cost_basis(&self) -> f64 {
        finite_or_zero(self.avg_short_price * self.short_shares() as f64)
    }

    pub fn pnl_for(&self, label: &str) -> f64 {
        self.pnl_by_category.get(label).copied().unwrap_or(0.0)
    }

    /// Apply an action in place. Equivalent to `*self = reduce(self, action)`.
    pub fn apply(&mut self, action: &TradeAction) {
        *self = reduce(self, action);
    }
}

impl Default for PaperAccount {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_CASH)
    }
}

/// The account reducer: pure, total, and never failing.
///
/// Invalid attempts (insufficient cash or margin) return the input
/// state unchanged — the UI is expected to prevent them, the reducer is
/// the backstop. Every stored number passes through [`finite_or_zero`]
/// so degenerate arithmetic cannot poison the account.
pub fn reduce(state: &PaperAccount, action: &TradeAction) -> PaperAccount {
    let mut next = state.clone();
    match action {
        TradeAction::SetCategory { label } => {
            next.active_category = label.clone();
        }

        TradeAction::EnterLong { price, shares } => {
            // Affordability is checked against the raw price so a
            // malformed (non-finite) order is rejected, never filled.
            let cost = *price * *shares as f64;
            if *shares == 0 || !cost.is_finite() || state.cash < cost {
                tracing::debug!(price, shares, cash = state.cash, "long entry rejected");
                return next;
            }
            next.cash = finite_or_zero(next.cash - cost);
            next.long_fills
                .extend(std::iter::repeat(*price).take(*shares as usize));
            next.avg_entry_price = ledger_mean(&next.long_fills);
        }

        TradeAction::EnterShort { price, shares } => {
            let notional = *price * *shares as f64;
            let margin_required = notional * SHORT_MARGIN_MULTIPLIER;
            if *shares == 0 || !margin_required.is_finite() || state.cash < margin_required {
                tracing::debug!(price, shares, cash = state.cash, "short entry rejected");
                return next;
            }
            // Short-sale proceeds are credited immediately; the exit
            // debits the cover cost so a breakeven round-trip nets zero.
            next.cash = finite_or_zero(next.cash + notional);
            next.short_fills
                .extend(std::iter::repeat(*price).take(*shares as usize));
            next.avg_short_price = ledger_mean(&next.short_fills);
        }

        TradeAction::Exit { price } => {
            let price = finite_or_zero(*price);
            let long_shares = state.long_shares() as f64;
            let short_shares = state.short_shares() as f64;

            let long_profit = (price - state.avg_entry_price) * long_shares;
            let short_profit = (state.avg_short_price - price) * short_shares;
            let total_profit = finite_or_zero(long_profit + short_profit);

            // Longs liquidate at the exit price; shorts buy to cover.
            next.cash =
                finite_or_zero(next.cash + long_shares * price - short_shares * price);
            next.realized_pnl = finite_or_zero(next.realized_pnl + total_profit);
            next.pnl_total = finite_or_zero(next.pnl_total + total_profit);
            let booked = next
                .pnl_by_category
                .entry(next.active_category.clone())
                .or_insert(0.0);
            *booked = finite_or_zero(*booked + total_profit);

            next.long_fills.clear();
            next.short_fills.clear();
            next.avg_entry_price = 0.0;
            next.avg_short_price = 0.0;
        }

        TradeAction::Mark { price } => {
            let price = finite_or_zero(*price);
            next.mark_value = finite_or_zero(
                next.cash + next.long_shares() as f64 * price
                    - next.short_shares() as f64 * price,
            );
        }
    }
    next
}

/// Running average over a fill ledger; 0 for an empty ledger.
fn ledger_mean(fills: &[f64]) -> f64 {
    finite_or_zero(fills.iter().sum::<f64>() / fills.len() as f64)
}
