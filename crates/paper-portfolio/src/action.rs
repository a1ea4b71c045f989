use serde::{Deserialize, Serialize};

/// The discrete trading actions the account reducer understands.
///
/// A closed set, matched exhaustively: there is no string-typed
/// fallthrough, so an unhandled action is a compile error rather than
/// a silently swallowed dispatch. Prices always arrive in the payload,
/// sampled from the visible window by the caller before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeAction {
    /// Tag subsequent realized P&L with this pattern category.
    SetCategory { label: String },
    /// Buy `shares` at `price`; rejected if cash cannot cover the cost.
    EnterLong { price: f64, shares: u32 },
    /// Sell `shares` short at `price`; rejected if cash cannot cover
    /// the 5x margin requirement.
    EnterShort { price: f64, shares: u32 },
    /// Close all long and all short exposure at `price`.
    Exit { price: f64 },
    /// Mark open positions to `price` without realizing anything.
    Mark { price: f64 },
}

impl TradeAction {
    pub fn set_category(label: impl Into<String>) -> Self {
        Self::SetCategory {
            label: label.into(),
        }
    }

    pub fn enter_long(price: f64, shares: u32) -> Self {
        Self::EnterLong { price, shares }
    }

    pub fn enter_short(price: f64, shares: u32) -> Self {
        Self::EnterShort { price, shares }
    }

    pub fn exit(price: f64) -> Self {
        Self::Exit { price }
    }

    pub fn mark(price: f64) -> Self {
        Self::Mark { price }
    }
}
