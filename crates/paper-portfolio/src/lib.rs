pub mod account;
pub mod action;

pub use account::{reduce, PaperAccount, DEFAULT_STARTING_CASH, SHORT_MARGIN_MULTIPLIER};
pub use action::TradeAction;

#[cfg(test)]
mod tests;
