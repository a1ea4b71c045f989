use anyhow::{Context, Result};
use paper_portfolio::{PaperAccount, TradeAction};
use pattern_client::{synthetic, PatternClient};
use playback_engine::{PlaybackConfig, PlaybackEngine};
use replay_core::{PatternKind, SeriesStore};

/// Terminal replay session: fetch or generate a series, play it back at
/// full speed, run one scripted long round-trip, and print the account.
///
/// Environment:
///   REPLAY_MODE     "practice" (synthetic, default) or "pattern"
///   REPLAY_PATTERN  pattern label for pattern mode (default "random")
///   PATTERN_API_URL data service base URL
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mode = std::env::var("REPLAY_MODE").unwrap_or_else(|_| "practice".to_string());
    let store = SeriesStore::new();

    let config = if mode == "pattern" {
        let kind = std::env::var("REPLAY_PATTERN")
            .ok()
            .and_then(|raw| parse_pattern(&raw))
            .unwrap_or(PatternKind::Random);
        let client = PatternClient::new();
        let pick = client
            .fetch_pattern(kind)
            .await
            .with_context(|| format!("fetching a {kind} pattern"))?;
        tracing::info!(symbol = %pick.symbol, as_of = %pick.as_of, "pattern picked");
        let series = client
            .fetch_price_series(&pick.symbol, &pick.as_of, false)
            .await
            .with_context(|| format!("fetching prices for {}", pick.symbol))?;
        store.load(series);
        PlaybackConfig::pattern_replay()
    } else {
        store.load(synthetic::practice_series());
        PlaybackConfig::practice()
    };

    let engine = PlaybackEngine::new(config);
    let mut windows = engine.subscribe();
    let (series, _generation) = store.snapshot();
    engine.load_series((*series).clone());

    let mut account = PaperAccount::default();
    account.apply(&TradeAction::set_category(mode.clone()));

    // Replay as fast as the clamp allows.
    while engine.set_speed(true).as_millis() > config.min_period_ms as u128 {}
    engine.start();

    let entry_at = config.initial_window + 5;
    let mut entered = false;

    while windows.changed().await.is_ok() {
        let window = windows.borrow_and_update().clone();
        let Some(price) = window.last_close() else {
            continue;
        };
        account.apply(&TradeAction::mark(price));

        if !entered && window.revealed() >= entry_at {
            account.apply(&TradeAction::enter_long(price, 1));
            entered = true;
            tracing::info!(price, revealed = window.revealed(), "entered long");
        }

        if window.is_exhausted() {
            account.apply(&TradeAction::exit(price));
            account.apply(&TradeAction::mark(price));
            break;
        }
    }

    engine.stop();

    println!("cash:          {:>12.2}", account.cash);
    println!("mark value:    {:>12.2}", account.mark_value);
    println!("realized P&L:  {:>12.2}", account.realized_pnl);
    for (category, pnl) in &account.pnl_by_category {
        println!("  {category:<14} {pnl:>10.2}");
    }
    Ok(())
}

fn parse_pattern(raw: &str) -> Option<PatternKind> {
    PatternKind::all()
        .iter()
        .copied()
        .find(|kind| kind.label() == raw)
}
