use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use replay_core::{Candle, CandleSeries};

/// Candles in a practice session.
pub const PRACTICE_CANDLES: usize = 100;

/// Opening price of a practice random walk.
pub const PRACTICE_BASE_PRICE: f64 = 100.0;

/// Generate a random-walk OHLCV series of five-minute candles.
///
/// Each candle opens near the previous close with 2% volatility, the
/// close lands inside the candle's range, and volume is uniform in
/// 1_000..11_000. Pass a seed for reproducible tests.
pub fn random_walk_series(candles: usize, base_price: f64, seed: Option<u64>) -> CandleSeries {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Utc::now();
    let mut series = CandleSeries::with_capacity(candles);
    let mut price = base_price;

    for i in 0..candles {
        let volatility = price * 0.02;
        let open = price + (rng.gen::<f64>() - 0.5) * volatility;
        let high = open + rng.gen::<f64>() * volatility;
        let low = open - rng.gen::<f64>() * volatility;
        let close = low + rng.gen::<f64>() * (high - low);

        series.push(Candle {
            timestamp: start + Duration::minutes(5 * i as i64),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(1_000..11_000) as f64,
        });

        price = close;
    }

    series
}

/// The default practice-mode series.
pub fn practice_series() -> CandleSeries {
    random_walk_series(PRACTICE_CANDLES, PRACTICE_BASE_PRICE, None)
}
