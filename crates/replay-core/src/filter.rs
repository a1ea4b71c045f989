use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::{Candle, CandleSeries};

/// One upstream price row as the data service returns it.
///
/// Fields other than the date are optional: feeds occasionally emit
/// rows with holes, and those rows are dropped (or, for volume,
/// defaulted) by [`filter_trading_days`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Compact an upstream series down to usable trading-day candles.
///
/// Pure and order-preserving. A row survives only if its date parses,
/// falls on a weekday, and carries a finite open/high/low/close.
/// Missing volume defaults to 0.
pub fn filter_trading_days(records: &[RawRecord]) -> CandleSeries {
    let mut series = CandleSeries::with_capacity(records.len());

    for record in records {
        let timestamp = match parse_timestamp(&record.date) {
            Some(ts) => ts,
            None => continue,
        };
        if matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let fields = [record.open, record.high, record.low, record.close];
        if fields.iter().any(|f| !f.is_some_and(f64::is_finite)) {
            continue;
        }

        series.push(Candle {
            timestamp,
            open: record.open.unwrap_or(0.0),
            high: record.high.unwrap_or(0.0),
            low: record.low.unwrap_or(0.0),
            close: record.close.unwrap_or(0.0),
            volume: record.volume.filter(|v| v.is_finite()).unwrap_or(0.0),
        });
    }

    series
}

/// Parse the date formats the data service emits: RFC 3339 for
/// intraday rows, `YYYY-MM-DD HH:MM:SS` or bare `YYYY-MM-DD` for
/// daily rows.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
