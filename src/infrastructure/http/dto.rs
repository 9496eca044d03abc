//! Wire formats of the analysis service.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::{AppError, NetworkResult},
    logging::LogComponent,
    market_data::{OHLCV, Price, PriceBar, PriceSeries, Symbol, TimeInterval, Timestamp, Volume},
};
use crate::log_warn;

/// Body of `POST /analysis`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest<'a> {
    pub symbol: &'a str,
    pub timeframes: Vec<&'a str>,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(symbol: &'a Symbol, timeframes: &'a [TimeInterval]) -> Self {
        Self {
            symbol: symbol.value(),
            timeframes: timeframes.iter().map(TimeInterval::wire_label).collect(),
        }
    }
}

/// One element of the `GET /chart/{symbol}` array
#[derive(Debug, Clone, Deserialize)]
pub struct PriceBarDto {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PriceBarDto {
    pub fn to_domain(&self) -> NetworkResult<PriceBar> {
        let millis = parse_timestamp_millis(&self.timestamp).ok_or_else(|| {
            AppError::Decode(format!("invalid bar timestamp '{}'", self.timestamp))
        })?;

        Ok(PriceBar::new(
            Timestamp::from_millis(millis),
            OHLCV::new(
                Price::from(self.open),
                Price::from(self.high),
                Price::from(self.low),
                Price::from(self.close),
                Volume::from(self.volume),
            ),
        ))
    }
}

/// Convert a decoded chart payload. Order is left as received.
pub fn price_series_from_dtos(dtos: &[PriceBarDto]) -> NetworkResult<PriceSeries> {
    let bars = dtos.iter().map(PriceBarDto::to_domain).collect::<NetworkResult<Vec<_>>>()?;

    let malformed = bars.iter().filter(|bar| !bar.ohlcv.is_valid()).count();
    if malformed > 0 {
        log_warn!(
            LogComponent::Infrastructure("ChartDto"),
            "⚠️ {} of {} bars have an inconsistent OHLC envelope",
            malformed,
            bars.len()
        );
    }
    Ok(PriceSeries::new(bars))
}

/// RFC 3339, or a zone-less date/time read as UTC.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    if let Some(dt) = NAIVE_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok()) {
        return Some(dt.and_utc().timestamp_millis());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Error body some routes return alongside a non-2xx status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "message")]
    pub error: String,
}
