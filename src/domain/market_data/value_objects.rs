use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - Price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - Volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - Timestamp in milliseconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Deref, Constructor,
    Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_millis(value: i64) -> Self {
        Self(value)
    }

    /// Whole seconds, the unit the chart time axis works in
    pub fn as_seconds(&self) -> i64 {
        self.0.div_euclid(1000)
    }
}

/// Value Object - OHLCV
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    /// High/low envelope the open and close, volume is non-negative
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.volume.value() >= 0.0
    }
}

/// Value Object - instrument identifier, the dashboard's selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::from(DEFAULT_SYMBOL)
    }
}

/// Selection shown when the dashboard mounts
pub const DEFAULT_SYMBOL: &str = "IBM";

/// Value Object - time granularity, shared by analysis timeframes and the chart interval
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum TimeInterval {
    #[strum(to_string = "1min")]
    #[serde(rename = "1min")]
    OneMinute,

    #[strum(to_string = "5min")]
    #[serde(rename = "5min")]
    FiveMinutes,

    #[strum(to_string = "15min")]
    #[serde(rename = "15min")]
    FifteenMinutes,

    #[strum(to_string = "30min")]
    #[serde(rename = "30min")]
    ThirtyMinutes,

    #[strum(to_string = "1hour", serialize = "60min")]
    #[serde(rename = "1hour", alias = "60min")]
    OneHour,

    #[strum(to_string = "4hour", serialize = "4h")]
    #[serde(rename = "4hour", alias = "4h")]
    FourHours,

    #[strum(to_string = "1day", serialize = "1D", serialize = "daily")]
    #[serde(rename = "1day", alias = "1D", alias = "daily")]
    OneDay,

    #[strum(to_string = "1week", serialize = "1W", serialize = "weekly")]
    #[serde(rename = "1week", alias = "1W", alias = "weekly")]
    OneWeek,
}

impl TimeInterval {
    /// Label the remote service understands
    pub fn wire_label(&self) -> &str {
        self.as_ref()
    }

    /// Compact label for table headers
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1H",
            Self::FourHours => "4H",
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
        }
    }

    pub fn duration_ms(&self) -> i64 {
        match self {
            Self::OneMinute => 60 * 1000,
            Self::FiveMinutes => 5 * 60 * 1000,
            Self::FifteenMinutes => 15 * 60 * 1000,
            Self::ThirtyMinutes => 30 * 60 * 1000,
            Self::OneHour => 60 * 60 * 1000,
            Self::FourHours => 4 * 60 * 60 * 1000,
            Self::OneDay => 24 * 60 * 60 * 1000,
            Self::OneWeek => 7 * 24 * 60 * 60 * 1000,
        }
    }
}

/// Timeframes requested from the analysis service, in display order
pub const DEFAULT_TIMEFRAMES: [TimeInterval; 5] = [
    TimeInterval::FifteenMinutes,
    TimeInterval::OneHour,
    TimeInterval::FourHours,
    TimeInterval::OneDay,
    TimeInterval::OneWeek,
];

/// Granularity of the price chart
pub const DEFAULT_CHART_INTERVAL: TimeInterval = TimeInterval::FifteenMinutes;

/// Short display label for a timeframe string as returned by the service.
/// Unknown labels are shown verbatim.
pub fn format_timeframe(raw: &str) -> String {
    raw.parse::<TimeInterval>()
        .map(|interval| interval.short_label().to_string())
        .unwrap_or_else(|_| raw.to_string())
}
