use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::logging::LogComponent;
use crate::log_warn;

/// Raw indicator readings behind one timeframe score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    pub ema: f64,
    pub ema_slope: f64,
    pub rsi: f64,
    pub rsi_momentum: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub macd_hist_slope: f64,
    pub supertrend: f64,
    pub supertrend_direction: f64,
    pub adx: f64,
    pub atr: f64,
}

impl TechnicalIndicators {
    pub fn ema_rising(&self) -> bool {
        self.ema_slope > 0.0
    }

    pub fn rsi_above_midline(&self) -> bool {
        self.rsi > 50.0
    }

    pub fn macd_hist_positive(&self) -> bool {
        self.macd_hist > 0.0
    }

    pub fn supertrend_up(&self) -> bool {
        self.supertrend_direction > 0.0
    }
}

/// Directional category assigned by the analysis service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, StrumDisplay, EnumString,
    AsRefStr, EnumIter,
)]
pub enum BiasLabel {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl BiasLabel {
    /// Unknown labels are a contract violation upstream and degrade to Neutral.
    pub fn from_str_lossy(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            log_warn!(
                LogComponent::Domain("Analysis"),
                "⚠️ Unknown bias label '{}', rendering as Neutral",
                raw
            );
            BiasLabel::Neutral
        })
    }
}

impl<'de> Deserialize<'de> for BiasLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(BiasLabel::from_str_lossy).unwrap_or_default())
    }
}

/// Score of a single timeframe, score in [-100, 100], confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeScore {
    pub timeframe: String,
    pub score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub indicators: TechnicalIndicators,
    #[serde(default)]
    pub bias: BiasLabel,
}

/// Multi-timeframe result for one symbol. Replaced as a whole on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedBias {
    pub overall_score: f64,
    pub grade: String,
    #[serde(default)]
    pub bias: BiasLabel,
    pub confidence: f64,
    #[serde(default)]
    pub timeframes: Vec<TimeframeScore>,
}

impl AggregatedBias {
    pub fn timeframe(&self, label: &str) -> Option<&TimeframeScore> {
        self.timeframes.iter().find(|tf| tf.timeframe == label)
    }
}

/// Entry of the symbol search list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
}
