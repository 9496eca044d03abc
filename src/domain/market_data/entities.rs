pub use super::value_objects::{OHLCV, Price, Timestamp, Volume};
use serde::{Deserialize, Serialize};

/// Domain entity - one bar of the price chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl PriceBar {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }
}

/// Domain entity - price series as delivered by the service.
///
/// Arrival order is not guaranteed; consumers that need time order call
/// [`PriceSeries::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Copy ordered by strictly ascending timestamp.
    ///
    /// Bars sharing a timestamp collapse into the one that arrived last.
    pub fn normalized(&self) -> PriceSeries {
        let mut bars = self.bars.clone();
        // stable: equal timestamps keep arrival order
        bars.sort_by_key(|bar| bar.timestamp);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }
        PriceSeries { bars: deduped }
    }

    pub fn is_strictly_ascending(&self) -> bool {
        self.bars.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp)
    }

    /// Lowest low and highest high across the series
    pub fn price_range(&self) -> Option<(Price, Price)> {
        let first = self.bars.first()?;
        let mut min_price = first.ohlcv.low;
        let mut max_price = first.ohlcv.high;

        for bar in &self.bars {
            if bar.ohlcv.low < min_price {
                min_price = bar.ohlcv.low;
            }
            if bar.ohlcv.high > max_price {
                max_price = bar.ohlcv.high;
            }
        }

        Some((min_price, max_price))
    }

    /// First and last timestamp in time order
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        let min = self.bars.iter().map(|bar| bar.timestamp).min()?;
        let max = self.bars.iter().map(|bar| bar.timestamp).max()?;
        Some((min, max))
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}

impl FromIterator<PriceBar> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceBar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
