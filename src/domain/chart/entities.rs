use crate::domain::market_data::{PriceBar, PriceSeries};

/// One candle in the unit the chart engine consumes: time in whole seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl ChartBar {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

impl From<&PriceBar> for ChartBar {
    fn from(bar: &PriceBar) -> Self {
        Self {
            time: bar.timestamp.as_seconds(),
            open: bar.ohlcv.open.value(),
            high: bar.ohlcv.high.value(),
            low: bar.ohlcv.low.value(),
            close: bar.ohlcv.close.value(),
        }
    }
}

/// Dataset handed to the chart engine: strictly ascending by `time`.
pub fn chart_bars(series: &PriceSeries) -> Vec<ChartBar> {
    let mut bars: Vec<ChartBar> = series.normalized().bars().iter().map(ChartBar::from).collect();
    // two bars inside the same second collapse like equal millisecond timestamps do
    bars.dedup_by(|later, earlier| {
        if later.time == earlier.time {
            *earlier = *later;
            true
        } else {
            false
        }
    });
    bars
}

/// Time window the chart shows, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub from: i64,
    pub to: i64,
}

impl VisibleRange {
    /// Range covering every bar, `None` for an empty dataset
    pub fn fit(bars: &[ChartBar]) -> Option<Self> {
        Some(Self { from: bars.first()?.time, to: bars.last()?.time })
    }

    pub fn span(&self) -> i64 {
        self.to - self.from
    }

    pub fn contains(&self, time: i64) -> bool {
        (self.from..=self.to).contains(&time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{OHLCV, Price, Timestamp, Volume};

    fn bar(ms: i64, close: f64) -> PriceBar {
        PriceBar::new(
            Timestamp::from_millis(ms),
            OHLCV::new(
                Price::from(close),
                Price::from(close + 1.0),
                Price::from(close - 1.0),
                Price::from(close),
                Volume::from(1.0),
            ),
        )
    }

    #[test]
    fn chart_bars_are_ascending_seconds() {
        let series = PriceSeries::new(vec![bar(120_000, 2.0), bar(60_000, 1.0)]);
        let bars = chart_bars(&series);
        assert_eq!(bars.iter().map(|b| b.time).collect::<Vec<_>>(), vec![60, 120]);
    }

    #[test]
    fn sub_second_duplicates_keep_latest() {
        let series = PriceSeries::new(vec![bar(1_000, 1.0), bar(1_400, 4.0)]);
        let bars = chart_bars(&series);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 4.0);
    }

    #[test]
    fn fit_covers_first_to_last() {
        let series = PriceSeries::new(vec![bar(5_000, 1.0), bar(1_000, 1.0), bar(3_000, 1.0)]);
        let range = VisibleRange::fit(&chart_bars(&series)).unwrap();
        assert_eq!(range, VisibleRange { from: 1, to: 5 });
        assert!(VisibleRange::fit(&[]).is_none());
    }
}
