use futures::future::LocalBoxFuture;

use crate::domain::{
    analysis::{AggregatedBias, SymbolInfo},
    errors::NetworkResult,
    market_data::{PriceSeries, Symbol, TimeInterval},
};

/// Typed boundary to the remote analysis service.
///
/// Every call is a single attempt; retrying is up to the caller.
/// Futures are `!Send`, the dashboard runs on the browser event loop.
pub trait DataFetchGateway {
    fn fetch_analysis<'a>(
        &'a self,
        symbol: &'a Symbol,
        timeframes: &'a [TimeInterval],
    ) -> LocalBoxFuture<'a, NetworkResult<AggregatedBias>>;

    fn fetch_price_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        interval: TimeInterval,
    ) -> LocalBoxFuture<'a, NetworkResult<PriceSeries>>;

    fn search_symbols<'a>(&'a self, query: &'a str)
    -> LocalBoxFuture<'a, NetworkResult<Vec<SymbolInfo>>>;
}
