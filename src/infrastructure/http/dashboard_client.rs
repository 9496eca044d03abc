use futures::future::{FutureExt, LocalBoxFuture};

use super::dto::{AnalysisRequest, PriceBarDto, price_series_from_dtos};
use super::{GlooHttpClient, HttpUtils};
use crate::application::gateway::DataFetchGateway;
use crate::domain::{
    analysis::{AggregatedBias, SymbolInfo},
    errors::NetworkResult,
    logging::{LogComponent, get_logger},
    market_data::{PriceSeries, Symbol, TimeInterval},
};
use crate::infrastructure::config::ApiConfig;

/// Client for the bias analysis service routes
#[derive(Debug, Clone)]
pub struct DashboardApiClient {
    http: GlooHttpClient,
}

impl DashboardApiClient {
    pub fn new(config: ApiConfig) -> Self {
        get_logger().info(
            LogComponent::Infrastructure("DashboardApi"),
            &format!("🔗 Analysis service at {}", config.base_url),
        );
        Self { http: GlooHttpClient::new(config) }
    }

    pub async fn get_analysis(
        &self,
        symbol: &Symbol,
        timeframes: &[TimeInterval],
    ) -> NetworkResult<AggregatedBias> {
        get_logger().info(
            LogComponent::Infrastructure("DashboardApi"),
            &format!("📡 Fetching analysis for {} ({} timeframes)", symbol, timeframes.len()),
        );
        self.http.post_json("analysis", &AnalysisRequest::new(symbol, timeframes)).await
    }

    pub async fn get_chart_data(
        &self,
        symbol: &Symbol,
        interval: TimeInterval,
    ) -> NetworkResult<PriceSeries> {
        let endpoint = HttpUtils::build_url_with_params(
            &format!("chart/{}", HttpUtils::url_encode(symbol.value())),
            &[("interval", interval.wire_label())],
        );
        let dtos: Vec<PriceBarDto> = self.http.get_json(&endpoint).await?;
        let series = price_series_from_dtos(&dtos)?;

        get_logger().info(
            LogComponent::Infrastructure("DashboardApi"),
            &format!("✅ Received {} bars for {}-{}", series.len(), symbol, interval),
        );
        Ok(series)
    }

    pub async fn get_symbols(&self, query: &str) -> NetworkResult<Vec<SymbolInfo>> {
        let endpoint = HttpUtils::build_url_with_params("symbols/search", &[("query", query)]);
        self.http.get_json(&endpoint).await
    }

    pub async fn health_check(&self) -> bool {
        self.http.health_check("health").await
    }
}

impl Default for DashboardApiClient {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl DataFetchGateway for DashboardApiClient {
    fn fetch_analysis<'a>(
        &'a self,
        symbol: &'a Symbol,
        timeframes: &'a [TimeInterval],
    ) -> LocalBoxFuture<'a, NetworkResult<AggregatedBias>> {
        self.get_analysis(symbol, timeframes).boxed_local()
    }

    fn fetch_price_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        interval: TimeInterval,
    ) -> LocalBoxFuture<'a, NetworkResult<PriceSeries>> {
        self.get_chart_data(symbol, interval).boxed_local()
    }

    fn search_symbols<'a>(
        &'a self,
        query: &'a str,
    ) -> LocalBoxFuture<'a, NetworkResult<Vec<SymbolInfo>>> {
        self.get_symbols(query).boxed_local()
    }
}
