#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bias_dashboard_wasm::application::gateway::DataFetchGateway;
use bias_dashboard_wasm::domain::{
    analysis::{AggregatedBias, BiasLabel, SymbolInfo, TechnicalIndicators, TimeframeScore},
    chart::{ChartBar, ChartMount, ChartSurface, ChartTheme, ResizeSubscription},
    errors::{AppError, NetworkResult, RenderingResult},
    market_data::{OHLCV, Price, PriceBar, PriceSeries, Symbol, TimeInterval, Timestamp, Volume},
};
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

type Pending<T> = RefCell<Vec<(Symbol, oneshot::Sender<NetworkResult<T>>)>>;

/// Gateway whose responses are released by the test, in any order
#[derive(Default)]
pub struct ScriptedGateway {
    analysis: Pending<AggregatedBias>,
    series: Pending<PriceSeries>,
    pub symbols: RefCell<Vec<SymbolInfo>>,
    pub analysis_calls: Cell<usize>,
    pub series_calls: Cell<usize>,
}

fn settle<T>(pending: &Pending<T>, symbol: &str, result: NetworkResult<T>) {
    let mut pending = pending.borrow_mut();
    let index = pending
        .iter()
        .position(|(s, _)| s.value() == symbol)
        .unwrap_or_else(|| panic!("no pending request for {symbol}"));
    let (_, sender) = pending.remove(index);
    let _ = sender.send(result);
}

impl ScriptedGateway {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn resolve_analysis(&self, symbol: &str, result: NetworkResult<AggregatedBias>) {
        settle(&self.analysis, symbol, result);
    }

    pub fn resolve_series(&self, symbol: &str, result: NetworkResult<PriceSeries>) {
        settle(&self.series, symbol, result);
    }

    pub fn pending_analysis(&self) -> usize {
        self.analysis.borrow().len()
    }

    pub fn pending_series(&self) -> usize {
        self.series.borrow().len()
    }
}

impl DataFetchGateway for ScriptedGateway {
    fn fetch_analysis<'a>(
        &'a self,
        symbol: &'a Symbol,
        _timeframes: &'a [TimeInterval],
    ) -> LocalBoxFuture<'a, NetworkResult<AggregatedBias>> {
        self.analysis_calls.set(self.analysis_calls.get() + 1);
        let (tx, rx) = oneshot::channel();
        self.analysis.borrow_mut().push((symbol.clone(), tx));
        async move { rx.await.unwrap_or_else(|_| Err(AppError::Network("dropped".into()))) }
            .boxed_local()
    }

    fn fetch_price_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        _interval: TimeInterval,
    ) -> LocalBoxFuture<'a, NetworkResult<PriceSeries>> {
        self.series_calls.set(self.series_calls.get() + 1);
        let (tx, rx) = oneshot::channel();
        self.series.borrow_mut().push((symbol.clone(), tx));
        async move { rx.await.unwrap_or_else(|_| Err(AppError::Network("dropped".into()))) }
            .boxed_local()
    }

    fn search_symbols<'a>(
        &'a self,
        query: &'a str,
    ) -> LocalBoxFuture<'a, NetworkResult<Vec<SymbolInfo>>> {
        let list = self.symbols.borrow().clone();
        let query = query.to_string();
        async move {
            Ok(bias_dashboard_wasm::application::filter_symbols(&list, &query)
                .into_iter()
                .cloned()
                .collect())
        }
        .boxed_local()
    }
}

/// Analysis fixture; `grade` doubles as a marker of which request produced it
pub fn analysis(score: f64, grade: &str, bias: BiasLabel) -> AggregatedBias {
    AggregatedBias {
        overall_score: score,
        grade: grade.to_string(),
        bias,
        confidence: 0.7,
        timeframes: vec![TimeframeScore {
            timeframe: "15min".into(),
            score,
            confidence: 0.7,
            indicators: TechnicalIndicators { ema_slope: 0.5, rsi: 61.0, ..Default::default() },
            bias,
        }],
    }
}

pub fn bar(ms: i64, close: f64) -> PriceBar {
    PriceBar::new(
        Timestamp::from_millis(ms),
        OHLCV::new(
            Price::from(close - 0.5),
            Price::from(close + 1.0),
            Price::from(close - 1.0),
            Price::from(close),
            Volume::from(10.0),
        ),
    )
}

/// `count` fifteen-minute bars starting at `base` close
pub fn series(count: usize, base: f64) -> PriceSeries {
    let step = TimeInterval::FifteenMinutes.duration_ms();
    (0..count).map(|i| bar(1_700_000_000_000 + i as i64 * step, base + i as f64)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create { width: u32, height: u32 },
    ApplyWidth(u32),
    SetData(Vec<i64>),
    FitContent,
    Destroy,
    Unsubscribe,
}

pub type CallLog = Rc<RefCell<Vec<SurfaceCall>>>;

/// Container double: width is adjustable and resize callbacks are fired by hand
#[derive(Clone, Default)]
pub struct RecordingMount {
    pub width: Rc<Cell<Option<u32>>>,
    pub calls: CallLog,
    pub resize: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
    pub fail_create: Rc<Cell<bool>>,
}

impl RecordingMount {
    pub fn attached(width: u32) -> Self {
        let mount = Self::default();
        mount.width.set(Some(width));
        mount
    }

    pub fn fire_resize(&self, width: u32) {
        self.width.set(Some(width));
        if let Some(callback) = self.resize.borrow_mut().as_mut() {
            callback();
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, wanted: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| wanted(call)).count()
    }

    pub fn last_data(&self) -> Option<Vec<i64>> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SurfaceCall::SetData(times) => Some(times.clone()),
            _ => None,
        })
    }
}

pub struct RecordingSurface {
    calls: CallLog,
}

impl ChartSurface for RecordingSurface {
    fn apply_width(&mut self, width: u32) {
        self.calls.borrow_mut().push(SurfaceCall::ApplyWidth(width));
    }

    fn set_data(&mut self, bars: &[ChartBar]) {
        self.calls.borrow_mut().push(SurfaceCall::SetData(bars.iter().map(|b| b.time).collect()));
    }

    fn fit_content(&mut self) {
        self.calls.borrow_mut().push(SurfaceCall::FitContent);
    }

    fn destroy(&mut self) {
        self.calls.borrow_mut().push(SurfaceCall::Destroy);
    }
}

pub struct RecordingSubscription {
    calls: CallLog,
    resize: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
}

impl ResizeSubscription for RecordingSubscription {
    fn unsubscribe(self) {
        self.resize.borrow_mut().take();
        self.calls.borrow_mut().push(SurfaceCall::Unsubscribe);
    }
}

impl ChartMount for RecordingMount {
    type Surface = RecordingSurface;
    type Subscription = RecordingSubscription;

    fn container_width(&self) -> Option<u32> {
        self.width.get()
    }

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        _theme: &ChartTheme,
    ) -> RenderingResult<RecordingSurface> {
        if self.fail_create.get() {
            return Err(AppError::Rendering("2D context unavailable".into()));
        }
        self.calls.borrow_mut().push(SurfaceCall::Create { width, height });
        Ok(RecordingSurface { calls: Rc::clone(&self.calls) })
    }

    fn observe_resize(&self, on_resize: Box<dyn FnMut()>) -> RecordingSubscription {
        *self.resize.borrow_mut() = Some(on_resize);
        RecordingSubscription { calls: Rc::clone(&self.calls), resize: Rc::clone(&self.resize) }
    }
}
