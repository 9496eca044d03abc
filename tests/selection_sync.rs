mod common;

use std::cell::RefCell;
use std::rc::Rc;

use bias_dashboard_wasm::application::{
    chart_surface::{ChartLifecycle, ChartSurfaceController},
    selection_sync::{CycleOutcome, DashboardView, SelectionSyncController, SyncSettings},
};
use bias_dashboard_wasm::domain::{
    analysis::{BiasLabel, map_bias_label, visual::format_signed_score},
    chart::ChartConfig,
    errors::AppError,
    market_data::{PriceSeries, Symbol},
};
use common::{RecordingMount, ScriptedGateway, analysis, bar, series};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

type Outcome = Rc<RefCell<Option<CycleOutcome>>>;

struct Harness {
    pool: LocalPool,
    gateway: Rc<ScriptedGateway>,
    sync: SelectionSyncController<ScriptedGateway>,
    published: Rc<RefCell<Vec<Rc<DashboardView>>>>,
}

impl Harness {
    fn new() -> Self {
        let gateway = ScriptedGateway::new();
        let sync = SelectionSyncController::new(
            Rc::clone(&gateway),
            SyncSettings::default(),
            Symbol::from("IBM"),
        );
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&published);
        sync.subscribe(move |view| sink.borrow_mut().push(Rc::clone(view)));
        Self { pool: LocalPool::new(), gateway, sync, published }
    }

    fn select(&mut self, symbol: &str) -> Outcome {
        let sync = self.sync.clone();
        let symbol = Symbol::from(symbol);
        self.spawn(async move { sync.select(symbol).await })
    }

    fn refresh(&mut self) -> Outcome {
        let sync = self.sync.clone();
        self.spawn(async move { sync.refresh().await })
    }

    fn spawn(&mut self, cycle: impl std::future::Future<Output = CycleOutcome> + 'static) -> Outcome {
        let slot: Outcome = Rc::new(RefCell::new(None));
        let out = Rc::clone(&slot);
        self.pool
            .spawner()
            .spawn_local(async move {
                *out.borrow_mut() = Some(cycle.await);
            })
            .unwrap();
        self.pool.run_until_stalled();
        slot
    }

    fn run(&mut self) {
        self.pool.run_until_stalled();
    }
}

fn outcome(slot: &Outcome) -> CycleOutcome {
    slot.borrow().clone().expect("cycle has not settled")
}

#[test]
fn initial_load_shows_both_datasets() {
    let mut h = Harness::new();
    let cycle = h.select("IBM");

    let view = h.sync.view();
    assert!(view.loading);
    assert_eq!(view.error, None);

    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.run();
    assert!(cycle.borrow().is_none(), "settles only after both requests");

    h.gateway.resolve_series("IBM", Ok(series(50, 140.0)));
    h.run();

    assert_eq!(outcome(&cycle), CycleOutcome::Applied);
    assert!(outcome(&cycle).was_applied());
    let view = h.sync.view();
    assert!(view.is_current());
    assert!(!view.loading);
    assert_eq!(view.error, None);

    let bias = view.analysis.as_ref().unwrap();
    assert_eq!(format_signed_score(bias.overall_score), "+42");
    assert_eq!(bias.grade, "B");
    assert_eq!(map_bias_label(bias.bias).color_class, "text-green-500");
    assert_eq!(view.series.len(), 50);
    assert!(view.series.is_strictly_ascending());
}

#[test]
fn both_requests_are_issued_together() {
    let mut h = Harness::new();
    let _cycle = h.refresh();
    assert_eq!(h.gateway.pending_analysis(), 1);
    assert_eq!(h.gateway.pending_series(), 1);
}

#[test]
fn stale_result_arriving_last_is_dropped() {
    let mut h = Harness::new();
    let first = h.select("AAPL");
    let second = h.select("MSFT");

    h.gateway.resolve_analysis("MSFT", Ok(analysis(-30.0, "MSFT", BiasLabel::Bearish)));
    h.gateway.resolve_series("MSFT", Ok(series(10, 300.0)));
    h.run();
    assert_eq!(outcome(&second), CycleOutcome::Applied);

    h.gateway.resolve_analysis("AAPL", Ok(analysis(80.0, "AAPL", BiasLabel::Bullish)));
    h.gateway.resolve_series("AAPL", Ok(series(20, 180.0)));
    h.run();
    assert_eq!(outcome(&first), CycleOutcome::Superseded);
    assert!(!outcome(&first).was_applied());

    let view = h.sync.view();
    assert_eq!(view.selection.value(), "MSFT");
    assert_eq!(view.analysis.as_ref().unwrap().grade, "MSFT");
    assert_eq!(view.series.len(), 10);
}

#[test]
fn stale_result_arriving_first_is_never_published() {
    let mut h = Harness::new();
    let first = h.select("AAPL");
    let second = h.select("MSFT");

    h.gateway.resolve_analysis("AAPL", Ok(analysis(80.0, "AAPL", BiasLabel::Bullish)));
    h.gateway.resolve_series("AAPL", Ok(series(20, 180.0)));
    h.run();
    assert_eq!(outcome(&first), CycleOutcome::Superseded);
    assert!(h.sync.view().loading, "newer cycle still in flight");

    h.gateway.resolve_analysis("MSFT", Ok(analysis(-30.0, "MSFT", BiasLabel::Bearish)));
    h.gateway.resolve_series("MSFT", Ok(series(10, 300.0)));
    h.run();
    assert_eq!(outcome(&second), CycleOutcome::Applied);

    let ever_shown_aapl = h
        .published
        .borrow()
        .iter()
        .any(|view| view.analysis.as_ref().is_some_and(|a| a.grade == "AAPL"));
    assert!(!ever_shown_aapl);
}

#[test]
fn failed_analysis_keeps_chart_and_reports_error() {
    let mut h = Harness::new();
    let cycle = h.select("XYZ");

    h.gateway.resolve_analysis("XYZ", Err(AppError::Network("connection refused".into())));
    h.gateway.resolve_series("XYZ", Ok(series(12, 5.0)));
    h.run();

    let view = h.sync.view();
    assert!(matches!(outcome(&cycle), CycleOutcome::PartiallyApplied { .. }));
    assert!(!view.loading);
    assert_eq!(
        view.error.as_deref(),
        Some("Unable to reach the analysis service: connection refused")
    );
    assert!(view.analysis.is_none());
    assert_eq!(view.series.len(), 12);
}

#[test]
fn failed_slot_keeps_previous_data_of_same_symbol() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.gateway.resolve_series("IBM", Ok(series(5, 100.0)));
    h.run();

    let cycle = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(10.0, "C", BiasLabel::Neutral)));
    h.gateway.resolve_series("IBM", Err(AppError::Remote { status: 503, message: String::new() }));
    h.run();

    assert!(matches!(outcome(&cycle), CycleOutcome::PartiallyApplied { .. }));
    let view = h.sync.view();
    assert_eq!(view.analysis.as_ref().unwrap().grade, "C");
    assert_eq!(view.series.len(), 5, "last good series of the same symbol stays");
    assert_eq!(view.error.as_deref(), Some("The analysis service returned HTTP 503"));
}

#[test]
fn failed_slot_never_shows_previous_symbol() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.gateway.resolve_series("IBM", Ok(series(5, 100.0)));
    h.run();

    let _ = h.select("TSLA");
    h.gateway.resolve_analysis("TSLA", Ok(analysis(-5.0, "TSLA", BiasLabel::Neutral)));
    h.gateway.resolve_series("TSLA", Err(AppError::Network("offline".into())));
    h.run();

    let view = h.sync.view();
    assert_eq!(view.data_symbol.as_ref().map(Symbol::value), Some("TSLA"));
    assert!(view.series.is_empty());
}

#[test]
fn both_failures_report_analysis_first() {
    let mut h = Harness::new();
    let cycle = h.refresh();
    h.gateway.resolve_series("IBM", Err(AppError::Remote { status: 500, message: String::new() }));
    h.gateway.resolve_analysis("IBM", Err(AppError::Decode("missing grade".into())));
    h.run();

    let expected = "Unexpected response from the analysis service: missing grade; \
                    The analysis service returned HTTP 500";
    assert_eq!(outcome(&cycle), CycleOutcome::Failed { error: expected.to_string() });
    assert_eq!(h.sync.view().error.as_deref(), Some(expected));
}

#[test]
fn next_cycle_clears_error() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Err(AppError::Network("offline".into())));
    h.gateway.resolve_series("IBM", Err(AppError::Network("offline".into())));
    h.run();
    assert!(h.sync.view().error.is_some());

    let _ = h.refresh();
    let view = h.sync.view();
    assert!(view.loading);
    assert!(view.error.is_none());
}

#[test]
fn detach_drops_results_in_flight() {
    let mut h = Harness::new();
    let cycle = h.select("AMD");
    let published_before = h.published.borrow().len();

    h.sync.detach();
    assert!(!h.sync.is_attached());
    h.gateway.resolve_analysis("AMD", Ok(analysis(12.0, "AMD", BiasLabel::Neutral)));
    h.gateway.resolve_series("AMD", Ok(series(3, 90.0)));
    h.run();

    assert_eq!(outcome(&cycle), CycleOutcome::Detached);
    assert!(h.sync.view().analysis.is_none());
    assert_eq!(h.published.borrow().len(), published_before);

    let after = h.refresh();
    assert_eq!(outcome(&after), CycleOutcome::Detached);
    assert_eq!(h.gateway.pending_analysis(), 0, "no request after detach");
}

#[test]
fn reselecting_same_symbol_behaves_like_refresh() {
    let mut h = Harness::new();
    let _ = h.select("IBM");
    let _ = h.select("IBM");
    assert_eq!(h.sync.generation(), 2);
    assert_eq!(h.gateway.analysis_calls.get(), 2);
    assert_eq!(h.sync.selection().value(), "IBM");
}

#[test]
fn listeners_see_loading_then_result() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(1.0, "C", BiasLabel::Neutral)));
    h.gateway.resolve_series("IBM", Ok(series(2, 1.0)));
    h.run();

    let loading: Vec<bool> = h.published.borrow().iter().map(|v| v.loading).collect();
    assert_eq!(loading, vec![true, false]);
    let generations: Vec<u64> = h.published.borrow().iter().map(|v| v.generation).collect();
    assert_eq!(generations, vec![1, 1]);
}

#[test]
fn switching_symbol_clears_previous_data_while_loading() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.gateway.resolve_series("IBM", Ok(series(50, 140.0)));
    h.run();

    let _ = h.select("TSLA");
    let view = h.sync.view();
    assert!(view.loading);
    assert_eq!(view.selection.value(), "TSLA");
    assert_eq!(view.data_symbol, None);
    assert!(view.analysis.is_none());
    assert!(view.series.is_empty());

    let mixed = h
        .published
        .borrow()
        .iter()
        .any(|view| view.data_symbol.as_ref().is_some_and(|data| *data != view.selection));
    assert!(!mixed);
}

#[test]
fn refresh_keeps_current_data_while_loading() {
    let mut h = Harness::new();
    let _ = h.refresh();
    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.gateway.resolve_series("IBM", Ok(series(50, 140.0)));
    h.run();

    let _ = h.refresh();
    let view = h.sync.view();
    assert!(view.loading);
    assert!(view.is_current());
    assert_eq!(view.series.len(), 50);
}

#[test]
fn shuffled_series_reaches_chart_in_ascending_order() {
    let mut h = Harness::new();
    let mount = RecordingMount::attached(800);
    let chart = Rc::new(ChartSurfaceController::new(mount.clone(), ChartConfig::default()));
    chart.on_attach().unwrap();

    let sink = Rc::clone(&chart);
    h.sync.subscribe(move |view| sink.on_data_changed(Rc::clone(&view.series)));

    let cycle = h.select("IBM");
    let shuffled = PriceSeries::new(vec![
        bar(1_700_001_800_000, 3.0),
        bar(1_700_000_000_000, 1.0),
        bar(1_700_000_900_000, 2.0),
        bar(1_700_000_000_000, 1.5),
    ]);
    h.gateway.resolve_analysis("IBM", Ok(analysis(42.0, "B", BiasLabel::Bullish)));
    h.gateway.resolve_series("IBM", Ok(shuffled));
    h.run();

    assert_eq!(outcome(&cycle), CycleOutcome::Applied);
    assert_eq!(
        mount.last_data(),
        Some(vec![1_700_000_000, 1_700_000_900, 1_700_001_800])
    );
    assert_eq!(chart.lifecycle(), ChartLifecycle::Populated { bar_count: 3 });
}
