use std::rc::Rc;

use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::{
    application::selection_sync::{DashboardView, SelectionSyncController, SyncSettings},
    domain::{
        logging::{LogComponent, get_logger},
        market_data::Symbol,
    },
    infrastructure::{ApiConfig, DashboardApiClient},
    presentation::{BiasMatrix, ChartPanel, SymbolSelector},
};

type DashboardSync = SelectionSyncController<DashboardApiClient>;

const STYLES: &str = r#"
body { margin: 0; background: #030712; }
.dashboard {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    color: #f9fafb;
    min-height: 100vh;
    padding: 24px;
    max-width: 1280px;
    margin: 0 auto;
}
.header { display: flex; align-items: center; justify-content: space-between; margin-bottom: 16px; }
.header h1 { font-size: 28px; margin: 0; }
.header-actions { display: flex; align-items: center; gap: 12px; }
.status-dot { width: 10px; height: 10px; border-radius: 50%; background: #6b7280; display: inline-block; }
.status-dot.up { background: #22c55e; }
.status-dot.down { background: #ef4444; }
.refresh-btn {
    display: flex; align-items: center; gap: 8px;
    padding: 8px 16px; border: none; border-radius: 8px;
    background: #2563eb; color: white; cursor: pointer;
}
.refresh-btn:disabled { opacity: 0.5; cursor: not-allowed; }
.animate-spin { animation: spin 1s linear infinite; }
.animate-pulse { animation: pulse 2s ease-in-out infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
@keyframes pulse { 50% { opacity: 0.5; } }
.symbol-selector { position: relative; max-width: 420px; margin-bottom: 24px; }
.symbol-selector input {
    width: 100%; box-sizing: border-box; padding: 8px 12px;
    background: #1f2937; color: white; border: 1px solid #374151; border-radius: 8px;
}
.dropdown {
    position: absolute; z-index: 10; width: 100%; margin-top: 8px; max-height: 240px; overflow-y: auto;
    background: #1f2937; border: 1px solid #374151; border-radius: 8px;
}
.dropdown-backdrop { position: fixed; inset: 0; z-index: 5; }
.dropdown-item {
    display: flex; justify-content: space-between; width: 100%;
    padding: 8px 16px; background: none; border: none; color: white; cursor: pointer;
}
.dropdown-item:hover, .dropdown-item.selected { background: #374151; }
.dropdown-note { padding: 16px; text-align: center; color: #9ca3af; }
.error-banner { margin-bottom: 24px; padding: 16px; background: rgba(127, 29, 29, 0.5); border: 1px solid #b91c1c; border-radius: 8px; color: #f87171; }
.content { display: grid; gap: 24px; }
.panel { background: #111827; border-radius: 8px; padding: 24px; }
.chart-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
.chart-header h2 { margin: 0; font-size: 20px; }
.chart-wrapper { position: relative; min-height: 500px; }
.chart-container { width: 100%; }
.chart-overlay { position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; }
.spinner { width: 40px; height: 40px; border: 4px solid #3b82f6; border-top-color: transparent; border-radius: 50%; }
.skeleton { background: #374151; border-radius: 6px; }
.skeleton-title { height: 32px; width: 33%; margin-bottom: 16px; }
.skeleton-body { height: 256px; }
.empty-state { text-align: center; color: #9ca3af; padding: 48px 0; }
.matrix-header { border-bottom: 1px solid #374151; padding-bottom: 16px; margin-bottom: 24px; }
.matrix-header h2 { margin: 0 0 8px; font-size: 24px; }
.matrix-summary { display: flex; align-items: center; gap: 24px; }
.bias-label { display: flex; align-items: center; gap: 4px; }
.matrix-table { width: 100%; font-size: 14px; border-collapse: collapse; }
.matrix-table th { color: #9ca3af; font-weight: 500; padding: 0 8px 12px; text-align: center; }
.matrix-table td { padding: 12px 8px; text-align: center; border-top: 1px solid #1f2937; }
.score-chip { padding: 4px 12px; border-radius: 4px; font-weight: 600; color: white; }
.confidence { display: flex; align-items: center; justify-content: center; gap: 8px; }
.confidence-track { width: 64px; height: 8px; background: #374151; border-radius: 9999px; }
.confidence-fill { height: 8px; background: #3b82f6; border-radius: 9999px; }
.matrix-legend { margin-top: 24px; padding-top: 16px; border-top: 1px solid #374151; font-size: 12px; color: #6b7280; }
.footer { margin-top: 32px; text-align: center; font-size: 14px; color: #6b7280; }
.text-left { text-align: left; }
.text-sm { font-size: 14px; }
.text-xs { font-size: 12px; }
.text-xl { font-size: 20px; }
.font-bold { font-weight: 700; }
.font-semibold { font-weight: 600; }
.text-muted { color: #9ca3af; }
.text-green-400 { color: #4ade80; }
.text-green-500 { color: #22c55e; }
.text-red-400 { color: #f87171; }
.text-red-500 { color: #ef4444; }
.text-gray-400 { color: #9ca3af; }
.bg-green-400 { background: #4ade80; }
.bg-green-500 { background: #22c55e; }
.bg-green-600 { background: #16a34a; }
.bg-red-400 { background: #f87171; }
.bg-red-500 { background: #ef4444; }
.bg-red-600 { background: #dc2626; }
.bg-gray-600 { background: #4b5563; }
"#;

#[component]
pub fn App() -> impl IntoView {
    let client = Rc::new(DashboardApiClient::new(ApiConfig::default()));
    let settings = SyncSettings::default();
    let chart_interval = settings.chart_interval;
    let sync: DashboardSync = SelectionSyncController::new(Rc::clone(&client), settings, Symbol::default());

    let view_state = create_rw_signal::<Rc<DashboardView>>(sync.view());
    sync.subscribe(move |view| view_state.set(Rc::clone(view)));

    let sync = store_value(sync);
    on_cleanup(move || sync.with_value(|sync| sync.detach()));

    let refresh = move || {
        let sync = sync.get_value();
        spawn_local(async move {
            sync.refresh().await;
        });
    };
    let on_select = Callback::new(move |symbol: Symbol| {
        get_logger().info(LogComponent::Presentation("App"), &format!("🔎 Selected {}", symbol));
        let sync = sync.get_value();
        spawn_local(async move {
            sync.select(symbol).await;
        });
    });

    refresh();

    let selection = Signal::derive(move || view_state.with(|v| v.selection.clone()));
    let loading = Signal::derive(move || view_state.with(|v| v.loading));
    let error = Signal::derive(move || view_state.with(|v| v.error.clone()));
    let analysis = Signal::derive(move || view_state.with(|v| v.analysis.clone()));
    let series = Signal::derive(move || view_state.with(|v| Rc::clone(&v.series)));

    view! {
        <style>{STYLES}</style>
        <main class="dashboard">
            <Header client=Rc::clone(&client) loading=loading on_refresh=Callback::new(move |_| refresh())/>
            <SymbolSelector gateway=client current=selection on_select=on_select/>
            <ErrorBanner error=error/>
            <div class="content">
                <ChartPanel symbol=selection series=series loading=loading interval=chart_interval/>
                <BiasMatrix analysis=analysis loading=loading/>
            </div>
            <div class="footer">
                <p>"Multi-timeframe analysis using EMA, RSI, MACD, Supertrend, and ADX"</p>
            </div>
        </main>
    }
}

#[component]
fn Header(
    client: Rc<DashboardApiClient>,
    #[prop(into)] loading: Signal<bool>,
    on_refresh: Callback<()>,
) -> impl IntoView {
    let (healthy, set_healthy) = create_signal::<Option<bool>>(None);
    spawn_local(async move {
        set_healthy.set(Some(client.health_check().await));
    });

    view! {
        <div class="header">
            <h1>"📈 Bias Dashboard"</h1>
            <div class="header-actions">
                <span
                    class="status-dot"
                    class:up=move || healthy.get() == Some(true)
                    class:down=move || healthy.get() == Some(false)
                    title=move || match healthy.get() {
                        Some(true) => "Analysis service reachable",
                        Some(false) => "Analysis service unreachable",
                        None => "Checking analysis service",
                    }
                ></span>
                <button
                    class="refresh-btn"
                    disabled=move || loading.get()
                    on:click=move |_| on_refresh.call(())
                >
                    <span class:animate-spin=move || loading.get()>"⟳"</span>
                    <span>"Refresh"</span>
                </button>
            </div>
        </div>
    }
}

/// Latest failure of a sync cycle, cleared when the next cycle starts
#[component]
fn ErrorBanner(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div class="error-banner">
                    <strong>"Error: "</strong>
                    {message}
                </div>
            }
        })
    }
}
