use std::rc::Rc;

use leptos::html::Div;
use leptos::*;

use crate::application::chart_surface::{AttachOutcome, ChartLifecycle, ChartSurfaceController};
use crate::domain::{
    chart::ChartConfig,
    logging::{LogComponent, get_logger},
    market_data::{PriceSeries, Symbol, TimeInterval},
};
use crate::infrastructure::rendering::CanvasMount;

type CanvasController = ChartSurfaceController<CanvasMount>;

/// Retry creation on the next frame until the container is in the document
fn attach_when_ready(controller: Rc<CanvasController>) {
    if controller.lifecycle() == ChartLifecycle::TornDown {
        return;
    }

    match controller.on_attach() {
        Ok(AttachOutcome::Deferred) => {
            request_animation_frame(move || attach_when_ready(controller));
        }
        Ok(_) => {}
        Err(e) => get_logger().error(
            LogComponent::Presentation("ChartPanel"),
            &format!("❌ Chart initialization failed: {}", e),
        ),
    }
}

/// Candlestick chart of the current selection
#[component]
pub fn ChartPanel(
    #[prop(into)] symbol: Signal<Symbol>,
    #[prop(into)] series: Signal<Rc<PriceSeries>>,
    #[prop(into)] loading: Signal<bool>,
    interval: TimeInterval,
) -> impl IntoView {
    let container_ref = create_node_ref::<Div>();
    let controller = Rc::new(ChartSurfaceController::new(
        CanvasMount::new(container_ref),
        ChartConfig::default(),
    ));

    {
        let controller = Rc::clone(&controller);
        create_effect(move |_| {
            if container_ref.get().is_some() {
                attach_when_ready(Rc::clone(&controller));
            }
        });
    }

    {
        let controller = Rc::clone(&controller);
        create_effect(move |_| controller.on_data_changed(series.get()));
    }

    {
        let controller = Rc::clone(&controller);
        on_cleanup(move || controller.on_detach());
    }

    let show_spinner = move || loading.get() && series.with(|s| s.is_empty());

    view! {
        <div class="panel">
            <div class="chart-header">
                <h2>{move || symbol.get().to_string()}</h2>
                <span class="text-muted text-sm">{interval.wire_label().to_string()}</span>
            </div>
            <div class="chart-wrapper">
                <div node_ref=container_ref class="chart-container"></div>
                <Show when=show_spinner>
                    <div class="chart-overlay">
                        <div class="spinner animate-spin"></div>
                        <p class="text-muted">"Loading chart data..."</p>
                    </div>
                </Show>
            </div>
        </div>
    }
}
