use leptos::{NodeRef, html::Div};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::domain::{
    chart::{ChartBar, ChartMount, ChartSurface, ChartTheme, VisibleRange},
    errors::{AppError, RenderingResult},
    logging::{LogComponent, get_logger},
};
use crate::event_utils::{WindowEventListenerHandle, on_window_resize};
use crate::time_utils::format_time_label;

const PADDING: f64 = 12.0;
const PRICE_AXIS_WIDTH: f64 = 72.0;
const TIME_AXIS_HEIGHT: f64 = 24.0;
const GRID_ROWS: usize = 5;
const TIME_LABELS: usize = 6;
const NO_DATA_TEXT: &str = "No chart data available";

fn js_error(context: &str, err: JsValue) -> AppError {
    AppError::Rendering(format!("{}: {:?}", context, err))
}

enum Container {
    Node(NodeRef<Div>),
    Element(HtmlElement),
}

/// Host `<div>` the canvas chart is created in
pub struct CanvasMount {
    container: Container,
}

impl CanvasMount {
    pub fn new(node: NodeRef<Div>) -> Self {
        Self { container: Container::Node(node) }
    }

    pub fn from_element(element: HtmlElement) -> Self {
        Self { container: Container::Element(element) }
    }

    fn element(&self) -> Option<HtmlElement> {
        let element = match &self.container {
            Container::Node(node) => {
                let div: web_sys::HtmlDivElement = (*node.get_untracked()?).clone();
                div.unchecked_into::<HtmlElement>()
            }
            Container::Element(element) => element.clone(),
        };
        element.is_connected().then_some(element)
    }
}

impl ChartMount for CanvasMount {
    type Surface = CanvasChart;
    type Subscription = WindowEventListenerHandle;

    fn container_width(&self) -> Option<u32> {
        self.element().map(|element| element.client_width().max(0) as u32)
    }

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        theme: &ChartTheme,
    ) -> RenderingResult<CanvasChart> {
        let container = self
            .element()
            .ok_or_else(|| AppError::Rendering("Chart container is not attached".to_string()))?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| AppError::Rendering("Document not available".to_string()))?;

        let canvas = document
            .create_element("canvas")
            .map_err(|e| js_error("Failed to create canvas", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::Rendering("Failed to get canvas element".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        container
            .append_child(&canvas)
            .map_err(|e| js_error("Failed to attach canvas", e))?;

        let context = canvas
            .get_context("2d")
            .map_err(|e| js_error("Failed to get 2D context", e))?
            .ok_or_else(|| AppError::Rendering("2D context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::Rendering("Failed to cast to 2D context".to_string()))?;

        let chart = CanvasChart {
            canvas,
            context,
            width,
            height,
            theme: theme.clone(),
            bars: Vec::new(),
            visible: None,
            destroyed: false,
        };
        chart.redraw();
        Ok(chart)
    }

    fn observe_resize(&self, mut on_resize: Box<dyn FnMut()>) -> WindowEventListenerHandle {
        on_window_resize(move || on_resize())
    }
}

/// Candlestick chart drawn with the Canvas 2D API
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    theme: ChartTheme,
    bars: Vec<ChartBar>,
    visible: Option<VisibleRange>,
    destroyed: bool,
}

/// Pixel mapping for one frame
struct Frame {
    left: f64,
    top: f64,
    plot_width: f64,
    plot_height: f64,
    min_price: f64,
    max_price: f64,
}

impl Frame {
    fn price_y(&self, price: f64) -> f64 {
        let range = (self.max_price - self.min_price).max(f64::EPSILON);
        self.top + (self.max_price - price) / range * self.plot_height
    }
}

impl CanvasChart {
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    fn visible_bars(&self) -> &[ChartBar] {
        let Some(range) = self.visible else {
            return &self.bars;
        };
        let start = self.bars.partition_point(|bar| bar.time < range.from);
        let end = self.bars.partition_point(|bar| bar.time <= range.to);
        &self.bars[start..end]
    }

    fn redraw(&self) {
        if self.destroyed {
            return;
        }
        if let Err(e) = self.draw() {
            get_logger().error(
                LogComponent::Infrastructure("CanvasChart"),
                &format!("❌ Draw failed: {}", e),
            );
        }
    }

    fn draw(&self) -> RenderingResult<()> {
        let ctx = &self.context;
        let (width, height) = (self.width as f64, self.height as f64);

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_fill_style(&JsValue::from(self.theme.background.to_css()));
        ctx.fill_rect(0.0, 0.0, width, height);
        ctx.set_font(self.theme.font);

        let bars = self.visible_bars();
        let Some(frame) = self.frame(bars) else {
            return self.draw_no_data();
        };

        self.draw_grid(&frame);
        self.draw_candles(&frame, bars);
        self.draw_price_scale(&frame)?;
        self.draw_time_axis(&frame, bars)?;
        Ok(())
    }

    fn frame(&self, bars: &[ChartBar]) -> Option<Frame> {
        if bars.is_empty() {
            return None;
        }
        let (min_price, max_price) = bars.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, bar| {
            (acc.0.min(bar.low), acc.1.max(bar.high))
        });
        let pad = ((max_price - min_price) * 0.05).max(0.01);

        Some(Frame {
            left: PADDING,
            top: PADDING,
            plot_width: (self.width as f64 - PADDING - PRICE_AXIS_WIDTH).max(1.0),
            plot_height: (self.height as f64 - PADDING - TIME_AXIS_HEIGHT).max(1.0),
            min_price: min_price - pad,
            max_price: max_price + pad,
        })
    }

    fn draw_grid(&self, frame: &Frame) {
        let ctx = &self.context;
        ctx.set_stroke_style(&JsValue::from(self.theme.grid.to_css()));
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for row in 0..=GRID_ROWS {
            let y = frame.top + frame.plot_height * row as f64 / GRID_ROWS as f64;
            ctx.move_to(frame.left, y);
            ctx.line_to(frame.left + frame.plot_width, y);
        }
        for col in 0..=TIME_LABELS {
            let x = frame.left + frame.plot_width * col as f64 / TIME_LABELS as f64;
            ctx.move_to(x, frame.top);
            ctx.line_to(x, frame.top + frame.plot_height);
        }
        ctx.stroke();

        ctx.set_stroke_style(&JsValue::from(self.theme.border.to_css()));
        ctx.stroke_rect(frame.left, frame.top, frame.plot_width, frame.plot_height);
    }

    fn draw_candles(&self, frame: &Frame, bars: &[ChartBar]) {
        let ctx = &self.context;
        let slot = frame.plot_width / bars.len() as f64;
        let body_width = (slot * 0.7).max(1.0);

        for (i, bar) in bars.iter().enumerate() {
            let color = if bar.is_up() { &self.theme.up } else { &self.theme.down };
            let css = JsValue::from(color.to_css());
            let x = frame.left + slot * (i as f64 + 0.5);

            ctx.set_stroke_style(&css);
            ctx.begin_path();
            ctx.move_to(x, frame.price_y(bar.high));
            ctx.line_to(x, frame.price_y(bar.low));
            ctx.stroke();

            let open_y = frame.price_y(bar.open);
            let close_y = frame.price_y(bar.close);
            ctx.set_fill_style(&css);
            ctx.fill_rect(
                x - body_width / 2.0,
                open_y.min(close_y),
                body_width,
                (open_y - close_y).abs().max(1.0),
            );
        }
    }

    fn draw_price_scale(&self, frame: &Frame) -> RenderingResult<()> {
        let ctx = &self.context;
        ctx.set_fill_style(&JsValue::from(self.theme.text.to_css()));
        let x = frame.left + frame.plot_width + 6.0;
        for row in 0..=GRID_ROWS {
            let ratio = row as f64 / GRID_ROWS as f64;
            let price = frame.max_price - (frame.max_price - frame.min_price) * ratio;
            let y = frame.top + frame.plot_height * ratio + 4.0;
            ctx.fill_text(&format!("{:.2}", price), x, y)
                .map_err(|e| js_error("Failed to draw price label", e))?;
        }
        Ok(())
    }

    fn draw_time_axis(&self, frame: &Frame, bars: &[ChartBar]) -> RenderingResult<()> {
        let ctx = &self.context;
        let span = VisibleRange::fit(bars).map(|range| range.span()).unwrap_or(0);
        let slot = frame.plot_width / bars.len() as f64;
        let step = (bars.len() / TIME_LABELS).max(1);
        let y = frame.top + frame.plot_height + TIME_AXIS_HEIGHT - 6.0;

        ctx.set_fill_style(&JsValue::from(self.theme.text.to_css()));
        for (i, bar) in bars.iter().enumerate().step_by(step) {
            let x = frame.left + slot * i as f64;
            ctx.fill_text(&format_time_label(bar.time, span), x, y)
                .map_err(|e| js_error("Failed to draw time label", e))?;
        }
        Ok(())
    }

    fn draw_no_data(&self) -> RenderingResult<()> {
        let ctx = &self.context;
        ctx.set_fill_style(&JsValue::from(self.theme.text.to_css()));
        let text_width = ctx
            .measure_text(NO_DATA_TEXT)
            .map(|metrics| metrics.width())
            .unwrap_or(0.0);
        ctx.fill_text(
            NO_DATA_TEXT,
            (self.width as f64 - text_width) / 2.0,
            self.height as f64 / 2.0,
        )
        .map_err(|e| js_error("Failed to draw placeholder", e))
    }
}

impl ChartSurface for CanvasChart {
    fn apply_width(&mut self, width: u32) {
        self.width = width;
        self.canvas.set_width(width);
        self.redraw();
    }

    fn set_data(&mut self, bars: &[ChartBar]) {
        self.bars = bars.to_vec();
        self.visible = None;
        self.redraw();
    }

    fn fit_content(&mut self) {
        self.visible = VisibleRange::fit(&self.bars);
        self.redraw();
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.bars.clear();
        self.canvas.remove();
        get_logger().debug(LogComponent::Infrastructure("CanvasChart"), "🧹 Canvas removed");
    }
}
