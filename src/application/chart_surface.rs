//! Lifecycle of the single chart instance shown by the dashboard.
//!
//! The host component forwards its mount, data, resize and unmount events here.
//! The controller owns the engine instance exclusively and guarantees that it
//! is created at most once per mount and released exactly once.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::domain::{
    chart::{ChartBar, ChartConfig, ChartMount, ChartSurface, ResizeSubscription, chart_bars},
    errors::RenderingResult,
    logging::LogComponent,
    market_data::PriceSeries,
};
use crate::{log_debug, log_info, log_warn};

/// Observable state of the chart instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLifecycle {
    Unmounted,
    Initialized,
    Populated { bar_count: usize },
    TornDown,
}

/// Result of [`ChartSurfaceController::on_attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Initialized,
    AlreadyInitialized,
    /// Container not in the document yet, call again later
    Deferred,
}

struct Live<M: ChartMount> {
    surface: M::Surface,
    subscription: M::Subscription,
    width: u32,
}

struct ControllerInner<M: ChartMount> {
    mount: M,
    config: ChartConfig,
    live: Option<Live<M>>,
    /// Last series received, applied again if the chart is created after it
    pending: Option<Rc<PriceSeries>>,
    lifecycle: ChartLifecycle,
}

impl<M: ChartMount> ControllerInner<M> {
    fn apply_series(&mut self, series: &PriceSeries) {
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let bars: Vec<ChartBar> = chart_bars(series);
        live.surface.set_data(&bars);
        live.surface.fit_content();
        self.lifecycle = ChartLifecycle::Populated { bar_count: bars.len() };

        if bars.is_empty() {
            log_debug!(LogComponent::Application("ChartSurface"), "📭 No chart data available");
        } else {
            log_debug!(
                LogComponent::Application("ChartSurface"),
                "📊 Dataset replaced: {} bars",
                bars.len()
            );
        }
    }

    fn resize(&mut self) {
        let width = self.mount.container_width();
        if let (Some(live), Some(width)) = (self.live.as_mut(), width) {
            live.width = width;
            live.surface.apply_width(width);
            log_debug!(LogComponent::Application("ChartSurface"), "↔️ Width -> {}", width);
        }
    }
}

/// Owns one chart instance and drives it through its lifecycle.
pub struct ChartSurfaceController<M: ChartMount + 'static> {
    inner: Rc<RefCell<ControllerInner<M>>>,
}

impl<M: ChartMount + 'static> ChartSurfaceController<M> {
    pub fn new(mount: M, config: ChartConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ControllerInner {
                mount,
                config,
                live: None,
                pending: None,
                lifecycle: ChartLifecycle::Unmounted,
            })),
        }
    }

    /// Create the chart instance if the container is ready.
    pub fn on_attach(&self) -> RenderingResult<AttachOutcome> {
        let mut inner = self.inner.borrow_mut();
        if inner.live.is_some() {
            return Ok(AttachOutcome::AlreadyInitialized);
        }

        let Some(width) = inner.mount.container_width() else {
            log_debug!(
                LogComponent::Application("ChartSurface"),
                "⏳ Container not attached, deferring chart creation"
            );
            return Ok(AttachOutcome::Deferred);
        };

        let surface = inner.mount.create_surface(width, inner.config.height, &inner.config.theme)?;

        let weak: Weak<RefCell<ControllerInner<M>>> = Rc::downgrade(&self.inner);
        let subscription = inner.mount.observe_resize(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                // a resize fired from inside another controller call is skipped
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.resize();
                }
            }
        }));

        inner.live = Some(Live { surface, subscription, width });
        inner.lifecycle = ChartLifecycle::Initialized;
        log_info!(
            LogComponent::Application("ChartSurface"),
            "✅ Chart created {}x{}",
            width,
            inner.config.height
        );

        if let Some(series) = inner.pending.clone() {
            inner.apply_series(&series);
        }

        Ok(AttachOutcome::Initialized)
    }

    /// Replace the dataset. Stored for later if the chart does not exist yet.
    pub fn on_data_changed(&self, series: Rc<PriceSeries>) {
        let mut inner = self.inner.borrow_mut();
        inner.pending = Some(Rc::clone(&series));
        if inner.live.is_some() {
            inner.apply_series(&series);
        }
    }

    pub fn on_resize(&self) {
        self.inner.borrow_mut().resize();
    }

    /// Release the chart instance and its resize listener. Safe to call repeatedly.
    pub fn on_detach(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.pending = None;
        let Some(mut live) = inner.live.take() else {
            if inner.lifecycle == ChartLifecycle::Unmounted {
                log_warn!(
                    LogComponent::Application("ChartSurface"),
                    "⚠️ Detach before the chart was created"
                );
            }
            inner.lifecycle = ChartLifecycle::TornDown;
            return;
        };

        live.subscription.unsubscribe();
        live.surface.destroy();
        inner.lifecycle = ChartLifecycle::TornDown;
        log_info!(LogComponent::Application("ChartSurface"), "🧹 Chart destroyed");
    }

    pub fn lifecycle(&self) -> ChartLifecycle {
        self.inner.borrow().lifecycle
    }

    /// A dataset has been handed to the live instance
    pub fn has_data(&self) -> bool {
        matches!(self.lifecycle(), ChartLifecycle::Populated { .. })
    }

    pub fn width(&self) -> Option<u32> {
        self.inner.borrow().live.as_ref().map(|live| live.width)
    }
}
