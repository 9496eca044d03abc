//! Boundary to the imperative chart engine.
//!
//! The engine instance never leaves the chart controller; the rest of the crate
//! only sees these traits.

use super::entities::ChartBar;
use super::value_objects::ChartTheme;
use crate::domain::errors::RenderingResult;

/// One live chart instance bound to a container.
pub trait ChartSurface {
    /// Resize horizontally, keeping the dataset.
    fn apply_width(&mut self, width: u32);
    /// Replace the whole dataset. `bars` is strictly ascending by time.
    fn set_data(&mut self, bars: &[ChartBar]);
    /// Fit the visible time range to the current dataset.
    fn fit_content(&mut self);
    /// Release the instance. Called at most once.
    fn destroy(&mut self);
}

/// Registration returned by [`ChartMount::observe_resize`].
pub trait ResizeSubscription {
    fn unsubscribe(self);
}

/// Host container a chart instance is created in.
pub trait ChartMount {
    type Surface: ChartSurface;
    type Subscription: ResizeSubscription;

    /// Current container width, `None` while the container is not attached.
    fn container_width(&self) -> Option<u32>;

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        theme: &ChartTheme,
    ) -> RenderingResult<Self::Surface>;

    /// Invoke `on_resize` on every viewport resize until unsubscribed.
    fn observe_resize(&self, on_resize: Box<dyn FnMut()>) -> Self::Subscription;
}
