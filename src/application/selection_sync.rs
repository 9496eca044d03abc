//! Selection-driven synchronization of the dashboard view.
//!
//! Every selection change or refresh starts a *sync cycle* tagged with a
//! generation number. Both requests of a cycle run concurrently and their
//! joint result is applied only if the cycle is still the latest one and the
//! dashboard is still mounted. Older cycles keep running to completion but
//! their results are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::application::gateway::DataFetchGateway;
use crate::domain::{
    analysis::AggregatedBias,
    errors::{AppError, NetworkResult},
    logging::{LogComponent, LogLevel, get_logger},
    market_data::{DEFAULT_CHART_INTERVAL, DEFAULT_TIMEFRAMES, PriceSeries, Symbol, TimeInterval},
};
use crate::{log_debug, log_error, log_info, log_warn};

/// What a cycle requests besides the symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub timeframes: Vec<TimeInterval>,
    pub chart_interval: TimeInterval,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { timeframes: DEFAULT_TIMEFRAMES.to_vec(), chart_interval: DEFAULT_CHART_INTERVAL }
    }
}

/// Snapshot rendered by the dashboard. Never mutated, replaced as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Symbol,
    /// Symbol the analysis and series slots belong to
    pub data_symbol: Option<Symbol>,
    pub analysis: Option<Rc<AggregatedBias>>,
    pub series: Rc<PriceSeries>,
    pub loading: bool,
    pub error: Option<String>,
    /// Cycle that produced this snapshot
    pub generation: u64,
}

impl DashboardView {
    fn initial(selection: Symbol) -> Self {
        Self {
            selection,
            data_symbol: None,
            analysis: None,
            series: Rc::new(PriceSeries::empty()),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    /// Data currently shown belongs to the current selection
    pub fn is_current(&self) -> bool {
        self.data_symbol.as_ref() == Some(&self.selection)
    }
}

/// How a settled cycle affected the view
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Both datasets replaced
    Applied,
    /// One request failed; the other dataset was applied
    PartiallyApplied { error: String },
    /// Both requests failed
    Failed { error: String },
    /// A newer cycle started before this one settled
    Superseded,
    /// The dashboard was unmounted
    Detached,
}

impl CycleOutcome {
    pub fn was_applied(&self) -> bool {
        matches!(self, CycleOutcome::Applied | CycleOutcome::PartiallyApplied { .. })
    }
}

#[derive(Debug, Clone)]
struct CycleTicket {
    generation: u64,
    symbol: Symbol,
}

type ViewListener = Rc<dyn Fn(&Rc<DashboardView>)>;

struct SyncState {
    generation: u64,
    attached: bool,
    view: Rc<DashboardView>,
    listeners: Vec<ViewListener>,
}

/// Keeps one authoritative [`DashboardView`] consistent with the latest selection.
pub struct SelectionSyncController<G> {
    gateway: Rc<G>,
    settings: Rc<SyncSettings>,
    state: Rc<RefCell<SyncState>>,
}

impl<G> Clone for SelectionSyncController<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Rc::clone(&self.gateway),
            settings: Rc::clone(&self.settings),
            state: Rc::clone(&self.state),
        }
    }
}

impl<G: DataFetchGateway> SelectionSyncController<G> {
    pub fn new(gateway: Rc<G>, settings: SyncSettings, initial: Symbol) -> Self {
        log_info!(
            LogComponent::Application("SelectionSync"),
            "🚀 Selection sync created for {}",
            initial
        );

        Self {
            gateway,
            settings: Rc::new(settings),
            state: Rc::new(RefCell::new(SyncState {
                generation: 0,
                attached: true,
                view: Rc::new(DashboardView::initial(initial)),
                listeners: Vec::new(),
            })),
        }
    }

    pub fn view(&self) -> Rc<DashboardView> {
        Rc::clone(&self.state.borrow().view)
    }

    pub fn selection(&self) -> Symbol {
        self.state.borrow().view.selection.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Called with every new view snapshot.
    pub fn subscribe(&self, listener: impl Fn(&Rc<DashboardView>) + 'static) {
        self.state.borrow_mut().listeners.push(Rc::new(listener));
    }

    /// Change the selection and synchronize the view with it.
    pub async fn select(&self, symbol: Symbol) -> CycleOutcome {
        self.run_cycle(Some(symbol)).await
    }

    /// Re-run the protocol against the unchanged selection.
    pub async fn refresh(&self) -> CycleOutcome {
        self.run_cycle(None).await
    }

    /// Stop applying results. Cycles still in flight settle as no-ops.
    pub fn detach(&self) {
        let mut state = self.state.borrow_mut();
        if state.attached {
            state.attached = false;
            state.listeners.clear();
            log_debug!(
                LogComponent::Application("SelectionSync"),
                "🔌 Detached at generation {}",
                state.generation
            );
        }
    }

    async fn run_cycle(&self, symbol: Option<Symbol>) -> CycleOutcome {
        let Some(ticket) = self.begin_cycle(symbol) else {
            return CycleOutcome::Detached;
        };

        let (analysis, series) = futures::join!(
            self.gateway.fetch_analysis(&ticket.symbol, &self.settings.timeframes),
            self.gateway.fetch_price_series(&ticket.symbol, self.settings.chart_interval),
        );

        self.settle(ticket, analysis, series)
    }

    fn begin_cycle(&self, symbol: Option<Symbol>) -> Option<CycleTicket> {
        let (ticket, view) = {
            let mut state = self.state.borrow_mut();
            if !state.attached {
                return None;
            }

            state.generation += 1;
            let selection = symbol.unwrap_or_else(|| state.view.selection.clone());
            let view = if state.view.data_symbol.as_ref() == Some(&selection) {
                DashboardView {
                    selection: selection.clone(),
                    loading: true,
                    error: None,
                    generation: state.generation,
                    ..(*state.view).clone()
                }
            } else {
                // data of another symbol is never shown under the new selection
                DashboardView {
                    selection: selection.clone(),
                    data_symbol: None,
                    analysis: None,
                    series: Rc::new(PriceSeries::empty()),
                    loading: true,
                    error: None,
                    generation: state.generation,
                }
            };
            let view = Rc::new(view);
            state.view = Rc::clone(&view);
            (CycleTicket { generation: state.generation, symbol: selection }, view)
        };

        get_logger().log_with_metadata(
            LogLevel::Info,
            LogComponent::Application("SelectionSync"),
            "📡 Sync cycle started",
            &format!("symbol={} generation={}", ticket.symbol, ticket.generation),
        );

        self.publish(&view);
        Some(ticket)
    }

    fn settle(
        &self,
        ticket: CycleTicket,
        analysis: NetworkResult<AggregatedBias>,
        series: NetworkResult<PriceSeries>,
    ) -> CycleOutcome {
        let (outcome, view) = {
            let mut state = self.state.borrow_mut();
            if !state.attached {
                log_debug!(
                    LogComponent::Application("SelectionSync"),
                    "🗑️ Dropping generation {} for {}: detached",
                    ticket.generation,
                    ticket.symbol
                );
                return CycleOutcome::Detached;
            }
            if state.generation != ticket.generation {
                log_debug!(
                    LogComponent::Application("SelectionSync"),
                    "🗑️ Dropping stale generation {} for {} (current {})",
                    ticket.generation,
                    ticket.symbol,
                    state.generation
                );
                return CycleOutcome::Superseded;
            }

            let current = Rc::clone(&state.view);
            // a failed slot may keep older data only if it shows the same symbol
            let keep_previous = current.data_symbol.as_ref() == Some(&ticket.symbol);
            let mut errors: Vec<AppError> = Vec::new();

            let analysis = match analysis {
                Ok(bias) => Some(Rc::new(bias)),
                Err(err) => {
                    errors.push(err);
                    if keep_previous { current.analysis.clone() } else { None }
                }
            };
            let series = match series {
                Ok(series) => Rc::new(series),
                Err(err) => {
                    errors.push(err);
                    if keep_previous {
                        Rc::clone(&current.series)
                    } else {
                        Rc::new(PriceSeries::empty())
                    }
                }
            };

            let error = combine_errors(&errors);
            let outcome = match (errors.len(), &error) {
                (0, _) => CycleOutcome::Applied,
                (1, Some(message)) => CycleOutcome::PartiallyApplied { error: message.clone() },
                (_, Some(message)) => CycleOutcome::Failed { error: message.clone() },
                (_, None) => CycleOutcome::Applied,
            };

            for err in &errors {
                if err.is_transient() {
                    log_warn!(
                        LogComponent::Application("SelectionSync"),
                        "⚠️ Fetch for {} failed, refresh may recover: {}",
                        ticket.symbol,
                        err
                    );
                } else {
                    log_error!(
                        LogComponent::Application("SelectionSync"),
                        "❌ Fetch for {} failed: {}",
                        ticket.symbol,
                        err
                    );
                }
            }

            let view = Rc::new(DashboardView {
                selection: ticket.symbol.clone(),
                data_symbol: Some(ticket.symbol.clone()),
                analysis,
                series,
                loading: false,
                error,
                generation: ticket.generation,
            });
            state.view = Rc::clone(&view);
            (outcome, view)
        };

        log_info!(
            LogComponent::Application("SelectionSync"),
            "✅ Generation {} settled for {}: {:?} ({} bars)",
            view.generation,
            view.selection,
            outcome,
            view.series.len()
        );

        self.publish(&view);
        outcome
    }

    fn publish(&self, view: &Rc<DashboardView>) {
        // listeners may read the controller, so call them without holding the borrow
        let listeners: Vec<ViewListener> = self.state.borrow().listeners.to_vec();
        for listener in listeners {
            listener(view);
        }
    }
}

/// Banner text for the failures of one cycle, identical messages merged
fn combine_errors(errors: &[AppError]) -> Option<String> {
    let mut messages: Vec<String> = Vec::new();
    for err in errors {
        let message = err.user_message();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }
    if messages.is_empty() { None } else { Some(messages.join("; ")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_errors_merges_duplicates() {
        let errors = vec![AppError::Network("offline".into()), AppError::Network("offline".into())];
        assert_eq!(
            combine_errors(&errors).unwrap(),
            "Unable to reach the analysis service: offline"
        );
        assert!(combine_errors(&[]).is_none());
    }

    #[test]
    fn combine_errors_keeps_order() {
        let errors = vec![
            AppError::Decode("bad grade".into()),
            AppError::Remote { status: 500, message: String::new() },
        ];
        let message = combine_errors(&errors).unwrap();
        assert!(message.starts_with("Unexpected response"));
        assert!(message.ends_with("HTTP 500"));
    }

    #[test]
    fn default_settings_match_dashboard_defaults() {
        let settings = SyncSettings::default();
        assert_eq!(settings.timeframes.len(), 5);
        assert_eq!(settings.chart_interval, TimeInterval::FifteenMinutes);
    }
}
