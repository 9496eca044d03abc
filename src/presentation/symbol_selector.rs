use std::rc::Rc;

use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::application::{gateway::DataFetchGateway, symbol_search::filter_symbols};
use crate::domain::{
    analysis::SymbolInfo,
    logging::{LogComponent, get_logger},
    market_data::Symbol,
};

/// Search box with a dropdown of known symbols. Enter selects the typed ticker.
#[component]
pub fn SymbolSelector<G>(
    gateway: Rc<G>,
    #[prop(into)] current: Signal<Symbol>,
    #[prop(into)] on_select: Callback<Symbol>,
) -> impl IntoView
where
    G: DataFetchGateway + 'static,
{
    let (symbols, set_symbols) = create_signal(Vec::<SymbolInfo>::new());
    let (query, set_query) = create_signal(String::new());
    let (is_open, set_open) = create_signal(false);
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        match gateway.search_symbols("").await {
            Ok(list) => {
                get_logger().info(
                    LogComponent::Presentation("SymbolSelector"),
                    &format!("📋 Loaded {} symbols", list.len()),
                );
                set_symbols.set(list);
            }
            Err(e) => get_logger().error(
                LogComponent::Presentation("SymbolSelector"),
                &format!("Failed to load symbols: {}", e),
            ),
        }
        set_loading.set(false);
    });

    let choose = move |symbol: Symbol| {
        on_select.call(symbol);
        set_open.set(false);
        set_query.set(String::new());
    };

    let options = move || {
        if loading.get() {
            return view! { <div class="dropdown-note">"Loading..."</div> }.into_view();
        }

        let current = current.get();
        symbols.with(|all| {
            let query = query.get();
            let matches = filter_symbols(all, &query);
            if matches.is_empty() {
                return view! { <div class="dropdown-note">"No symbols found"</div> }.into_view();
            }

            matches
                .into_iter()
                .map(|info| {
                    let symbol = Symbol::from(info.symbol.as_str());
                    let selected = symbol == current;
                    view! {
                        <button
                            class="dropdown-item"
                            class:selected=selected
                            on:click=move |_| choose(symbol.clone())
                        >
                            <span class="font-semibold">{info.symbol.clone()}</span>
                            <span class="text-muted text-sm">{info.name.clone()}</span>
                        </button>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="symbol-selector">
            <input
                type="text"
                placeholder="Search symbols..."
                prop:value=query
                on:input=move |ev| {
                    set_query.set(event_target_value(&ev));
                    set_open.set(true);
                }
                on:focus=move |_| set_open.set(true)
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        match Symbol::new(&query.get_untracked()) {
                            Ok(symbol) => choose(symbol),
                            Err(e) => get_logger().warn(LogComponent::Presentation("SymbolSelector"), &e),
                        }
                    }
                }
            />
            <Show when=move || is_open.get()>
                <div class="dropdown">{options}</div>
                <div class="dropdown-backdrop" on:click=move |_| set_open.set(false)></div>
            </Show>
        </div>
    }
}
