use std::rc::Rc;

use leptos::*;

use crate::domain::analysis::{
    AggregatedBias, TimeframeScore, confidence_width, map_bias_label, map_score,
    visual::{BiasIcon, confidence_percent_label, format_signed_fixed, format_signed_score, indicator_tone},
};
use crate::domain::market_data::format_timeframe;

/// Multi-timeframe bias table for the current analysis
#[component]
pub fn BiasMatrix(
    #[prop(into)] analysis: Signal<Option<Rc<AggregatedBias>>>,
    #[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
    move || {
        if loading.get() {
            return view! {
                <div class="panel">
                    <div class="animate-pulse">
                        <div class="skeleton skeleton-title"></div>
                        <div class="skeleton skeleton-body"></div>
                    </div>
                </div>
            }
            .into_view();
        }

        match analysis.get() {
            None => view! {
                <div class="panel">
                    <div class="empty-state">
                        <p>"No analysis data available"</p>
                        <p class="text-sm">"Select a symbol to start analyzing"</p>
                    </div>
                </div>
            }
            .into_view(),
            Some(bias) => view! { <MatrixBody bias=bias/> }.into_view(),
        }
    }
}

#[component]
fn MatrixBody(bias: Rc<AggregatedBias>) -> impl IntoView {
    let visual = map_bias_label(bias.bias);
    let rows = bias.timeframes.iter().map(|tf| view! { <TimeframeRow score=tf.clone()/> }).collect_view();

    view! {
        <div class="panel">
            <div class="matrix-header">
                <h2>"Multi-Timeframe Bias Matrix"</h2>
                <div class="matrix-summary">
                    <div>
                        <span class="text-muted text-sm">"Aggregate Bias: "</span>
                        <span class=format!("text-xl font-bold {}", visual.color_class)>
                            {format_signed_score(bias.overall_score)}
                        </span>
                    </div>
                    <div>
                        <span class="text-muted text-sm">"Grade: "</span>
                        <span class="text-xl font-bold">{bias.grade.clone()}</span>
                    </div>
                    <div class=format!("bias-label {}", visual.color_class)>
                        <span class="icon">{visual.icon.glyph()}</span>
                        <span class="font-semibold">{bias.bias.to_string()}</span>
                    </div>
                </div>
            </div>

            <table class="matrix-table">
                <thead>
                    <tr>
                        <th class="text-left">"Timeframe"</th>
                        <th>"Score"</th>
                        <th>"Confidence"</th>
                        <th>"EMA"</th>
                        <th>"RSI"</th>
                        <th>"MACD"</th>
                        <th>"Supertrend"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>

            <div class="matrix-legend">
                <strong>"Score:"</strong>
                " Aggregate trend signal from -100 (bearish) to +100 (bullish) | "
                <strong>"Confidence:"</strong>
                " Based on ADX (trend strength) | "
                <strong>"Color Coding:"</strong>
                " Green = Bullish, Red = Bearish, Gray = Neutral"
            </div>
        </div>
    }
}

#[component]
fn TimeframeRow(score: TimeframeScore) -> impl IntoView {
    let category = map_score(score.score);
    let ind = score.indicators;
    let trend_icon = if ind.supertrend_up() { BiasIcon::TrendingUp } else { BiasIcon::TrendingDown };

    view! {
        <tr>
            <td class="font-semibold">{format_timeframe(&score.timeframe)}</td>
            <td>
                <span class=format!("score-chip {}", category.color_class())>
                    {format_signed_score(score.score)}
                </span>
            </td>
            <td>
                <div class="confidence">
                    <div class="confidence-track">
                        <div
                            class="confidence-fill"
                            style:width=format!("{}%", confidence_width(score.confidence))
                        ></div>
                    </div>
                    <span class="text-muted text-xs">{confidence_percent_label(score.confidence)}</span>
                </div>
            </td>
            <td class=indicator_tone(ind.ema_rising())>{format_signed_fixed(ind.ema_slope, 2)}</td>
            <td class=indicator_tone(ind.rsi_above_midline())>{format!("{:.1}", ind.rsi)}</td>
            <td class=indicator_tone(ind.macd_hist_positive())>{format_signed_fixed(ind.macd_hist, 2)}</td>
            <td class=indicator_tone(ind.supertrend_up())>{trend_icon.glyph()}</td>
        </tr>
    }
}
