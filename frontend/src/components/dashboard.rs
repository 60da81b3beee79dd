use crm_shared::AuditLogEntry;
use crm_shared::stats::ChartSlice;
use yew::prelude::*;

use crate::utils::format_timestamp;

#[derive(Properties, PartialEq)]
pub struct MetricCardProps {
    pub title: String,
    pub value: String,
    pub color: &'static str,
    pub breakdown_title: &'static str,
    pub breakdown: Vec<ChartSlice>,
}

/// Headline number; hovering reveals the series behind it.
#[function_component(MetricCard)]
pub fn metric_card(props: &MetricCardProps) -> Html {
    let hovered = use_state(|| false);

    let (bg_color, text_color) = match props.color {
        "blue" => ("bg-blue-500/20", "text-blue-400"),
        "green" => ("bg-green-500/20", "text-green-400"),
        "purple" => ("bg-purple-500/20", "text-purple-400"),
        "yellow" => ("bg-yellow-500/20", "text-yellow-400"),
        "orange" => ("bg-orange-500/20", "text-orange-400"),
        _ => ("bg-gray-500/20", "text-gray-400"),
    };

    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };

    html! {
        <div class="relative bg-gray-800 rounded-lg border border-gray-700 p-4" {onmouseenter} {onmouseleave}>
            <div class={format!("inline-block px-2 py-1 rounded {}", bg_color)}>
                <p class={format!("text-sm {}", text_color)}>{&props.title}</p>
            </div>
            <p class="mt-3 text-2xl font-bold text-white truncate">{&props.value}</p>

            if *hovered {
                <div class="absolute left-0 top-full mt-2 w-72 bg-gray-900 border border-gray-700 rounded-lg shadow-lg p-4 z-40">
                    <p class="text-sm font-medium text-gray-300 mb-3">{props.breakdown_title}</p>
                    <BreakdownBars slices={props.breakdown.clone()} empty_label="Nothing recorded" />
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BreakdownBarsProps {
    pub slices: Vec<ChartSlice>,
    pub empty_label: &'static str,
}

#[function_component(BreakdownBars)]
pub fn breakdown_bars(props: &BreakdownBarsProps) -> Html {
    if props.slices.is_empty() {
        return html! { <p class="text-sm text-gray-400">{props.empty_label}</p> };
    }

    html! {
        <div class="space-y-3">
            { for props.slices.iter().map(|slice| html! {
                <div>
                    <div class="flex items-center justify-between text-sm">
                        <span class="flex items-center space-x-2 text-gray-300">
                            <span class="w-2 h-2 rounded-full" style={format!("background-color: {};", slice.color)}></span>
                            <span>{&slice.name}</span>
                        </span>
                        <span class="text-gray-400">{format!("{} ({:.0}%)", slice.value, slice.percentage)}</span>
                    </div>
                    <div class="mt-1 h-2 bg-gray-700 rounded">
                        <div class="h-2 rounded" style={format!("width: {:.1}%; background-color: {};", slice.percentage, slice.color)}></div>
                    </div>
                </div>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ActivityRowProps {
    pub entry: AuditLogEntry,
}

#[function_component(ActivityRow)]
pub fn activity_row(props: &ActivityRowProps) -> Html {
    let entry = &props.entry;
    html! {
        <div class="px-4 py-3">
            <div class="flex items-center justify-between">
                <span class="text-white text-sm font-medium">{entry.action.as_str()}</span>
                <span class="text-gray-500 text-xs">{format_timestamp(entry.created_at)}</span>
            </div>
            <p class="text-gray-400 text-sm truncate">{&entry.new_value}</p>
            <p class="text-gray-500 text-xs">{entry.user_email.clone().unwrap_or_default()}</p>
        </div>
    }
}
