use std::f64::consts::PI;

use futures::future::try_join;
use log::{debug, error};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::layout::{
    icon_arrow_down_circle, icon_arrow_up_circle, icon_hash, icon_trending_down,
    icon_trending_up, select_account_hint,
};
use crate::components::{use_api, AccountViewProps};
use crate::epoch::RequestEpoch;
use crate::format::{format_currency, format_currency_whole};
use crate::models::{CategoryTotal, Summary};

const SLICE_COLORS: [&str; 8] = [
    "#15803d", "#84cc16", "#dc2626", "#ea580c", "#f59e0b", "#8b5cf6", "#06b6d4", "#ec4899",
];

const RING_RADIUS: f64 = 80.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub label: String,
    pub total: f64,
    pub percent: f64,
    pub color: &'static str,
    /// Arc length and its start along the ring, for `stroke-dasharray`.
    pub length: f64,
    pub start: f64,
}

/// Lays the positive category totals out around a ring of `radius`.
pub fn doughnut_slices(totals: &[CategoryTotal], radius: f64) -> Vec<Slice> {
    let circumference = 2.0 * PI * radius;
    let sum: f64 = totals
        .iter()
        .map(|t| t.total)
        .filter(|total| *total > 0.0)
        .sum();
    if sum <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    totals
        .iter()
        .filter(|t| t.total > 0.0)
        .enumerate()
        .map(|(i, t)| {
            let fraction = t.total / sum;
            let slice = Slice {
                label: t.label().to_string(),
                total: t.total,
                percent: fraction * 100.0,
                color: SLICE_COLORS[i % SLICE_COLORS.len()],
                length: fraction * circumference,
                start,
            };
            start += slice.length;
            slice
        })
        .collect()
}

/// Highest-spending category; the first one wins a tie.
pub fn top_category(totals: &[CategoryTotal]) -> Option<&CategoryTotal> {
    totals.iter().fold(None, |best: Option<&CategoryTotal>, t| match best {
        Some(b) if b.total >= t.total => Some(b),
        _ => Some(t),
    })
}

pub fn health_score(summary: &Summary) -> u8 {
    if summary.net_cash_flow >= 0.0 {
        85
    } else {
        65
    }
}

pub fn average_per_day(summary: &Summary) -> f64 {
    summary.total_spending / 30.0
}

pub fn average_amount(summary: &Summary) -> f64 {
    if summary.transaction_count == 0 {
        0.0
    } else {
        summary.total_spending / summary.transaction_count as f64
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    Spending,
    Income,
    CashFlowUp,
    CashFlowDown,
    Count,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
    pub color_class: &'static str,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-white/70 p-6 rounded-2xl shadow-sm border border-gray-200/50 flex justify-between items-start">
            <div>
                <p class="text-gray-500 text-xs font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                <h3 class="text-2xl font-bold text-gray-900 tracking-tight">{ props.value.clone() }</h3>
            </div>
            <div class={classes!("p-3", "bg-gray-50", "rounded-xl", props.color_class)}>
                {
                    match props.icon {
                        StatIcon::Spending => icon_arrow_down_circle(),
                        StatIcon::Income => icon_arrow_up_circle(),
                        StatIcon::CashFlowUp => icon_trending_up(),
                        StatIcon::CashFlowDown => icon_trending_down(),
                        StatIcon::Count => icon_hash(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Clone, PartialEq)]
struct DashboardData {
    summary: Summary,
    categories: Vec<CategoryTotal>,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &AccountViewProps) -> Html {
    let api = use_api();
    let data = use_state(|| None::<DashboardData>);
    let loading = use_state(|| false);
    let failed = use_state(|| false);
    let epoch = use_mut_ref(RequestEpoch::default);

    {
        let data = data.clone();
        let loading = loading.clone();
        let failed = failed.clone();
        use_effect_with_deps(
            move |(account_id, _)| {
                let token = epoch.borrow_mut().begin();
                data.set(None);
                failed.set(false);

                if let Some(account_id) = account_id.clone() {
                    loading.set(true);
                    let epoch = epoch.clone();
                    spawn_local(async move {
                        let result = try_join(
                            api.summary(&account_id),
                            api.spending_by_category(&account_id),
                        )
                        .await;
                        if !epoch.borrow().is_current(token) {
                            debug!("dropping stale dashboard data for {account_id}");
                            return;
                        }
                        match result {
                            Ok((summary, categories)) => {
                                data.set(Some(DashboardData { summary, categories }))
                            }
                            Err(err) => {
                                error!("loading dashboard for {account_id} failed: {err}");
                                failed.set(true);
                            }
                        }
                        loading.set(false);
                    });
                }

                move || {
                    epoch.borrow_mut().begin();
                }
            },
            (props.account_id.clone(), props.refresh),
        );
    }

    if props.account_id.is_none() {
        return select_account_hint("the dashboard");
    }

    if *loading {
        return html! {
            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6">
                { for (0..4).map(|_| html! { <div class="h-28 bg-gray-200 rounded-2xl animate-pulse"></div> }) }
            </div>
        };
    }

    let Some(DashboardData { summary, categories }) = (*data).clone() else {
        if *failed {
            return html! {
                <div class="bg-red-50 border border-red-200 p-8 rounded-2xl text-center">
                    <h3 class="text-lg font-semibold text-red-800 mb-2">{"Dashboard Unavailable"}</h3>
                    <p class="text-red-600">{"Unable to load dashboard data. Please ensure the backend is running."}</p>
                </div>
            };
        }
        return html! {};
    };

    let flow_up = summary.net_cash_flow >= 0.0;
    let score = health_score(&summary);

    html! {
        <div class="space-y-8">
            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6">
                <StatCard title="Total Spending" value={format_currency(summary.total_spending)} icon={StatIcon::Spending} color_class="text-red-500" />
                <StatCard title="Total Income" value={format_currency(summary.total_income)} icon={StatIcon::Income} color_class="text-green-500" />
                <StatCard
                    title="Net Cash Flow"
                    value={format_currency(summary.net_cash_flow)}
                    icon={if flow_up { StatIcon::CashFlowUp } else { StatIcon::CashFlowDown }}
                    color_class={if flow_up { "text-green-500" } else { "text-red-500" }}
                />
                <StatCard title="Transactions" value={summary.transaction_count.to_string()} icon={StatIcon::Count} color_class="text-blue-500" />
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                <div class="lg:col-span-2 bg-white/70 p-8 rounded-2xl border border-gray-200/50 shadow-sm">
                    <h3 class="text-xl font-bold text-gray-900">{"Spending by Category"}</h3>
                    <p class="text-gray-600 text-sm mt-1 mb-6">{"Breakdown of your expenses"}</p>
                    { spending_chart(&categories) }
                </div>

                <div class="space-y-6">
                    <div class="bg-green-50 p-6 rounded-2xl border border-green-200/50">
                        <h4 class="font-semibold text-green-900">{"Top Category"}</h4>
                        <p class="text-sm text-green-700 mb-4">{"Highest spending"}</p>
                        if let Some(top) = top_category(&categories) {
                            <>
                                <p class="text-2xl font-bold text-green-900">{ top.label().to_string() }</p>
                                <p class="text-green-700 font-medium">{ format_currency(top.total) }</p>
                            </>
                        }
                    </div>

                    <div class="bg-blue-50 p-6 rounded-2xl border border-blue-200/50">
                        <h4 class="font-semibold text-blue-900">{"Health Score"}</h4>
                        <p class="text-sm text-blue-700 mb-4">{"Financial wellness"}</p>
                        <div class="flex items-end gap-2 mb-2">
                            <span class="text-3xl font-bold text-blue-900">{ score.to_string() }</span>
                            <span class="text-blue-700 font-medium">{"/100"}</span>
                        </div>
                        <div class="w-full bg-blue-200 rounded-full h-2">
                            <div class="bg-blue-600 h-2 rounded-full" style={format!("width: {score}%")}></div>
                        </div>
                        <p class="text-sm text-blue-700 mt-2">
                            { if flow_up { "Excellent financial health!" } else { "Room for improvement" } }
                        </p>
                    </div>

                    <div class="bg-amber-50 p-6 rounded-2xl border border-amber-200/50">
                        <h4 class="font-semibold text-amber-900">{"This Month"}</h4>
                        <p class="text-sm text-amber-700 mb-4">{"Summary overview"}</p>
                        <div class="space-y-3 text-sm">
                            <div class="flex justify-between">
                                <span class="text-amber-800">{"Avg. per day"}</span>
                                <span class="font-semibold text-amber-900">{ format_currency_whole(average_per_day(&summary)) }</span>
                            </div>
                            <div class="flex justify-between">
                                <span class="text-amber-800">{"Transactions"}</span>
                                <span class="font-semibold text-amber-900">{ summary.transaction_count.to_string() }</span>
                            </div>
                            <div class="flex justify-between">
                                <span class="text-amber-800">{"Avg. amount"}</span>
                                <span class="font-semibold text-amber-900">{ format_currency_whole(average_amount(&summary)) }</span>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn spending_chart(categories: &[CategoryTotal]) -> Html {
    let slices = doughnut_slices(categories, RING_RADIUS);
    if slices.is_empty() {
        return html! {
            <p class="text-sm text-gray-500">{"No spending recorded for this account yet."}</p>
        };
    }

    let circumference = 2.0 * PI * RING_RADIUS;
    html! {
        <div class="flex flex-col md:flex-row items-center gap-8">
            <svg width="220" height="220" viewBox="0 0 220 220" class="-rotate-90">
                { for slices.iter().map(|slice| html! {
                    <circle
                        cx="110"
                        cy="110"
                        r={RING_RADIUS.to_string()}
                        fill="none"
                        stroke={slice.color}
                        stroke-width="36"
                        stroke-dasharray={format!("{:.3} {:.3}", slice.length, circumference - slice.length)}
                        stroke-dashoffset={format!("{:.3}", -slice.start)}
                    >
                        <title>{ format!("{}: {} ({:.1}%)", slice.label, format_currency(slice.total), slice.percent) }</title>
                    </circle>
                }) }
            </svg>
            <ul class="flex-1 space-y-2">
                { for slices.iter().map(|slice| html! {
                    <li class="flex items-center justify-between text-sm">
                        <span class="flex items-center gap-2">
                            <span class="w-3 h-3 rounded-full" style={format!("background-color: {}", slice.color)}></span>
                            <span class="text-gray-700">{ slice.label.clone() }</span>
                        </span>
                        <span class="font-semibold text-gray-900">
                            { format!("{} ({:.1}%)", format_currency(slice.total), slice.percent) }
                        </span>
                    </li>
                }) }
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, total: f64) -> CategoryTotal {
        CategoryTotal {
            category: Some(category.to_string()),
            total,
        }
    }

    fn summary(spending: f64, net: f64, count: u64) -> Summary {
        Summary {
            total_spending: spending,
            total_income: spending + net,
            net_cash_flow: net,
            transaction_count: count,
        }
    }

    #[test]
    fn slices_cover_the_whole_ring_in_order() {
        let totals = vec![total("Food", 300.0), total("Travel", 100.0)];
        let slices = doughnut_slices(&totals, 10.0);
        let circumference = 2.0 * PI * 10.0;

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Food");
        assert!((slices[0].percent - 75.0).abs() < 1e-9);
        assert!((slices[1].start - slices[0].length).abs() < 1e-9);
        let covered: f64 = slices.iter().map(|s| s.length).sum();
        assert!((covered - circumference).abs() < 1e-9);
    }

    #[test]
    fn non_positive_totals_are_left_out_of_the_chart() {
        let totals = vec![total("Food", 0.0), total("Refunds", -20.0), total("Travel", 50.0)];
        let slices = doughnut_slices(&totals, 10.0);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "Travel");
        assert_eq!(slices[0].color, SLICE_COLORS[0]);
        assert!(doughnut_slices(&[total("Food", 0.0)], 10.0).is_empty());
    }

    #[test]
    fn missing_category_is_labelled_uncategorized() {
        let totals = vec![CategoryTotal {
            category: None,
            total: 12.0,
        }];
        assert_eq!(doughnut_slices(&totals, 10.0)[0].label, "Uncategorized");
    }

    #[test]
    fn top_category_prefers_the_first_of_equal_totals() {
        let totals = vec![total("Food", 40.0), total("Travel", 90.0), total("Shopping", 90.0)];
        assert_eq!(top_category(&totals).map(CategoryTotal::label), Some("Travel"));
        assert_eq!(top_category(&[]), None);
    }

    #[test]
    fn insight_figures() {
        let healthy = summary(3000.0, 500.0, 12);
        assert_eq!(health_score(&healthy), 85);
        assert!((average_per_day(&healthy) - 100.0).abs() < 1e-9);
        assert!((average_amount(&healthy) - 250.0).abs() < 1e-9);

        let struggling = summary(3000.0, -1.0, 0);
        assert_eq!(health_score(&struggling), 65);
        assert_eq!(average_amount(&struggling), 0.0);
    }
}
