use log::{debug, error};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::layout::{
    error_notice, icon_chevron_left, icon_chevron_right, icon_search, select_account_hint,
};
use crate::components::{use_api, AccountViewProps};
use crate::config::PAGE_SIZE;
use crate::epoch::RequestEpoch;
use crate::format::{amount_class, amount_label, category_icon, confidence_badge_class};
use crate::models::Transaction;
use crate::state::table::{SortDirection, SortKey, TableAction, TableState};

const INPUT_CLASS: &str = "px-4 py-2 border border-gray-200 rounded-xl bg-white/50 focus:ring-2 focus:ring-green-500/20 focus:border-green-500";

#[function_component(TransactionTable)]
pub fn transaction_table(props: &AccountViewProps) -> Html {
    let api = use_api();
    let table = use_reducer(TableState::default);
    let loading = use_state(|| false);
    let load_error = use_state(|| None::<String>);
    let epoch = use_mut_ref(RequestEpoch::default);

    {
        let table = table.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |(account_id, _)| {
                let token = epoch.borrow_mut().begin();
                table.dispatch(TableAction::Loaded(Vec::new()));
                load_error.set(None);

                if let Some(account_id) = account_id.clone() {
                    loading.set(true);
                    let epoch = epoch.clone();
                    spawn_local(async move {
                        let result = api.list_transactions(&account_id).await;
                        if !epoch.borrow().is_current(token) {
                            debug!("dropping stale transactions for {account_id}");
                            return;
                        }
                        match result {
                            Ok(rows) => table.dispatch(TableAction::Loaded(rows)),
                            Err(err) => {
                                error!("loading transactions for {account_id} failed: {err}");
                                load_error.set(Some(err.user_message("Could not load transactions.")));
                            }
                        }
                        loading.set(false);
                    });
                } else {
                    loading.set(false);
                }

                move || {
                    epoch.borrow_mut().begin();
                }
            },
            (props.account_id.clone(), props.refresh),
        );
    }

    if props.account_id.is_none() {
        return select_account_hint("transactions");
    }

    if *loading {
        return html! {
            <div class="bg-white/70 backdrop-blur-sm p-8 rounded-2xl border border-gray-200/50 shadow-sm">
                <div class="animate-pulse space-y-4">
                    <div class="h-8 bg-gray-200 rounded w-1/4"></div>
                    <div class="space-y-3">
                        { for (0..5).map(|_| html! { <div class="h-12 bg-gray-200 rounded"></div> }) }
                    </div>
                </div>
            </div>
        };
    }

    let on_search = {
        let table = table.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            table.dispatch(TableAction::Search(input.value()));
        })
    };

    let on_category = {
        let table = table.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            table.dispatch(TableAction::FilterCategory(non_empty(select.value())));
        })
    };

    let on_confidence = {
        let table = table.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            table.dispatch(TableAction::FilterConfidence(non_empty(select.value())));
        })
    };

    let on_clear = {
        let table = table.clone();
        Callback::from(move |_: MouseEvent| table.dispatch(TableAction::ClearFilters))
    };

    let visible_count = table.visible().len();
    let total_pages = table.total_pages();
    let page_rows = table.page_rows();
    let first_shown = (table.page - 1) * PAGE_SIZE + 1;
    let last_shown = (table.page * PAGE_SIZE).min(visible_count);

    let sort_header = |key: SortKey, label: &'static str, align_right: bool| {
        let table = table.clone();
        let indicator = match table.sort {
            Some(sort) if sort.key == key => match sort.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            },
            _ => "",
        };
        html! {
            <th class={classes!("px-6", "py-4", if align_right { "text-right" } else { "text-left" })}>
                <button
                    onclick={Callback::from(move |_: MouseEvent| table.dispatch(TableAction::SortBy(key)))}
                    class={classes!("inline-flex", "items-center", "gap-1", "text-xs", "font-semibold", "text-gray-700", "uppercase", "tracking-wider", "hover:text-gray-900")}
                >
                    <span>{ label }</span>
                    <span class="text-[10px]">{ indicator }</span>
                </button>
            </th>
        }
    };

    let page_button = |label: Html, action: TableAction, disabled: bool, aria: &'static str| {
        let table = table.clone();
        html! {
            <button
                onclick={Callback::from(move |_: MouseEvent| table.dispatch(action.clone()))}
                disabled={disabled}
                aria-label={aria}
                class="p-2 rounded-lg border border-gray-200 hover:bg-gray-100 disabled:opacity-50 disabled:cursor-not-allowed"
            >
                { label }
            </button>
        }
    };

    html! {
        <div class="bg-white/70 backdrop-blur-sm rounded-2xl border border-gray-200/50 shadow-sm overflow-hidden">
            <div class="p-6 border-b border-gray-200/50">
                <h3 class="text-xl font-bold text-gray-900">{"Transactions"}</h3>
                <p class="text-gray-600 text-sm mt-1">
                    { format!("{} of {} transactions", visible_count, table.rows().len()) }
                </p>

                <div class="mt-6 grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
                    <div class="relative">
                        <span class="absolute left-3 top-1/2 -translate-y-1/2 text-gray-400">{ icon_search() }</span>
                        <input
                            type="text"
                            placeholder="Search transactions..."
                            value={table.filter.search.clone()}
                            oninput={on_search}
                            class={classes!("w-full", "pl-10", INPUT_CLASS)}
                        />
                    </div>
                    <select onchange={on_category} class={INPUT_CLASS}>
                        <option value="" selected={table.filter.category.is_none()}>{"All Categories"}</option>
                        { for table.categories().into_iter().map(|category| {
                            let selected = table.filter.category.as_deref() == Some(category.as_str());
                            html! { <option value={category.clone()} selected={selected}>{ category }</option> }
                        }) }
                    </select>
                    <select onchange={on_confidence} class={INPUT_CLASS}>
                        <option value="" selected={table.filter.confidence.is_none()}>{"All Confidence"}</option>
                        { for table.confidences().into_iter().map(|confidence| {
                            let selected = table.filter.confidence.as_deref() == Some(confidence.as_str());
                            html! { <option value={confidence.clone()} selected={selected}>{ confidence }</option> }
                        }) }
                    </select>
                    <button onclick={on_clear} class="px-4 py-2 text-gray-600 hover:text-gray-800 hover:bg-gray-100 rounded-xl border border-gray-200">
                        {"Clear Filters"}
                    </button>
                </div>
            </div>

            if let Some(message) = &*load_error {
                <div class="p-6">{ error_notice(message) }</div>
            } else if visible_count == 0 {
                <div class="p-12 text-center">
                    <h4 class="text-lg font-medium text-gray-900 mb-2">{"No transactions found"}</h4>
                    <p class="text-gray-500">
                        { if table.rows().is_empty() { "Upload a statement to see transactions here." } else { "Try adjusting your search or filters." } }
                    </p>
                </div>
            } else {
                <>
                    <div class="overflow-x-auto">
                        <table class="w-full">
                            <thead class="bg-gray-50/50">
                                <tr>
                                    { sort_header(SortKey::Date, "Date", false) }
                                    { sort_header(SortKey::Description, "Description", false) }
                                    { sort_header(SortKey::Category, "Category", false) }
                                    <th class="px-6 py-4 text-left text-xs font-semibold text-gray-700 uppercase tracking-wider">{"Confidence"}</th>
                                    { sort_header(SortKey::Amount, "Amount", true) }
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-200/50">
                                { for page_rows.into_iter().map(transaction_row) }
                            </tbody>
                        </table>
                    </div>

                    if total_pages > 1 {
                        <div class="px-6 py-4 border-t border-gray-200/50 bg-gray-50/30 flex items-center justify-between">
                            <div class="text-sm text-gray-700">
                                { format!("Showing {first_shown} to {last_shown} of {visible_count} results") }
                            </div>
                            <div class="flex items-center gap-2">
                                { page_button(icon_chevron_left(), TableAction::PrevPage, table.page <= 1, "Previous page") }
                                { for (1..=total_pages).map(|page| {
                                    let table = table.clone();
                                    let class_name = if page == table.page {
                                        "px-3 py-1 rounded-lg text-sm bg-green-700 text-white"
                                    } else {
                                        "px-3 py-1 rounded-lg text-sm border border-gray-200 hover:bg-gray-100"
                                    };
                                    html! {
                                        <button class={class_name} onclick={Callback::from(move |_: MouseEvent| table.dispatch(TableAction::GoToPage(page)))}>
                                            { page.to_string() }
                                        </button>
                                    }
                                }) }
                                { page_button(icon_chevron_right(), TableAction::NextPage, table.page >= total_pages, "Next page") }
                            </div>
                        </div>
                    }
                </>
            }
        </div>
    }
}

fn transaction_row(tx: &Transaction) -> Html {
    html! {
        <tr key={tx.id.clone()} class="hover:bg-gray-50/50 text-sm">
            <td class="px-6 py-4 whitespace-nowrap font-medium text-gray-900">
                { tx.date.clone().unwrap_or_else(|| "N/A".to_string()) }
            </td>
            <td class="px-6 py-4 font-medium text-gray-900 max-w-xs truncate">
                { tx.description.clone().unwrap_or_else(|| "No Description".to_string()) }
            </td>
            <td class="px-6 py-4 whitespace-nowrap">
                <span class="flex items-center gap-2">
                    <span class="text-lg">{ category_icon(tx.category.as_deref()) }</span>
                    <span class="font-medium text-gray-900">{ tx.category.clone().unwrap_or_else(|| "N/A".to_string()) }</span>
                </span>
            </td>
            <td class="px-6 py-4 whitespace-nowrap">
                <span class={classes!("inline-flex", "px-2.5", "py-0.5", "rounded-full", "text-xs", "font-medium", "border", confidence_badge_class(tx.confidence.as_deref()))}>
                    { tx.confidence.clone().unwrap_or_else(|| "N/A".to_string()) }
                </span>
            </td>
            <td class={classes!("px-6", "py-4", "whitespace-nowrap", "text-right", "font-bold", amount_class(tx.amount))}>
                { amount_label(tx.amount) }
            </td>
        </tr>
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
