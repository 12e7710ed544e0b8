use std::collections::HashSet;

use log::{debug, error, info};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::layout::{
    error_notice, icon_alert_circle, icon_check_circle, page_shell, select_account_hint,
};
use crate::components::{use_api, AccountViewProps};
use crate::config::{ADD_NEW_CATEGORY, REVIEW_CATEGORIES};
use crate::epoch::RequestEpoch;
use crate::format::{amount_class, amount_label, confidence_badge_class, display_date};
use crate::state::review::{validate_custom_category, CategoryChoice, ReviewAction, ReviewItem, ReviewState};

const UPDATE_FAILED: &str = "Failed to update transaction. Please try again.";

#[function_component(NeedsReview)]
pub fn needs_review(props: &AccountViewProps) -> Html {
    let api = use_api();
    let review = use_reducer(ReviewState::default);
    let loading = use_state(|| false);
    let load_error = use_state(|| None::<String>);
    let epoch = use_mut_ref(RequestEpoch::default);
    let in_flight = use_mut_ref(HashSet::<String>::new);

    {
        let api = api.clone();
        let review = review.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        let epoch = epoch.clone();
        use_effect_with_deps(
            move |(account_id, _)| {
                let token = epoch.borrow_mut().begin();
                review.dispatch(ReviewAction::Loaded(Vec::new()));
                load_error.set(None);

                if let Some(account_id) = account_id.clone() {
                    loading.set(true);
                    let epoch = epoch.clone();
                    spawn_local(async move {
                        let result = api.list_review_items(&account_id).await;
                        if !epoch.borrow().is_current(token) {
                            debug!("dropping stale review items for {account_id}");
                            return;
                        }
                        match result {
                            Ok(items) => review.dispatch(ReviewAction::Loaded(items)),
                            Err(err) => {
                                error!("loading review items for {account_id} failed: {err}");
                                load_error.set(Some(
                                    err.user_message("Could not load transactions for review."),
                                ));
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

    let submit = {
        let api = api.clone();
        let review = review.clone();
        let in_flight = in_flight.clone();
        let account_id = props.account_id.clone();
        Callback::from(move |(id, category): (String, String)| {
            let Some(account_id) = account_id.clone() else {
                return;
            };
            if !review.can_submit(&id) || !in_flight.borrow_mut().insert(id.clone()) {
                return;
            }
            review.dispatch(ReviewAction::SubmitStarted(id.clone()));

            let api = api.clone();
            let review = review.clone();
            let in_flight = in_flight.clone();
            spawn_local(async move {
                match api.update_category(&account_id, &id, &category).await {
                    Ok(()) => {
                        info!("categorised {id} as {category:?}");
                        review.dispatch(ReviewAction::SubmitSucceeded(id.clone()));
                    }
                    Err(err) => {
                        error!("updating category of {id} failed: {err}");
                        review.dispatch(ReviewAction::SubmitFailed {
                            id: id.clone(),
                            message: err.user_message(UPDATE_FAILED),
                        });
                    }
                }
                in_flight.borrow_mut().remove(&id);
            });
        })
    };

    let content = if props.account_id.is_none() {
        select_account_hint("transactions that need review")
    } else if *loading {
        loading_skeleton()
    } else if let Some(message) = &*load_error {
        error_notice(message)
    } else if review.items.is_empty() {
        html! {
            <div class="bg-white/70 p-12 rounded-2xl border border-gray-200/50 text-center">
                <div class="w-16 h-16 mx-auto mb-4 bg-green-100 rounded-full flex items-center justify-center text-green-600">
                    { icon_check_circle() }
                </div>
                <h3 class="text-lg font-semibold text-gray-900 mb-2">{"All caught up!"}</h3>
                <p class="text-gray-500">{"No transactions need categorization right now."}</p>
            </div>
        }
    } else {
        let count = review.items.len();
        html! {
            <div class="bg-white/70 backdrop-blur-sm rounded-2xl border border-gray-200/50 shadow-sm overflow-hidden">
                <div class="p-6 border-b border-gray-200/50 flex items-center gap-3">
                    <div class="w-10 h-10 bg-amber-100 rounded-xl flex items-center justify-center text-amber-600">
                        { icon_alert_circle() }
                    </div>
                    <div>
                        <h3 class="text-xl font-bold text-gray-900">{"Needs Review"}</h3>
                        <p class="text-gray-600 text-sm">
                            { format!("{count} transaction{} need{} categorization", if count == 1 { "" } else { "s" }, if count == 1 { "s" } else { "" }) }
                        </p>
                    </div>
                </div>
                <ul class="divide-y divide-gray-200/50">
                    { for review.items.iter().map(|item| review_row(item, &review, &submit)) }
                </ul>
            </div>
        }
    };

    page_shell("Needs Review", html! {}, content)
}

fn review_row(
    item: &ReviewItem,
    review: &UseReducerHandle<ReviewState>,
    submit: &Callback<(String, String)>,
) -> Html {
    let tx = &item.transaction;
    let id = tx.id.clone();
    let processing = item.is_processing();

    let on_select = {
        let review = review.clone();
        let submit = submit.clone();
        let id = id.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            // back to the placeholder so a failed choice can be picked again
            select.set_selected_index(0);
            match CategoryChoice::from_select(&value) {
                Some(CategoryChoice::AddNew) => review.dispatch(ReviewAction::OpenCustomInput(id.clone())),
                Some(CategoryChoice::Existing(category)) => submit.emit((id.clone(), category)),
                None => {}
            }
        })
    };

    let on_custom_input = {
        let review = review.clone();
        let id = id.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            review.dispatch(ReviewAction::EditCustom {
                id: id.clone(),
                text: input.value(),
            });
        })
    };

    let on_custom_save = {
        let review = review.clone();
        let submit = submit.clone();
        let id = id.clone();
        let text = item.custom_category.clone();
        Callback::from(move |_: MouseEvent| match validate_custom_category(&text) {
            Ok(category) => submit.emit((id.clone(), category)),
            Err(err) => review.dispatch(ReviewAction::ShowError {
                id: id.clone(),
                message: err.to_string(),
            }),
        })
    };

    let on_custom_cancel = {
        let review = review.clone();
        let id = id.clone();
        Callback::from(move |_: MouseEvent| review.dispatch(ReviewAction::CancelCustomInput(id.clone())))
    };

    let editor = if item.shows_custom_input() {
        html! {
            <div class="flex gap-2">
                <input
                    type="text"
                    placeholder="Enter new category"
                    value={item.custom_category.clone()}
                    oninput={on_custom_input}
                    disabled={processing}
                    class="flex-1 p-2 border border-gray-200 rounded-xl text-sm"
                />
                <button onclick={on_custom_save} disabled={processing} class="px-4 py-2 bg-green-700 text-white text-sm rounded-xl disabled:opacity-50">
                    { if processing { "Saving..." } else { "Save" } }
                </button>
                <button onclick={on_custom_cancel} disabled={processing} class="px-4 py-2 text-gray-600 hover:bg-gray-100 rounded-xl border border-gray-200 text-sm disabled:opacity-50">
                    {"Cancel"}
                </button>
            </div>
        }
    } else {
        html! {
            <select onchange={on_select} disabled={processing} class="w-full md:w-64 p-2 border border-gray-200 rounded-xl bg-white/50 text-sm disabled:opacity-50">
                <option value="" selected={true}>{ if processing { "Updating..." } else { "Select category" } }</option>
                { for REVIEW_CATEGORIES.iter().map(|category| html! {
                    <option value={*category}>{ *category }</option>
                }) }
                <option value={ADD_NEW_CATEGORY}>{"+ Add new category"}</option>
            </select>
        }
    };

    html! {
        <li key={id.clone()} class="p-6 flex flex-col md:flex-row md:items-center gap-4 hover:bg-gray-50/50">
            <div class="flex-1 min-w-0 space-y-1">
                <p class="font-semibold text-gray-900 truncate">
                    { tx.description.clone().unwrap_or_else(|| "No Description".to_string()) }
                </p>
                <div class="flex flex-wrap items-center gap-2 text-xs text-gray-500">
                    <span>{ tx.date.as_deref().map(display_date).unwrap_or("N/A") }</span>
                    <span class={classes!("px-2", "py-0.5", "rounded-full", "border", confidence_badge_class(tx.confidence.as_deref()))}>
                        { tx.confidence.clone().unwrap_or_else(|| "Unknown".to_string()) }
                    </span>
                    <span>{ format!("Current: {}", tx.category.as_deref().unwrap_or("Uncategorized")) }</span>
                </div>
                if let Some(message) = &item.error {
                    <p class="text-xs text-red-600">{ message.clone() }</p>
                }
            </div>
            <span class={classes!("font-bold", amount_class(tx.amount))}>{ amount_label(tx.amount) }</span>
            <div class="md:w-80">{ editor }</div>
        </li>
    }
}

fn loading_skeleton() -> Html {
    html! {
        <div class="bg-white/70 p-8 rounded-2xl border border-gray-200/50">
            <div class="animate-pulse space-y-4">
                <div class="h-8 bg-gray-200 rounded w-1/4"></div>
                { for (0..3).map(|_| html! { <div class="h-16 bg-gray-200 rounded"></div> }) }
            </div>
        </div>
    }
}
