use log::{debug, error};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::layout::{icon_repeat, select_account_hint};
use crate::components::{use_api, AccountViewProps};
use crate::epoch::RequestEpoch;
use crate::format::{display_date, format_currency};
use crate::models::Subscription;

#[function_component(SubscriptionList)]
pub fn subscription_list(props: &AccountViewProps) -> Html {
    let api = use_api();
    let subscriptions = use_state(Vec::<Subscription>::new);
    let loading = use_state(|| false);
    let epoch = use_mut_ref(RequestEpoch::default);

    {
        let subscriptions = subscriptions.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |(account_id, _)| {
                let token = epoch.borrow_mut().begin();
                subscriptions.set(Vec::new());

                if let Some(account_id) = account_id.clone() {
                    loading.set(true);
                    let epoch = epoch.clone();
                    spawn_local(async move {
                        let result = api.subscriptions(&account_id).await;
                        if !epoch.borrow().is_current(token) {
                            debug!("dropping stale subscriptions for {account_id}");
                            return;
                        }
                        match result {
                            Ok(list) => subscriptions.set(list),
                            // shown as the empty state
                            Err(err) => error!("loading subscriptions for {account_id} failed: {err}"),
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
        return select_account_hint("subscriptions");
    }

    if *loading {
        return html! {
            <div class="bg-white/70 p-8 rounded-2xl border border-gray-200/50">
                <div class="animate-pulse space-y-4">
                    <div class="h-6 bg-gray-200 rounded w-1/3"></div>
                    { for (0..3).map(|_| html! { <div class="h-16 bg-gray-200 rounded"></div> }) }
                </div>
            </div>
        };
    }

    html! {
        <div class="bg-white/70 backdrop-blur-sm p-8 rounded-2xl border border-gray-200/50 shadow-sm">
            <h3 class="text-xl font-bold text-gray-900 mb-6">{"Recurring Subscriptions"}</h3>
            if subscriptions.is_empty() {
                <div class="text-center py-12">
                    <div class="w-16 h-16 mx-auto mb-4 bg-gray-100 rounded-full flex items-center justify-center text-gray-400">
                        { icon_repeat() }
                    </div>
                    <h4 class="text-lg font-medium text-gray-900 mb-2">{"No subscriptions found"}</h4>
                    <p class="text-gray-600">{"No recurring subscriptions detected for this account."}</p>
                </div>
            } else {
                <div class="overflow-x-auto">
                    <table class="w-full">
                        <thead class="bg-gray-50/50">
                            <tr class="text-xs font-semibold text-gray-700 uppercase tracking-wider">
                                <th class="px-6 py-4 text-left">{"Merchant"}</th>
                                <th class="px-6 py-4 text-left">{"Transactions"}</th>
                                <th class="px-6 py-4 text-right">{"Avg. Amount"}</th>
                                <th class="px-6 py-4 text-left">{"Last Payment"}</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-gray-200/50">
                            { for subscriptions.iter().map(|sub| html! {
                                <tr key={sub.merchant.clone()} class="hover:bg-gray-50/50 text-sm">
                                    <td class="px-6 py-4 font-medium text-gray-900">{ sub.merchant.clone() }</td>
                                    <td class="px-6 py-4 text-gray-900">{ sub.transaction_count }</td>
                                    <td class="px-6 py-4 text-right font-bold text-red-600">{ format_currency(sub.avg_amount.abs()) }</td>
                                    <td class="px-6 py-4 text-gray-900">{ display_date(&sub.last_payment_date) }</td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            }
        </div>
    }
}
