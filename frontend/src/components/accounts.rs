use log::{error, info};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::layout::{icon_pencil, icon_plus, icon_trash, icon_wallet, page_shell};
use crate::components::use_api;
use crate::models::Account;
use crate::state::accounts::{
    account_type_color, account_type_icon, AccountDraft, EditSession, ACCOUNT_TYPES,
};

const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this account? This action cannot be undone.";

#[derive(Properties, PartialEq)]
pub struct AccountManagerProps {
    pub accounts: Vec<Account>,
    pub loading: bool,
    /// Fired after every successful mutation; the owner re-fetches the list.
    pub on_changed: Callback<()>,
}

#[function_component(AccountManager)]
pub fn account_manager(props: &AccountManagerProps) -> Html {
    let api = use_api();
    let draft = use_state(AccountDraft::default);
    let editing = use_state(|| None::<EditSession>);
    let saving = use_state(|| false);
    let form_error = use_state(|| None::<String>);
    let list_error = use_state(|| None::<String>);

    let on_create = {
        let api = api.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let form_error = form_error.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let valid = match draft.validate() {
                Ok(valid) => valid,
                Err(err) => {
                    form_error.set(Some(err.to_string()));
                    return;
                }
            };

            form_error.set(None);
            saving.set(true);

            let api = api.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let form_error = form_error.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api.create_account(&valid).await {
                    Ok(()) => {
                        info!("created account {:?}", valid.name);
                        draft.set(AccountDraft::default());
                        on_changed.emit(());
                    }
                    Err(err) => {
                        error!("creating account failed: {err}");
                        form_error.set(Some(
                            err.user_message("Failed to create account. Please try again."),
                        ));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_save_edit = {
        let api = api.clone();
        let editing = editing.clone();
        let list_error = list_error.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(session) = (*editing).clone() else {
                return;
            };
            let valid = match session.draft.validate() {
                Ok(valid) => valid,
                Err(err) => {
                    list_error.set(Some(err.to_string()));
                    return;
                }
            };

            list_error.set(None);
            let api = api.clone();
            let editing = editing.clone();
            let list_error = list_error.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api.update_account(&session.account_id, &valid).await {
                    Ok(()) => {
                        info!("updated account {}", session.account_id);
                        editing.set(None);
                        on_changed.emit(());
                    }
                    Err(err) => {
                        error!("updating account {} failed: {err}", session.account_id);
                        list_error.set(Some(
                            err.user_message("Failed to update account. Please try again."),
                        ));
                    }
                }
            });
        })
    };

    let on_cancel_edit = {
        let editing = editing.clone();
        let list_error = list_error.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            list_error.set(None);
        })
    };

    let on_delete = {
        let api = api.clone();
        let list_error = list_error.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |account_id: String| {
            if !confirm(DELETE_CONFIRMATION) {
                return;
            }
            let api = api.clone();
            let list_error = list_error.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api.delete_account(&account_id).await {
                    Ok(()) => {
                        info!("deleted account {account_id}");
                        list_error.set(None);
                        on_changed.emit(());
                    }
                    Err(err) => {
                        error!("deleting account {account_id} failed: {err}");
                        list_error.set(Some(
                            err.user_message("Failed to delete account. Please try again."),
                        ));
                    }
                }
            });
        })
    };

    let on_name_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(AccountDraft {
                name: input.value(),
                ..(*draft).clone()
            });
        })
    };

    let on_type_change = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.set(AccountDraft {
                kind: select.value(),
                ..(*draft).clone()
            });
        })
    };

    let create_form = html! {
        <div class="bg-white/70 backdrop-blur-sm p-8 rounded-2xl border border-gray-200/50 shadow-sm">
            <div class="mb-6">
                <h3 class="text-xl font-bold text-gray-900">{"Add New Account"}</h3>
                <p class="text-gray-600 text-sm">{"Create a new financial account to track"}</p>
            </div>
            <form onsubmit={on_create} class="grid grid-cols-1 md:grid-cols-3 gap-4 items-end">
                <div class="space-y-2">
                    <label class="block text-sm font-semibold text-gray-700">{"Account Name"}</label>
                    <input
                        type="text"
                        placeholder="e.g., HDFC Savings"
                        value={draft.name.clone()}
                        oninput={on_name_input}
                        disabled={*saving}
                        class="w-full p-3 border border-gray-200 rounded-xl bg-white/50"
                    />
                </div>
                <div class="space-y-2">
                    <label class="block text-sm font-semibold text-gray-700">{"Account Type"}</label>
                    <select onchange={on_type_change} disabled={*saving} class="w-full p-3 border border-gray-200 rounded-xl bg-white/50">
                        <option value="" selected={draft.kind.is_empty()}>{"Select account type"}</option>
                        { for ACCOUNT_TYPES.iter().map(|t| html! {
                            <option value={t.label} selected={draft.kind == t.label}>{ format!("{} {}", t.icon, t.label) }</option>
                        }) }
                    </select>
                </div>
                <button type="submit" disabled={*saving} class="flex items-center justify-center gap-2 bg-green-700 text-white px-4 py-3 rounded-xl font-semibold text-sm hover:opacity-90 disabled:opacity-50">
                    { icon_plus() }
                    { if *saving { "Adding..." } else { "Add Account" } }
                </button>
            </form>
            if let Some(message) = &*form_error {
                <p class="text-sm text-red-600 mt-3">{ message.clone() }</p>
            }
        </div>
    };

    let rows = props.accounts.iter().map(|account| {
        let editing_this = (*editing)
            .as_ref()
            .filter(|session| session.account_id == account.id)
            .cloned();

        match editing_this {
            Some(session) => {
                let on_edit_name = {
                    let editing = editing.clone();
                    let session = session.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        let mut next = session.clone();
                        next.draft.name = input.value();
                        editing.set(Some(next));
                    })
                };
                let on_edit_type = {
                    let editing = editing.clone();
                    let session = session.clone();
                    Callback::from(move |e: Event| {
                        let select: HtmlSelectElement = e.target_unchecked_into();
                        let mut next = session.clone();
                        next.draft.kind = select.value();
                        editing.set(Some(next));
                    })
                };
                html! {
                    <li key={account.id.clone()} class="p-4 flex flex-col md:flex-row gap-3 md:items-center">
                        <input
                            type="text"
                            placeholder="Account name"
                            value={session.draft.name.clone()}
                            oninput={on_edit_name}
                            class="flex-1 p-2 border border-gray-200 rounded-lg"
                        />
                        <select onchange={on_edit_type} class="p-2 border border-gray-200 rounded-lg">
                            { for ACCOUNT_TYPES.iter().map(|t| html! {
                                <option value={t.label} selected={session.draft.kind == t.label}>{ t.label }</option>
                            }) }
                        </select>
                        <div class="flex gap-2">
                            <button onclick={on_save_edit.clone()} class="px-4 py-2 bg-green-700 text-white text-sm rounded-lg">{"Save"}</button>
                            <button onclick={on_cancel_edit.clone()} class="px-4 py-2 border border-gray-200 text-gray-600 text-sm rounded-lg">{"Cancel"}</button>
                        </div>
                    </li>
                }
            }
            None => {
                let on_edit = {
                    let editing = editing.clone();
                    let list_error = list_error.clone();
                    let session = EditSession::start(account);
                    Callback::from(move |_: MouseEvent| {
                        list_error.set(None);
                        editing.set(Some(session.clone()));
                    })
                };
                let on_delete = {
                    let on_delete = on_delete.clone();
                    let account_id = account.id.clone();
                    Callback::from(move |_: MouseEvent| on_delete.emit(account_id.clone()))
                };
                html! {
                    <li key={account.id.clone()} class="p-4 flex items-center justify-between hover:bg-gray-50/50">
                        <div class="flex items-center gap-3">
                            <span class="text-2xl">{ account_type_icon(&account.kind) }</span>
                            <div>
                                <p class="font-semibold text-gray-900">{ account.name.clone() }</p>
                                <span class={classes!("text-xs", "px-2", "py-0.5", "rounded-full", account_type_color(&account.kind))}>
                                    { if account.kind.is_empty() { "Unknown" } else { account.kind.as_str() } }
                                </span>
                            </div>
                        </div>
                        <div class="flex gap-2">
                            <button onclick={on_edit} class="p-2 text-gray-500 hover:bg-gray-100 rounded-lg" aria-label="Edit account">{ icon_pencil() }</button>
                            <button onclick={on_delete} class="p-2 text-red-500 hover:bg-red-50 rounded-lg" aria-label="Delete account">{ icon_trash() }</button>
                        </div>
                    </li>
                }
            }
        }
    });

    let account_list = html! {
        <div class="bg-white/70 backdrop-blur-sm rounded-2xl border border-gray-200/50 shadow-sm overflow-hidden">
            <div class="p-6 border-b border-gray-200/50">
                <h3 class="text-xl font-bold text-gray-900">{"Your Accounts"}</h3>
            </div>
            if let Some(message) = &*list_error {
                <p class="px-6 pt-4 text-sm text-red-600">{ message.clone() }</p>
            }
            if props.loading && props.accounts.is_empty() {
                <p class="p-6 text-sm text-gray-500">{"Loading..."}</p>
            } else if props.accounts.is_empty() {
                <div class="p-10 text-center">
                    <div class="w-16 h-16 mx-auto mb-4 bg-gray-100 rounded-full flex items-center justify-center text-gray-400">
                        { icon_wallet() }
                    </div>
                    <h4 class="text-lg font-medium text-gray-900 mb-2">{"No accounts yet"}</h4>
                    <p class="text-gray-500 text-sm">{"Add your first account to start importing statements."}</p>
                </div>
            } else {
                <ul class="divide-y divide-gray-200/50">
                    { for rows }
                </ul>
            }
        </div>
    };

    page_shell(
        "Accounts",
        html! {},
        html! {
            <>
                { create_form }
                { account_list }
            </>
        },
    )
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
