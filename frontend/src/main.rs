mod api;
mod cache;
mod components;
mod config;
mod epoch;
mod error;
mod format;
mod models;
mod state;

use log::{debug, error, info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::accounts::AccountManager;
use crate::components::ask_ai::AskAi;
use crate::components::dashboard::Dashboard;
use crate::components::file_upload::FileUpload;
use crate::components::layout::{
    icon_upload, page_shell, Header, Liveness, Modal, NavTabs, OfflineBanner, Tab,
};
use crate::components::needs_review::NeedsReview;
use crate::components::subscriptions::SubscriptionList;
use crate::components::transaction_table::TransactionTable;
use crate::config::api_base_url;
use crate::epoch::RequestEpoch;
use crate::models::Account;
use crate::state::accounts::account_type_icon;

/// Keeps the viewed account when it still exists, else falls back to the
/// first account.
fn reconcile_viewing(viewing: Option<&str>, accounts: &[Account]) -> Option<String> {
    match viewing {
        Some(id) if accounts.iter().any(|account| account.id == id) => Some(id.to_string()),
        _ => accounts.first().map(|account| account.id.clone()),
    }
}

const BACKEND_REACHABLE: &str = "Backend Online";

/// A failed account load marks the backend offline; a successful one clears
/// an earlier offline mark. `None` leaves the current state alone.
fn liveness_after_account_load(current: &Liveness, loaded: bool) -> Option<Liveness> {
    match (current, loaded) {
        (Liveness::Offline, false) => None,
        (_, false) => Some(Liveness::Offline),
        (Liveness::Offline, true) => Some(Liveness::Online(BACKEND_REACHABLE.to_string())),
        (_, true) => None,
    }
}

#[derive(Properties, PartialEq)]
struct AccountSelectorProps {
    accounts: Vec<Account>,
    selected: Option<String>,
    on_change: Callback<Option<String>>,
}

#[function_component(AccountSelector)]
fn account_selector(props: &AccountSelectorProps) -> Html {
    let on_change = props.on_change.reform(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let value = select.value();
        (!value.is_empty()).then_some(value)
    });

    html! {
        <select
            onchange={on_change}
            disabled={props.accounts.is_empty()}
            class="px-4 py-2 border border-gray-200 rounded-xl bg-white/70 text-sm font-medium disabled:opacity-50"
        >
            if props.accounts.is_empty() {
                <option value="" selected={true}>{"No accounts"}</option>
            }
            { for props.accounts.iter().map(|account| {
                let selected = props.selected.as_deref() == Some(account.id.as_str());
                html! {
                    <option value={account.id.clone()} selected={selected}>
                        { format!("{} {}", account_type_icon(&account.kind), account.name) }
                    </option>
                }
            }) }
        </select>
    }
}

#[function_component(App)]
fn app() -> Html {
    let api = use_memo(|_| ApiClient::new(api_base_url()), ());
    let liveness = use_state(|| Liveness::Checking);
    let active_tab = use_state(|| Tab::Dashboard);
    let accounts = use_state(Vec::<Account>::new);
    let accounts_loading = use_state(|| true);
    let viewing = use_state(|| None::<String>);
    let refresh = use_state(|| 0u32);
    let import_open = use_state(|| false);
    let accounts_epoch = use_mut_ref(RequestEpoch::default);

    {
        let api = (*api).clone();
        let liveness = liveness.clone();
        use_effect_with_deps(
            move |_| {
                info!("using backend at {}", api.base_url());
                spawn_local(async move {
                    match api.ping().await {
                        Ok(message) => liveness.set(Liveness::Online(message)),
                        Err(err) => {
                            warn!("backend liveness probe failed: {err}");
                            liveness.set(Liveness::Offline);
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let reload_accounts = {
        let api = (*api).clone();
        let accounts = accounts.clone();
        let accounts_loading = accounts_loading.clone();
        let liveness = liveness.clone();
        Callback::from(move |_: ()| {
            let token = accounts_epoch.borrow_mut().begin();
            accounts_loading.set(true);
            let api = api.clone();
            let accounts = accounts.clone();
            let accounts_loading = accounts_loading.clone();
            let liveness = liveness.clone();
            let epoch = accounts_epoch.clone();
            spawn_local(async move {
                let result = api.list_accounts().await;
                if !epoch.borrow().is_current(token) {
                    debug!("dropping stale account list");
                    return;
                }
                if let Err(err) = &result {
                    error!("loading accounts failed: {err}");
                }
                if let Some(next) = liveness_after_account_load(&liveness, result.is_ok()) {
                    info!("backend liveness is now {next:?}");
                    liveness.set(next);
                }
                if let Ok(list) = result {
                    accounts.set(list);
                }
                accounts_loading.set(false);
            });
        })
    };

    {
        let reload_accounts = reload_accounts.clone();
        use_effect_with_deps(
            move |_| {
                reload_accounts.emit(());
                || ()
            },
            (),
        );
    }

    {
        let viewing = viewing.clone();
        use_effect_with_deps(
            move |accounts: &Vec<Account>| {
                let next = reconcile_viewing(viewing.as_deref(), accounts);
                if next != *viewing {
                    debug!("viewing account is now {next:?}");
                    viewing.set(next);
                }
                || ()
            },
            (*accounts).clone(),
        );
    }

    let on_select_tab = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: Tab| active_tab.set(tab))
    };

    let on_view_account = {
        let viewing = viewing.clone();
        Callback::from(move |id: Option<String>| viewing.set(id))
    };

    let open_import = {
        let import_open = import_open.clone();
        Callback::from(move |_: MouseEvent| import_open.set(true))
    };

    let close_import = {
        let import_open = import_open.clone();
        Callback::from(move |_: ()| import_open.set(false))
    };

    let on_uploaded = {
        let api = (*api).clone();
        let refresh = refresh.clone();
        let viewing = viewing.clone();
        let import_open = import_open.clone();
        Callback::from(move |account_id: String| {
            info!("statement imported into {account_id}, refreshing views");
            api.invalidate_account(&account_id);
            refresh.set(refresh.wrapping_add(1));
            viewing.set(Some(account_id));
            import_open.set(false);
        })
    };

    let offline = liveness.is_offline();
    let selector = html! {
        <AccountSelector
            accounts={(*accounts).clone()}
            selected={(*viewing).clone()}
            on_change={on_view_account}
        />
    };

    let content = match *active_tab {
        Tab::Dashboard => page_shell(
            "Dashboard",
            html! {
                <button
                    onclick={open_import}
                    disabled={offline}
                    class="flex items-center gap-2 bg-green-700 hover:bg-green-800 text-white text-sm font-semibold px-4 py-2 rounded-xl disabled:opacity-50 disabled:cursor-not-allowed"
                >
                    { icon_upload() }
                    <span>{"Import Data"}</span>
                </button>
            },
            html! { <Dashboard account_id={(*viewing).clone()} refresh={*refresh} /> },
        ),
        Tab::Accounts => html! {
            <AccountManager
                accounts={(*accounts).clone()}
                loading={*accounts_loading}
                on_changed={reload_accounts.clone()}
            />
        },
        Tab::Transactions => page_shell(
            "Transactions",
            selector,
            html! { <TransactionTable account_id={(*viewing).clone()} refresh={*refresh} /> },
        ),
        Tab::Review => html! { <NeedsReview account_id={(*viewing).clone()} refresh={*refresh} /> },
        Tab::Subscriptions => page_shell(
            "Subscriptions",
            selector,
            html! { <SubscriptionList account_id={(*viewing).clone()} refresh={*refresh} /> },
        ),
        Tab::AskAi => html! { <AskAi account_id={(*viewing).clone()} /> },
    };

    html! {
        <ContextProvider<ApiClient> context={(*api).clone()}>
            <div class="min-h-screen bg-gradient-to-br from-gray-50 to-green-50/30">
                <Header liveness={(*liveness).clone()} />
                <NavTabs active={*active_tab} on_select={on_select_tab} />
                if offline {
                    <OfflineBanner />
                }
                <main>
                    { content }
                </main>
                if *import_open {
                    <Modal
                        title="Import Transactions"
                        subtitle={AttrValue::from("Upload a bank or card statement")}
                        on_close={close_import}
                    >
                        <FileUpload accounts={(*accounts).clone()} on_uploaded={on_uploaded} />
                    </Modal>
                }
            </div>
        </ContextProvider<ApiClient>>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
