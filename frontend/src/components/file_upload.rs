use gloo_timers::future::TimeoutFuture;
use log::{error, info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::layout::{icon_alert_circle, icon_check_circle, icon_upload};
use crate::components::use_api;
use crate::config::UPLOAD_SUCCESS_DELAY_MS;
use crate::models::Account;
use crate::state::accounts::account_type_icon;
use crate::state::upload::{validate_upload, UploadEvent, UploadStatus};

#[derive(Properties, PartialEq)]
pub struct FileUploadProps {
    pub accounts: Vec<Account>,
    /// Receives the target account id once the success delay has passed.
    pub on_uploaded: Callback<String>,
}

#[function_component(FileUpload)]
pub fn file_upload(props: &FileUploadProps) -> Html {
    let api = use_api();
    let status = use_reducer(|| UploadStatus::Idle);
    let selected = use_state(|| None::<String>);
    let drag_active = use_state(|| false);
    let input_ref = use_node_ref();

    // an explicit choice wins while it still exists, else the first account
    let account_id = (*selected)
        .clone()
        .filter(|id| props.accounts.iter().any(|account| &account.id == id))
        .or_else(|| props.accounts.first().map(|account| account.id.clone()));
    let account_kind = account_id
        .as_ref()
        .and_then(|id| props.accounts.iter().find(|account| &account.id == id))
        .map(|account| account.kind.clone())
        .unwrap_or_default();

    let handle_file = {
        let api = api.clone();
        let status = status.clone();
        let input_ref = input_ref.clone();
        let on_uploaded = props.on_uploaded.clone();
        let account_id = account_id.clone();
        Callback::from(move |file: File| {
            if !status.accepts_file() {
                return;
            }
            let name = file.name();
            let target = match validate_upload(account_id.as_deref(), &name, file.size() as u64) {
                Ok(id) => id.to_string(),
                Err(err) => {
                    warn!("rejected upload of {name:?}: {err}");
                    status.dispatch(UploadEvent::Failed(err.to_string()));
                    clear_input(&input_ref);
                    return;
                }
            };

            status.dispatch(UploadEvent::Started);
            let on_progress = {
                let status = status.clone();
                Callback::from(move |percent: u8| status.dispatch(UploadEvent::Progress(percent)))
            };

            let api = api.clone();
            let status = status.clone();
            let input_ref = input_ref.clone();
            let on_uploaded = on_uploaded.clone();
            spawn_local(async move {
                match api.upload_statement(&target, &file, on_progress).await {
                    Ok(message) => {
                        info!("uploaded {name:?} to account {target}: {message}");
                        status.dispatch(UploadEvent::Succeeded);
                        clear_input(&input_ref);
                        TimeoutFuture::new(UPLOAD_SUCCESS_DELAY_MS).await;
                        status.dispatch(UploadEvent::Reset);
                        on_uploaded.emit(target);
                    }
                    Err(err) => {
                        error!("upload of {name:?} to account {target} failed: {err}");
                        status.dispatch(UploadEvent::Failed(
                            err.user_message("Failed to upload file. Please try again."),
                        ));
                        clear_input(&input_ref);
                    }
                }
            });
        })
    };

    let on_select_account = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            selected.set(Some(select.value()));
        })
    };

    let on_file_change = {
        let handle_file = handle_file.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                handle_file.emit(file);
            }
        })
    };

    let on_drag_over = {
        let drag_active = drag_active.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(true);
        })
    };

    let on_drag_leave = {
        let drag_active = drag_active.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(false);
        })
    };

    let on_drop = {
        let drag_active = drag_active.clone();
        let handle_file = handle_file.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            drag_active.set(false);
            let file = e
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                handle_file.emit(file);
            }
        })
    };

    let on_retry = {
        let status = status.clone();
        let input_ref = input_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            status.dispatch(UploadEvent::Reset);
            clear_input(&input_ref);
        })
    };

    let uploading = status.is_uploading();
    let zone_class = if *drag_active {
        "border-green-400 bg-green-50"
    } else {
        match &*status {
            UploadStatus::Success => "border-green-300 bg-green-50",
            UploadStatus::Error(_) => "border-red-300 bg-red-50",
            _ => "border-gray-300 bg-gray-50 hover:border-green-400 hover:bg-green-50",
        }
    };

    let zone_body = match &*status {
        UploadStatus::Idle => html! {
            <>
                <div class={classes!("mb-4", if *drag_active { "text-green-500" } else { "text-gray-400" })}>{ icon_upload() }</div>
                <p class="mb-2 text-sm text-gray-500">
                    <span class="font-semibold">{"Click to upload"}</span>{" or drag and drop"}
                </p>
                <p class="text-xs text-gray-500">{"CSV, TXT, Excel files (Max 10MB)"}</p>
            </>
        },
        UploadStatus::Uploading { progress } => html! {
            <>
                <div class="mb-4 text-green-500 animate-spin">{ icon_upload() }</div>
                <p class="mb-2 text-sm text-gray-700 font-semibold">{"Uploading..."}</p>
                <div class="w-48 bg-gray-200 rounded-full h-2 mb-2">
                    <div class="bg-green-500 h-2 rounded-full transition-all duration-300" style={format!("width: {progress}%")}></div>
                </div>
                <p class="text-xs text-gray-500">{ format!("{progress}% complete") }</p>
            </>
        },
        UploadStatus::Success => html! {
            <>
                <div class="mb-4 text-green-500">{ icon_check_circle() }</div>
                <p class="mb-2 text-sm text-green-700 font-semibold">{"Upload successful!"}</p>
                <p class="text-xs text-green-600">{"Processing your transactions..."}</p>
            </>
        },
        UploadStatus::Error(message) => html! {
            <>
                <div class="mb-4 text-red-500">{ icon_alert_circle() }</div>
                <p class="mb-2 text-sm text-red-700 font-semibold">{"Upload failed"}</p>
                <p class="text-xs text-red-600 mb-4 text-center max-w-xs">{ message.clone() }</p>
                <button onclick={on_retry} class="px-4 py-2 bg-red-500 text-white text-sm font-medium rounded-lg hover:bg-red-600">
                    {"Try Again"}
                </button>
            </>
        },
    };

    html! {
        <div class="space-y-6">
            <div class="space-y-3">
                <label for="account-select" class="block text-sm font-semibold text-gray-700">{"Select Account"}</label>
                <div class="relative">
                    <select
                        id="account-select"
                        onchange={on_select_account}
                        disabled={uploading}
                        class="w-full p-3 pl-10 border border-gray-200 rounded-xl bg-white/50 disabled:opacity-50"
                    >
                        <option value="" disabled={true} selected={account_id.is_none()}>{"Choose an account"}</option>
                        { for props.accounts.iter().map(|account| html! {
                            <option value={account.id.clone()} selected={account_id.as_deref() == Some(account.id.as_str())}>
                                { format!("{} ({})", account.name, account.kind) }
                            </option>
                        }) }
                    </select>
                    <div class="absolute left-3 top-1/2 -translate-y-1/2 text-gray-400">{ account_type_icon(&account_kind) }</div>
                </div>
            </div>

            <div class="space-y-4">
                <label class="block text-sm font-semibold text-gray-700">{"Upload Transaction File"}</label>
                <div
                    class={classes!("relative", "border-2", "border-dashed", "rounded-2xl", "transition-all", zone_class)}
                    ondragenter={on_drag_over.clone()}
                    ondragover={on_drag_over}
                    ondragleave={on_drag_leave}
                    ondrop={on_drop}
                >
                    <label
                        for="file-upload"
                        class={classes!("flex", "flex-col", "items-center", "justify-center", "w-full", "h-64", "cursor-pointer", uploading.then_some("cursor-not-allowed"))}
                    >
                        <div class="flex flex-col items-center justify-center pt-5 pb-6">
                            { zone_body }
                        </div>
                        <input
                            ref={input_ref}
                            id="file-upload"
                            type="file"
                            accept=".csv,.txt,.xlsx,.xls"
                            onchange={on_file_change}
                            disabled={uploading}
                            class="hidden"
                        />
                    </label>
                </div>
            </div>

            <div class="bg-blue-50 border border-blue-200 rounded-xl p-4">
                <h4 class="text-sm font-semibold text-blue-900 mb-1">{"Supported File Formats"}</h4>
                <ul class="text-xs text-blue-800 space-y-1">
                    <li>{"• CSV files (.csv)"}</li>
                    <li>{"• Text files (.txt)"}</li>
                    <li>{"• Excel files (.xlsx, .xls)"}</li>
                </ul>
            </div>
        </div>
    }
}

fn clear_input(input_ref: &NodeRef) {
    if let Some(input) = input_ref.cast::<HtmlInputElement>() {
        input.set_value("");
    }
}
