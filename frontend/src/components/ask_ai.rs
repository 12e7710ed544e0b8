use log::error;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::layout::{icon_message, page_shell};
use crate::components::use_api;

const FALLBACK_ANSWER: &str = "Sorry, something went wrong. Please try again.";

#[derive(Properties, PartialEq)]
pub struct AskAiProps {
    pub account_id: Option<String>,
}

#[function_component(AskAi)]
pub fn ask_ai(props: &AskAiProps) -> Html {
    let api = use_api();
    let query = use_state(String::new);
    let answer = use_state(|| None::<String>);
    let thinking = use_state(|| false);

    let on_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };

    let on_submit = {
        let api = api.clone();
        let query = query.clone();
        let answer = answer.clone();
        let thinking = thinking.clone();
        let account_id = props.account_id.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let question = query.trim().to_string();
            let Some(account_id) = account_id.clone() else {
                return;
            };
            if question.is_empty() || *thinking {
                return;
            }

            thinking.set(true);
            answer.set(None);
            let api = api.clone();
            let answer = answer.clone();
            let thinking = thinking.clone();
            spawn_local(async move {
                match api.ask(&account_id, &question).await {
                    Ok(text) => answer.set(Some(text)),
                    Err(err) => {
                        error!("AI query for {account_id} failed: {err}");
                        answer.set(Some(FALLBACK_ANSWER.to_string()));
                    }
                }
                thinking.set(false);
            });
        })
    };

    let disabled = *thinking || query.trim().is_empty() || props.account_id.is_none();

    page_shell(
        "Ask AI",
        html! {},
        html! {
            <div class="bg-white/70 backdrop-blur-sm p-8 rounded-2xl border border-gray-200/50 shadow-sm">
                <div class="flex items-center gap-3 mb-6">
                    <div class="w-10 h-10 bg-purple-100 rounded-xl flex items-center justify-center text-purple-600">
                        { icon_message() }
                    </div>
                    <div>
                        <h3 class="text-xl font-bold text-gray-900">{"AI Assistant"}</h3>
                        <p class="text-gray-600 text-sm">{"Ask questions about your financial data"}</p>
                    </div>
                </div>
                <form onsubmit={on_submit} class="space-y-4">
                    <input
                        type="text"
                        value={(*query).clone()}
                        oninput={on_input}
                        placeholder="e.g., How much did I spend on food this month?"
                        class="w-full p-4 border border-gray-200 rounded-xl bg-white/50 focus:ring-2 focus:ring-purple-500/20 focus:border-purple-500"
                    />
                    <button
                        type="submit"
                        disabled={disabled}
                        class="w-full bg-purple-600 hover:bg-purple-700 text-white font-semibold py-3 px-6 rounded-xl disabled:opacity-50 disabled:cursor-not-allowed"
                    >
                        { if *thinking { "Thinking..." } else { "Ask AI" } }
                    </button>
                    if props.account_id.is_none() {
                        <p class="text-sm text-gray-500">{"Select an account to ask about its transactions."}</p>
                    }
                </form>
                if let Some(text) = &*answer {
                    <div class="mt-6 p-6 bg-purple-50 rounded-2xl border border-purple-200/50">
                        <h4 class="font-semibold text-purple-900 mb-2">{"AI Response"}</h4>
                        <p class="text-purple-800 whitespace-pre-wrap leading-relaxed">{ text.clone() }</p>
                    </div>
                }
            </div>
        },
    )
}
