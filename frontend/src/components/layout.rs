use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, KeyboardEvent};
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Accounts,
    Transactions,
    Review,
    Subscriptions,
    AskAi,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Accounts,
        Tab::Transactions,
        Tab::Review,
        Tab::Subscriptions,
        Tab::AskAi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Accounts => "Accounts",
            Tab::Transactions => "Transactions",
            Tab::Review => "Review",
            Tab::Subscriptions => "Subscriptions",
            Tab::AskAi => "Ask AI",
        }
    }

    fn icon(self) -> Html {
        match self {
            Tab::Dashboard => icon_layout_grid(),
            Tab::Accounts => icon_wallet(),
            Tab::Transactions => icon_credit_card(),
            Tab::Review => icon_alert_circle(),
            Tab::Subscriptions => icon_repeat(),
            Tab::AskAi => icon_message(),
        }
    }
}

/// Result of the `GET /` probe.
#[derive(Clone, Debug, PartialEq)]
pub enum Liveness {
    Checking,
    Online(String),
    Offline,
}

impl Liveness {
    pub fn is_offline(&self) -> bool {
        matches!(self, Liveness::Offline)
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub liveness: Liveness,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let (dot, text_class, message) = match &props.liveness {
        Liveness::Checking => ("bg-gray-400", "text-gray-500", "Loading...".to_string()),
        Liveness::Online(message) => ("bg-green-500", "text-green-700", message.clone()),
        Liveness::Offline => ("bg-amber-500", "text-amber-700", "Backend Offline".to_string()),
    };

    html! {
        <header class="bg-white/80 backdrop-blur-sm border-b border-gray-200/50 h-16 flex items-center justify-between px-6">
            <div class="flex items-center gap-3">
                <div class="w-10 h-10 bg-green-700 rounded-xl flex items-center justify-center text-white">
                    { icon_trending_up() }
                </div>
                <span class="text-xl font-black tracking-tight text-gray-900">{"Finance Tracker"}</span>
            </div>
            <div class="flex items-center gap-2">
                <span class={classes!("w-2", "h-2", "rounded-full", dot)}></span>
                <span class={classes!("text-sm", "font-medium", text_class)}>{ message }</span>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub struct NavTabsProps {
    pub active: Tab,
    pub on_select: Callback<Tab>,
}

#[function_component(NavTabs)]
pub fn nav_tabs(props: &NavTabsProps) -> Html {
    html! {
        <nav class="flex gap-2 px-6 py-3 border-b border-gray-200/50 bg-white/60 overflow-x-auto">
            { for Tab::ALL.iter().map(|tab| {
                let tab = *tab;
                let class_name = if tab == props.active {
                    "flex items-center gap-2 px-4 py-2 rounded-xl text-sm font-semibold bg-green-700 text-white whitespace-nowrap"
                } else {
                    "flex items-center gap-2 px-4 py-2 rounded-xl text-sm font-medium text-gray-600 hover:bg-gray-100 whitespace-nowrap"
                };
                let on_select = props.on_select.clone();
                html! {
                    <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(tab))}>
                        <span class="shrink-0">{ tab.icon() }</span>
                        <span>{ tab.label() }</span>
                    </button>
                }
            }) }
        </nav>
    }
}

#[function_component(OfflineBanner)]
pub fn offline_banner() -> Html {
    html! {
        <div class="mx-6 mt-4 p-4 rounded-xl border border-amber-200 bg-amber-50 text-amber-800 text-sm flex items-center gap-3">
            { icon_alert_circle() }
            <span>{"Cannot reach the backend. Start the API server and reload the page."}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub subtitle: Option<AttrValue>,
    pub on_close: Callback<()>,
    pub children: Children,
}

/// Overlay dialog. Closes on the close button, a backdrop click or Escape,
/// and locks page scrolling while mounted.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    {
        let on_close = props.on_close.clone();
        use_effect_with_deps(
            move |_| {
                let document = web_sys::window().and_then(|window| window.document());
                let listener = document.as_ref().map(|document| {
                    EventListener::new(document, "keydown", move |event| {
                        let escape = event
                            .dyn_ref::<KeyboardEvent>()
                            .map_or(false, |event| event.key() == "Escape");
                        if escape {
                            on_close.emit(());
                        }
                    })
                });
                set_body_overflow(document.as_ref(), "hidden");

                move || {
                    drop(listener);
                    set_body_overflow(document.as_ref(), "");
                }
            },
            (),
        );
    }

    let close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center p-4">
            <div class="absolute inset-0 bg-black/50 backdrop-blur-sm" onclick={close.clone()} aria-hidden="true"></div>
            <div class="relative bg-white/95 rounded-2xl shadow-2xl w-full max-w-2xl max-h-[90vh] overflow-hidden border border-gray-200/50">
                <div class="flex items-center justify-between p-6 border-b border-gray-200/50">
                    <div>
                        <h3 class="text-xl font-bold text-gray-900">{ props.title.clone() }</h3>
                        if let Some(subtitle) = &props.subtitle {
                            <p class="text-gray-600 text-sm mt-1">{ subtitle.clone() }</p>
                        }
                    </div>
                    <button onclick={close} class="p-2 text-gray-400 hover:text-gray-600 hover:bg-gray-100 rounded-xl" aria-label="Close modal">
                        { icon_x() }
                    </button>
                </div>
                <div class="p-6 overflow-y-auto max-h-[calc(90vh-120px)]">
                    { for props.children.iter() }
                </div>
            </div>
        </div>
    }
}

fn set_body_overflow(document: Option<&Document>, value: &str) {
    if let Some(body) = document.and_then(|document| document.body()) {
        let _ = body.style().set_property("overflow", value);
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-gray-200/50">
                <h1 class="text-2xl font-bold text-gray-900">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

/// Prompt shown by account views while no account is selected.
pub fn select_account_hint(what: &'static str) -> Html {
    html! {
        <div class="bg-white/70 p-8 rounded-2xl border border-gray-200/50 text-center text-gray-500">
            { format!("Select an account to view {what}.") }
        </div>
    }
}

pub fn error_notice(message: &str) -> Html {
    html! {
        <div class="p-4 rounded-xl border border-red-200 bg-red-50 text-red-700 text-sm">
            { message.to_string() }
        </div>
    }
}

pub fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
pub fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
pub fn icon_trending_down() -> Html {
    icon_base("M3 7l6 6 4-4 7 7")
}
pub fn icon_arrow_down_circle() -> Html {
    icon_base("M12 21a9 9 0 100-18 9 9 0 000 18zM8 12l4 4 4-4M12 8v8")
}
pub fn icon_arrow_up_circle() -> Html {
    icon_base("M12 21a9 9 0 100-18 9 9 0 000 18zM16 12l-4-4-4 4M12 16V8")
}
pub fn icon_hash() -> Html {
    icon_base("M4 9h16M4 15h16M10 3L8 21M16 3l-2 18")
}
pub fn icon_alert_circle() -> Html {
    icon_base("M12 21a9 9 0 100-18 9 9 0 000 18zM12 8v4M12 16h.01")
}
pub fn icon_check_circle() -> Html {
    icon_base("M22 11.08V12a10 10 0 11-5.93-9.14M22 4L12 14.01l-3-3")
}
pub fn icon_repeat() -> Html {
    icon_base("M17 1l4 4-4 4M3 11V9a4 4 0 014-4h14M7 23l-4-4 4-4M21 13v2a4 4 0 01-4 4H3")
}
pub fn icon_message() -> Html {
    icon_base("M21 15a2 2 0 01-2 2H7l-4 4V5a2 2 0 012-2h14a2 2 0 012 2z")
}
pub fn icon_upload() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M17 8l-5-5-5 5M12 3v12")
}
pub fn icon_x() -> Html {
    icon_base("M18 6L6 18M6 6l12 12")
}
pub fn icon_search() -> Html {
    icon_base("M11 19a8 8 0 100-16 8 8 0 000 16zM21 21l-4.35-4.35")
}
pub fn icon_chevron_left() -> Html {
    icon_base("M15 18l-6-6 6-6")
}
pub fn icon_chevron_right() -> Html {
    icon_base("M9 18l6-6-6-6")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_pencil() -> Html {
    icon_base("M17 3a2.83 2.83 0 014 4L7.5 20.5 2 22l1.5-5.5z")
}
pub fn icon_trash() -> Html {
    icon_base("M3 6h18M19 6v14a2 2 0 01-2 2H7a2 2 0 01-2-2V6M8 6V4a2 2 0 012-2h4a2 2 0 012 2v2")
}
