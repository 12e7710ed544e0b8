pub mod accounts;
pub mod ask_ai;
pub mod dashboard;
pub mod file_upload;
pub mod layout;
pub mod needs_review;
pub mod subscriptions;
pub mod transaction_table;

use yew::prelude::*;

use crate::api::ApiClient;
use crate::config::api_base_url;

/// Props shared by every view that shows one account's data. Views refetch
/// whenever either field changes.
#[derive(Properties, PartialEq)]
pub struct AccountViewProps {
    pub account_id: Option<String>,
    #[prop_or_default]
    pub refresh: u32,
}

/// The client provided by the app root.
#[hook]
pub fn use_api() -> ApiClient {
    let fallback = use_memo(|_| ApiClient::new(api_base_url()), ());
    use_context::<ApiClient>().unwrap_or_else(|| (*fallback).clone())
}
