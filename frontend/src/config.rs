pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

const API_BASE_URL_KEY: &str = "api_base_url";

pub const PAGE_SIZE: usize = 10;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["csv", "txt", "xlsx", "xls"];

pub const UPLOAD_SUCCESS_DELAY_MS: u32 = 1_500;

pub const CURRENCY_SYMBOL: &str = "₹";

pub const REVIEW_CATEGORIES: [&str; 7] = [
    "Food",
    "Groceries",
    "Shopping",
    "Transport",
    "Travel",
    "Bills & Subscriptions",
    "Miscellaneous",
];

/// Select value for the free-text category escape hatch.
pub const ADD_NEW_CATEGORY: &str = "add_new";

/// Resolves the backend base URL: a `localStorage` override wins over the
/// `API_BASE_URL` baked in at build time, which wins over the local default.
pub fn api_base_url() -> String {
    stored_base_url()
        .or_else(|| option_env!("API_BASE_URL").and_then(normalize_base_url))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn stored_base_url() -> Option<String> {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item(API_BASE_URL_KEY) {
                return normalize_base_url(&raw);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes_and_whitespace() {
        assert_eq!(
            normalize_base_url("  https://api.example.com//  "),
            Some("https://api.example.com".to_string())
        );
        assert_eq!(normalize_base_url("http://127.0.0.1:8000"), Some(DEFAULT_API_BASE_URL.to_string()));
    }

    #[test]
    fn normalize_rejects_blank_values() {
        assert_eq!(normalize_base_url(""), None);
        assert_eq!(normalize_base_url(" / "), None);
    }
}
