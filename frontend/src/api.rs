use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::FutureExt;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};
use yew::Callback;

use crate::cache::{resolve, CacheKey, Resource, ResponseCache};
use crate::error::{check_status_body, ApiError};
use crate::models::{
    Account, AiQuery, BackendStatus, CategoryTotal, CategoryUpdate, QueryAnswer, Subscription,
    Summary, Transaction,
};
use crate::state::accounts::AccountDraft;
use crate::state::upload::progress_percent;

/// Client for the finance backend. Account-scoped reads go through a shared
/// [`ResponseCache`]; writes invalidate what they touch.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<str>,
    cache: Rc<RefCell<ResponseCache>>,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: Rc::from(base_url.into()),
            cache: Rc::new(RefCell::new(ResponseCache::default())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness probe; returns the greeting the backend serves at `/`.
    pub async fn ping(&self) -> Result<String, ApiError> {
        let response = Request::get(&self.url("/")).send().await?;
        let status: BackendStatus = read_json(response).await?;
        Ok(status.message)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let response = Request::get(&self.url("/accounts/")).send().await?;
        read_json(response).await
    }

    pub async fn create_account(&self, draft: &AccountDraft) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/accounts/")).json(draft)?.send().await?;
        read_status(response).await
    }

    pub async fn update_account(&self, account_id: &str, draft: &AccountDraft) -> Result<(), ApiError> {
        let response = Request::patch(&self.url(&format!("/accounts/{account_id}")))
            .json(draft)?
            .send()
            .await?;
        read_status(response).await?;
        self.invalidate_account(account_id);
        Ok(())
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<(), ApiError> {
        let response = Request::delete(&self.url(&format!("/accounts/{account_id}")))
            .send()
            .await?;
        read_status(response).await?;
        self.invalidate_account(account_id);
        Ok(())
    }

    pub async fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>, ApiError> {
        let url = self.url(&format!("/transactions/?account_id={account_id}"));
        self.cached(CacheKey::new(account_id, Resource::Transactions), url).await
    }

    pub async fn list_review_items(&self, account_id: &str) -> Result<Vec<Transaction>, ApiError> {
        let url = self.url(&format!("/transactions/review/?account_id={account_id}"));
        self.cached(CacheKey::new(account_id, Resource::ReviewItems), url).await
    }

    /// Persists a category and drops every cached view of the account, since
    /// the transaction list, review queue and analytics all depend on it.
    pub async fn update_category(
        &self,
        account_id: &str,
        transaction_id: &str,
        category: &str,
    ) -> Result<(), ApiError> {
        let response = Request::patch(&self.url(&format!("/transactions/{transaction_id}")))
            .json(&CategoryUpdate { category })?
            .send()
            .await?;
        read_status(response).await?;
        self.invalidate_account(account_id);
        Ok(())
    }

    pub async fn summary(&self, account_id: &str) -> Result<Summary, ApiError> {
        let url = self.url(&format!("/analytics/summary/{account_id}"));
        self.cached(CacheKey::new(account_id, Resource::Summary), url).await
    }

    pub async fn spending_by_category(&self, account_id: &str) -> Result<Vec<CategoryTotal>, ApiError> {
        let url = self.url(&format!("/analytics/spending_by_category/{account_id}"));
        self.cached(CacheKey::new(account_id, Resource::SpendingByCategory), url)
            .await
    }

    pub async fn subscriptions(&self, account_id: &str) -> Result<Vec<Subscription>, ApiError> {
        let url = self.url(&format!("/analytics/subscriptions/{account_id}"));
        self.cached(CacheKey::new(account_id, Resource::Subscriptions), url).await
    }

    pub async fn ask(&self, account_id: &str, query: &str) -> Result<String, ApiError> {
        let response = Request::post(&self.url(&format!("/analytics/query/{account_id}")))
            .json(&AiQuery { query })?
            .send()
            .await?;
        let answer: QueryAnswer = read_json(response).await?;
        Ok(answer.answer)
    }

    /// Multipart upload of a statement file. Goes through `XMLHttpRequest`
    /// because fetch exposes no upload progress; `on_progress` receives
    /// whole percentages.
    pub async fn upload_statement(
        &self,
        account_id: &str,
        file: &File,
        on_progress: Callback<u8>,
    ) -> Result<String, ApiError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;
        form.append_with_str("account_id", account_id)
            .map_err(js_error)?;

        let xhr = XmlHttpRequest::new().map_err(js_error)?;
        xhr.open("POST", &self.url("/uploadfile/")).map_err(js_error)?;

        let progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            if event.length_computable() {
                on_progress.emit(progress_percent(event.loaded(), event.total()));
            }
        });
        xhr.upload()
            .map_err(js_error)?
            .set_onprogress(Some(progress.as_ref().unchecked_ref()));

        let (sender, receiver) = oneshot::channel::<()>();
        let mut sender = Some(sender);
        let finished = Closure::<dyn FnMut()>::new(move || {
            if let Some(sender) = sender.take() {
                let _ = sender.send(());
            }
        });
        xhr.set_onloadend(Some(finished.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form)).map_err(js_error)?;
        let _ = receiver.await;
        drop(progress);
        drop(finished);

        let status = xhr.status().map_err(js_error)?;
        let body = xhr.response_text().map_err(js_error)?.unwrap_or_default();
        if status == 0 {
            return Err(ApiError::Network("upload did not reach the backend".to_string()));
        }
        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status, &body));
        }

        let json: Value = serde_json::from_str(&body)?;
        check_status_body(&json)?;
        self.invalidate_account(account_id);
        Ok(json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Upload complete.")
            .to_string())
    }

    pub fn invalidate_account(&self, account_id: &str) {
        self.cache.borrow_mut().invalidate_account(account_id);
    }

    async fn cached<T: DeserializeOwned>(&self, key: CacheKey, url: String) -> Result<T, ApiError> {
        let (id, response) = self.cache.borrow_mut().get_or_fetch(key.clone(), move || {
            async move {
                let response = Request::get(&url).send().await?;
                let json: Value = read_json(response).await?;
                Ok(Rc::new(json))
            }
            .boxed_local()
        });

        resolve(&self.cache, &key, id, response, |json| Ok(T::deserialize(json)?)).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }
    Ok(response.json::<T>().await?)
}

/// Mutation responses only matter for their status; the views re-fetch
/// afterwards instead of trusting the body.
async fn read_status(response: Response) -> Result<(), ApiError> {
    let body: Value = read_json(response).await?;
    check_status_body(&body)
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Network(format!("{err:?}"))
}
