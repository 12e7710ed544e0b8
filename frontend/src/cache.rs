use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Transactions,
    ReviewItems,
    Summary,
    SpendingByCategory,
    Subscriptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub account_id: String,
    pub resource: Resource,
}

impl CacheKey {
    pub fn new(account_id: &str, resource: Resource) -> Self {
        CacheKey {
            account_id: account_id.to_string(),
            resource,
        }
    }
}

pub type ResponseFuture = LocalBoxFuture<'static, Result<Rc<Value>, ApiError>>;
pub type SharedResponse = Shared<ResponseFuture>;

struct Entry {
    id: u64,
    response: SharedResponse,
}

/// Read-through cache of account-scoped GET responses.
///
/// Entries hold the shared request future itself, so a second caller asking
/// for a key whose request is still in flight joins that request instead of
/// issuing its own. Failed entries are evicted by the caller through
/// [`ResponseCache::evict`] so the next attempt goes back to the network.
#[derive(Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, Entry>,
    next_id: u64,
}

impl ResponseCache {
    /// Returns the cached response for `key`, starting `fetch` only when
    /// nothing is cached yet. The returned id identifies the entry for
    /// [`ResponseCache::evict`].
    pub fn get_or_fetch<F>(&mut self, key: CacheKey, fetch: F) -> (u64, SharedResponse)
    where
        F: FnOnce() -> ResponseFuture,
    {
        if let Some(entry) = self.entries.get(&key) {
            log::debug!("cache hit for {:?} on account {}", key.resource, key.account_id);
            return (entry.id, entry.response.clone());
        }

        self.next_id += 1;
        let id = self.next_id;
        let response = fetch().shared();
        self.entries.insert(
            key,
            Entry {
                id,
                response: response.clone(),
            },
        );
        (id, response)
    }

    /// Drops the entry for `key` if it is still the one identified by `id`.
    pub fn evict(&mut self, key: &CacheKey, id: u64) {
        if self.entries.get(key).map(|entry| entry.id) == Some(id) {
            self.entries.remove(key);
        }
    }

    pub fn invalidate_account(&mut self, account_id: &str) {
        self.entries.retain(|key, _| key.account_id != account_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Awaits an entry's response and decodes it. The entry is evicted when
/// either the request or the decode fails, so a bad body is not served
/// again.
pub async fn resolve<T>(
    cache: &RefCell<ResponseCache>,
    key: &CacheKey,
    id: u64,
    response: SharedResponse,
    decode: impl FnOnce(&Value) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let result = response.await.and_then(|json| decode(&json));
    if result.is_err() {
        cache.borrow_mut().evict(key, id);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde::Deserialize;
    use serde_json::json;
    use std::cell::Cell;

    fn counting_fetch(calls: &Rc<Cell<u32>>, result: Result<Value, ApiError>) -> ResponseFuture {
        let calls = calls.clone();
        async move {
            calls.set(calls.get() + 1);
            result.map(Rc::new)
        }
        .boxed_local()
    }

    #[test]
    fn concurrent_requests_for_same_key_share_one_fetch() {
        let mut cache = ResponseCache::default();
        let calls = Rc::new(Cell::new(0));
        let key = CacheKey::new("acc-1", Resource::Transactions);

        let (_, first) = cache.get_or_fetch(key.clone(), || counting_fetch(&calls, Ok(json!([1, 2]))));
        let (_, second) = cache.get_or_fetch(key, || counting_fetch(&calls, Ok(json!([3]))));

        let (a, b) = block_on(futures::future::join(first, second));
        assert_eq!(*a.unwrap(), json!([1, 2]));
        assert_eq!(*b.unwrap(), json!([1, 2]));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn keys_are_scoped_by_account_and_resource() {
        let mut cache = ResponseCache::default();
        let calls = Rc::new(Cell::new(0));

        let (_, a) = cache.get_or_fetch(CacheKey::new("acc-1", Resource::Summary), || {
            counting_fetch(&calls, Ok(json!({})))
        });
        let (_, b) = cache.get_or_fetch(CacheKey::new("acc-2", Resource::Summary), || {
            counting_fetch(&calls, Ok(json!({})))
        });
        let (_, c) = cache.get_or_fetch(CacheKey::new("acc-1", Resource::Subscriptions), || {
            counting_fetch(&calls, Ok(json!([])))
        });
        block_on(futures::future::join3(a, b, c));

        assert_eq!(calls.get(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn failed_entries_are_evicted_and_refetched() {
        let mut cache = ResponseCache::default();
        let calls = Rc::new(Cell::new(0));
        let key = CacheKey::new("acc-1", Resource::ReviewItems);

        let (id, failing) = cache.get_or_fetch(key.clone(), || {
            counting_fetch(&calls, Err(ApiError::Network("offline".to_string())))
        });
        assert!(block_on(failing).is_err());
        cache.evict(&key, id);

        let (_, retry) = cache.get_or_fetch(key, || counting_fetch(&calls, Ok(json!([]))));
        assert!(block_on(retry).is_ok());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn evict_leaves_newer_entry_alone() {
        let mut cache = ResponseCache::default();
        let calls = Rc::new(Cell::new(0));
        let key = CacheKey::new("acc-1", Resource::Summary);

        let (old_id, _old) = cache.get_or_fetch(key.clone(), || counting_fetch(&calls, Ok(json!(1))));
        cache.invalidate_account("acc-1");
        let (new_id, _new) = cache.get_or_fetch(key.clone(), || counting_fetch(&calls, Ok(json!(2))));

        cache.evict(&key, old_id);
        assert_ne!(old_id, new_id);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_account_keeps_other_accounts() {
        let mut cache = ResponseCache::default();
        let calls = Rc::new(Cell::new(0));
        for account in ["acc-1", "acc-2"] {
            for resource in [Resource::Transactions, Resource::Summary] {
                let (_, pending) = cache.get_or_fetch(CacheKey::new(account, resource), || {
                    counting_fetch(&calls, Ok(json!(null)))
                });
                drop(pending);
            }
        }

        cache.invalidate_account("acc-1");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn undecodable_responses_are_evicted() {
        let cache = RefCell::new(ResponseCache::default());
        let calls = Rc::new(Cell::new(0));
        let key = CacheKey::new("acc-1", Resource::Summary);

        let (id, response) = cache
            .borrow_mut()
            .get_or_fetch(key.clone(), || counting_fetch(&calls, Ok(json!("not a summary"))));
        let decoded: Result<Vec<u32>, ApiError> = block_on(resolve(&cache, &key, id, response, |json| {
            Ok(Vec::<u32>::deserialize(json)?)
        }));
        assert!(matches!(decoded, Err(ApiError::Decode(_))));
        assert_eq!(cache.borrow().len(), 0);

        let (id, response) = cache
            .borrow_mut()
            .get_or_fetch(key.clone(), || counting_fetch(&calls, Ok(json!([4, 2]))));
        let decoded = block_on(resolve(&cache, &key, id, response, |json| {
            Ok(Vec::<u32>::deserialize(json)?)
        }));
        assert_eq!(decoded.unwrap(), vec![4, 2]);
        assert_eq!(cache.borrow().len(), 1);
        assert_eq!(calls.get(), 2);
    }
}
