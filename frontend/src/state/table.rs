use std::cmp::Ordering;
use std::rc::Rc;

use yew::Reducible;

use crate::config::PAGE_SIZE;
use crate::models::Transaction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Description,
    Category,
    Amount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Clicking the active column flips its direction; any other column
    /// starts ascending.
    pub fn toggled(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        match current {
            Some(SortConfig {
                key: active,
                direction: SortDirection::Ascending,
            }) if active == key => SortConfig {
                key,
                direction: SortDirection::Descending,
            },
            _ => SortConfig {
                key,
                direction: SortDirection::Ascending,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableFilter {
    pub search: String,
    pub category: Option<String>,
    pub confidence: Option<String>,
}

impl TableFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = contains_lowercase(tx.description.as_deref(), &needle)
            || contains_lowercase(tx.category.as_deref(), &needle);
        let matches_category = match &self.category {
            Some(category) => tx.category.as_deref() == Some(category.as_str()),
            None => true,
        };
        let matches_confidence = match &self.confidence {
            Some(confidence) => tx.confidence.as_deref() == Some(confidence.as_str()),
            None => true,
        };
        matches_search && matches_category && matches_confidence
    }
}

fn contains_lowercase(haystack: Option<&str>, needle: &str) -> bool {
    haystack.unwrap_or("").to_lowercase().contains(needle)
}

pub fn filter_transactions<'a>(rows: &'a [Transaction], filter: &TableFilter) -> Vec<&'a Transaction> {
    rows.iter().filter(|tx| filter.matches(tx)).collect()
}

/// Stable sort: rows comparing equal keep their input order in both
/// directions.
pub fn sort_transactions(rows: &mut [&Transaction], sort: SortConfig) {
    rows.sort_by(|a, b| match sort.direction {
        SortDirection::Ascending => compare_by(a, b, sort.key),
        SortDirection::Descending => compare_by(b, a, sort.key),
    });
}

fn compare_by(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Amount => a.amount.unwrap_or(0.0).total_cmp(&b.amount.unwrap_or(0.0)),
        SortKey::Date => text_key(&a.date).cmp(text_key(&b.date)),
        SortKey::Description => text_key(&a.description).cmp(text_key(&b.description)),
        SortKey::Category => text_key(&a.category).cmp(text_key(&b.category)),
    }
}

fn text_key(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (len + page_size - 1) / page_size
}

/// Rows on 1-based `page`; out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableAction {
    Loaded(Vec<Transaction>),
    Search(String),
    FilterCategory(Option<String>),
    FilterConfidence(Option<String>),
    SortBy(SortKey),
    NextPage,
    PrevPage,
    GoToPage(usize),
    ClearFilters,
}

/// Everything the transaction table shows, as one reducer value.
#[derive(Clone, Debug, PartialEq)]
pub struct TableState {
    rows: Rc<Vec<Transaction>>,
    pub filter: TableFilter,
    pub sort: Option<SortConfig>,
    pub page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        TableState {
            rows: Rc::new(Vec::new()),
            filter: TableFilter::default(),
            sort: None,
            page: 1,
        }
    }
}

impl TableState {
    pub fn apply(&self, action: TableAction) -> TableState {
        let mut next = self.clone();
        match action {
            TableAction::Loaded(rows) => {
                next = TableState {
                    rows: Rc::new(rows),
                    ..TableState::default()
                };
            }
            TableAction::Search(search) => {
                next.filter.search = search;
                next.page = 1;
            }
            TableAction::FilterCategory(category) => {
                next.filter.category = category;
                next.page = 1;
            }
            TableAction::FilterConfidence(confidence) => {
                next.filter.confidence = confidence;
                next.page = 1;
            }
            TableAction::SortBy(key) => {
                next.sort = Some(SortConfig::toggled(self.sort, key));
                next.page = 1;
            }
            TableAction::NextPage => next.page = self.clamp_page(self.page + 1),
            TableAction::PrevPage => next.page = self.clamp_page(self.page.saturating_sub(1)),
            TableAction::GoToPage(page) => next.page = self.clamp_page(page),
            TableAction::ClearFilters => {
                next.filter = TableFilter::default();
                next.sort = None;
                next.page = 1;
            }
        }
        next
    }

    fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    /// Filtered and sorted rows across all pages.
    pub fn visible(&self) -> Vec<&Transaction> {
        let mut rows = filter_transactions(&self.rows, &self.filter);
        if let Some(sort) = self.sort {
            sort_transactions(&mut rows, sort);
        }
        rows
    }

    pub fn total_pages(&self) -> usize {
        page_count(self.visible().len(), PAGE_SIZE)
    }

    pub fn page_rows(&self) -> Vec<&Transaction> {
        paginate(&self.visible(), self.page, PAGE_SIZE).to_vec()
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.rows.iter().filter_map(|tx| tx.category.as_deref()))
    }

    pub fn confidences(&self) -> Vec<String> {
        distinct(self.rows.iter().filter_map(|tx| tx.confidence.as_deref()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|v| v == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

impl Reducible for TableState {
    type Action = TableAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: Option<f64>, category: Option<&str>, confidence: Option<&str>) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: None,
            description: Some(format!("Payment {id}")),
            amount,
            category: category.map(str::to_string),
            confidence: confidence.map(str::to_string),
        }
    }

    fn ids(rows: &[&Transaction]) -> Vec<String> {
        rows.iter().map(|tx| tx.id.clone()).collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", Some(-120.0), Some("Food"), Some("High")),
            tx("2", Some(75.5), Some("Travel"), Some("Low")),
            tx("3", Some(-20.0), Some("Food"), Some("Low")),
            tx("4", None, None, None),
            tx("5", Some(300.0), Some("Shopping"), Some("Medium")),
        ]
    }

    fn loaded(rows: Vec<Transaction>) -> TableState {
        TableState::default().apply(TableAction::Loaded(rows))
    }

    #[test]
    fn scenario_filter_and_sort() {
        let rows = vec![
            tx("10", Some(-50.0), Some("Food"), None),
            tx("11", Some(200.0), Some("Income"), None),
        ];
        let state = loaded(rows);

        let food = state.apply(TableAction::FilterCategory(Some("Food".to_string())));
        assert_eq!(ids(&food.visible()), vec!["10"]);

        let sorted = state.apply(TableAction::SortBy(SortKey::Amount));
        assert_eq!(ids(&sorted.visible()), vec!["10", "11"]);
    }

    #[test]
    fn category_filter_only_yields_that_category() {
        let state = loaded(sample()).apply(TableAction::FilterCategory(Some("Food".to_string())));
        let visible = state.visible();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|tx| tx.category.as_deref() == Some("Food")));
    }

    #[test]
    fn filters_combine_with_and() {
        let state = loaded(sample())
            .apply(TableAction::FilterCategory(Some("Food".to_string())))
            .apply(TableAction::FilterConfidence(Some("Low".to_string())));
        assert_eq!(ids(&state.visible()), vec!["3"]);

        let state = state.apply(TableAction::Search("payment 1".to_string()));
        assert!(state.visible().is_empty());
    }

    #[test]
    fn search_matches_description_or_category_case_insensitively() {
        let state = loaded(sample()).apply(TableAction::Search("TRAVEL".to_string()));
        assert_eq!(ids(&state.visible()), vec!["2"]);

        let state = state.apply(TableAction::Search("payment 5".to_string()));
        assert_eq!(ids(&state.visible()), vec!["5"]);
    }

    #[test]
    fn amount_sort_descending_reverses_ascending_for_distinct_amounts() {
        let rows: Vec<Transaction> = sample().into_iter().filter(|tx| tx.amount.is_some()).collect();
        let asc = loaded(rows).apply(TableAction::SortBy(SortKey::Amount));
        let desc = asc.apply(TableAction::SortBy(SortKey::Amount));

        assert_eq!(desc.sort.map(|s| s.direction), Some(SortDirection::Descending));
        let mut reversed = ids(&asc.visible());
        reversed.reverse();
        assert_eq!(ids(&desc.visible()), reversed);
    }

    #[test]
    fn missing_amount_sorts_as_zero() {
        let state = loaded(sample()).apply(TableAction::SortBy(SortKey::Amount));
        assert_eq!(ids(&state.visible()), vec!["1", "3", "4", "2", "5"]);
    }

    #[test]
    fn text_sort_is_lexicographic_with_missing_first() {
        let state = loaded(sample()).apply(TableAction::SortBy(SortKey::Category));
        assert_eq!(ids(&state.visible()), vec!["4", "1", "3", "5", "2"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let rows = vec![
            tx("a", Some(5.0), Some("Food"), None),
            tx("b", Some(5.0), Some("Food"), None),
            tx("c", Some(1.0), Some("Food"), None),
        ];
        let asc = loaded(rows).apply(TableAction::SortBy(SortKey::Amount));
        assert_eq!(ids(&asc.visible()), vec!["c", "a", "b"]);

        let desc = asc.apply(TableAction::SortBy(SortKey::Amount));
        assert_eq!(ids(&desc.visible()), vec!["a", "b", "c"]);
    }

    #[test]
    fn new_sort_key_starts_ascending() {
        let state = loaded(sample())
            .apply(TableAction::SortBy(SortKey::Amount))
            .apply(TableAction::SortBy(SortKey::Amount))
            .apply(TableAction::SortBy(SortKey::Date));
        assert_eq!(
            state.sort,
            Some(SortConfig {
                key: SortKey::Date,
                direction: SortDirection::Ascending
            })
        );

        let state = state.apply(TableAction::SortBy(SortKey::Date));
        let state = state.apply(TableAction::SortBy(SortKey::Date));
        assert_eq!(state.sort.map(|s| s.direction), Some(SortDirection::Ascending));
    }

    #[test]
    fn pages_concatenate_to_visible_rows() {
        let rows: Vec<Transaction> = (0..23)
            .map(|i| tx(&i.to_string(), Some(i as f64 * 3.0 % 7.0), Some("Food"), None))
            .collect();
        let mut state = loaded(rows).apply(TableAction::SortBy(SortKey::Amount));
        assert_eq!(state.total_pages(), 3);

        let mut seen = Vec::new();
        for page in 1..=state.total_pages() {
            state = state.apply(TableAction::GoToPage(page));
            seen.extend(ids(&state.page_rows()));
        }
        assert_eq!(seen, ids(&state.visible()));
    }

    #[test]
    fn changing_filters_or_data_resets_to_first_page() {
        let rows: Vec<Transaction> = (0..25).map(|i| tx(&i.to_string(), Some(1.0), Some("Food"), None)).collect();
        let state = loaded(rows.clone()).apply(TableAction::NextPage).apply(TableAction::NextPage);
        assert_eq!(state.page, 3);

        assert_eq!(state.apply(TableAction::Search("x".to_string())).page, 1);
        assert_eq!(state.apply(TableAction::FilterCategory(None)).page, 1);
        assert_eq!(state.apply(TableAction::FilterConfidence(None)).page, 1);
        assert_eq!(state.apply(TableAction::SortBy(SortKey::Date)).page, 1);
        assert_eq!(state.apply(TableAction::Loaded(rows)).page, 1);
    }

    #[test]
    fn loading_new_data_resets_transient_state() {
        let state = loaded(sample())
            .apply(TableAction::Search("food".to_string()))
            .apply(TableAction::SortBy(SortKey::Amount));
        let reloaded = state.apply(TableAction::Loaded(sample()));
        assert_eq!(reloaded.filter, TableFilter::default());
        assert_eq!(reloaded.sort, None);
    }

    #[test]
    fn page_navigation_is_clamped() {
        let rows: Vec<Transaction> = (0..15).map(|i| tx(&i.to_string(), None, None, None)).collect();
        let state = loaded(rows);
        assert_eq!(state.apply(TableAction::PrevPage).page, 1);
        assert_eq!(state.apply(TableAction::GoToPage(9)).page, 2);
        assert_eq!(state.apply(TableAction::NextPage).apply(TableAction::NextPage).page, 2);

        let empty = loaded(Vec::new());
        assert_eq!(empty.apply(TableAction::NextPage).page, 1);
        assert!(empty.page_rows().is_empty());
    }

    #[test]
    fn clear_filters_resets_search_filters_and_sort() {
        let state = loaded(sample())
            .apply(TableAction::Search("food".to_string()))
            .apply(TableAction::FilterConfidence(Some("Low".to_string())))
            .apply(TableAction::SortBy(SortKey::Amount))
            .apply(TableAction::ClearFilters);
        assert_eq!(state.filter, TableFilter::default());
        assert_eq!(state.sort, None);
        assert_eq!(state.visible().len(), 5);
    }

    #[test]
    fn selector_options_are_distinct_in_first_seen_order() {
        let state = loaded(sample());
        assert_eq!(state.categories(), vec!["Food", "Travel", "Shopping"]);
        assert_eq!(state.confidences(), vec!["High", "Low", "Medium"]);
    }

    #[test]
    fn paginate_handles_bounds() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(paginate(&items, 1, 2), &[1, 2]);
        assert_eq!(paginate(&items, 3, 2), &[5]);
        assert!(paginate(&items, 4, 2).is_empty());
        assert!(paginate(&items, 0, 2).is_empty());
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(0, 10), 0);
    }
}
