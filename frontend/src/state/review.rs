use std::rc::Rc;

use yew::Reducible;

use crate::config::ADD_NEW_CATEGORY;
use crate::error::ValidationError;
use crate::models::Transaction;

/// Where a failed submission lands the item again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumePhase {
    Pending,
    AwaitingCustomInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewPhase {
    Pending,
    AwaitingCustomInput,
    Submitting { resume: ResumePhase },
}

impl From<ResumePhase> for ReviewPhase {
    fn from(resume: ResumePhase) -> Self {
        match resume {
            ResumePhase::Pending => ReviewPhase::Pending,
            ResumePhase::AwaitingCustomInput => ReviewPhase::AwaitingCustomInput,
        }
    }
}

/// What the category selector of a row produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryChoice {
    Existing(String),
    AddNew,
}

impl CategoryChoice {
    pub fn from_select(value: &str) -> Option<CategoryChoice> {
        match value {
            "" => None,
            ADD_NEW_CATEGORY => Some(CategoryChoice::AddNew),
            other => Some(CategoryChoice::Existing(other.to_string())),
        }
    }
}

pub fn validate_custom_category(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyCategory)
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewItem {
    pub transaction: Transaction,
    pub phase: ReviewPhase,
    pub custom_category: String,
    pub error: Option<String>,
}

impl ReviewItem {
    fn new(transaction: Transaction) -> Self {
        ReviewItem {
            transaction,
            phase: ReviewPhase::Pending,
            custom_category: String::new(),
            error: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase, ReviewPhase::Submitting { .. })
    }

    /// Whether the free-text input is visible, including while a custom
    /// category is being saved.
    pub fn shows_custom_input(&self) -> bool {
        matches!(
            self.phase,
            ReviewPhase::AwaitingCustomInput
                | ReviewPhase::Submitting {
                    resume: ResumePhase::AwaitingCustomInput
                }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReviewAction {
    Loaded(Vec<Transaction>),
    OpenCustomInput(String),
    CancelCustomInput(String),
    EditCustom { id: String, text: String },
    SubmitStarted(String),
    SubmitSucceeded(String),
    SubmitFailed { id: String, message: String },
    ShowError { id: String, message: String },
}

/// The needs-review queue. Items leave it only on `SubmitSucceeded`, i.e.
/// after the backend confirmed the new category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewState {
    pub items: Vec<ReviewItem>,
}

impl ReviewState {
    pub fn item(&self, id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.transaction.id == id)
    }

    /// At most one submission per item may be in flight.
    pub fn can_submit(&self, id: &str) -> bool {
        self.item(id).map_or(false, |item| !item.is_processing())
    }

    pub fn apply(&self, action: ReviewAction) -> ReviewState {
        let mut next = self.clone();
        match action {
            ReviewAction::Loaded(transactions) => {
                next.items = transactions.into_iter().map(ReviewItem::new).collect();
            }
            ReviewAction::OpenCustomInput(id) => {
                next.update(&id, |item| {
                    if item.phase == ReviewPhase::Pending {
                        item.phase = ReviewPhase::AwaitingCustomInput;
                        item.error = None;
                    }
                });
            }
            ReviewAction::CancelCustomInput(id) => {
                next.update(&id, |item| {
                    if item.phase == ReviewPhase::AwaitingCustomInput {
                        item.phase = ReviewPhase::Pending;
                        item.custom_category.clear();
                        item.error = None;
                    }
                });
            }
            ReviewAction::EditCustom { id, text } => {
                next.update(&id, |item| item.custom_category = text);
            }
            ReviewAction::SubmitStarted(id) => {
                next.update(&id, |item| {
                    let resume = match item.phase {
                        ReviewPhase::Pending => ResumePhase::Pending,
                        ReviewPhase::AwaitingCustomInput => ResumePhase::AwaitingCustomInput,
                        ReviewPhase::Submitting { .. } => return,
                    };
                    item.phase = ReviewPhase::Submitting { resume };
                    item.error = None;
                });
            }
            ReviewAction::SubmitSucceeded(id) => {
                next.items.retain(|item| item.transaction.id != id);
            }
            ReviewAction::SubmitFailed { id, message } => {
                next.update(&id, |item| {
                    if let ReviewPhase::Submitting { resume } = item.phase {
                        item.phase = resume.into();
                    }
                    item.error = Some(message);
                });
            }
            ReviewAction::ShowError { id, message } => {
                next.update(&id, |item| item.error = Some(message));
            }
        }
        next
    }

    fn update(&mut self, id: &str, f: impl FnOnce(&mut ReviewItem)) {
        if let Some(item) = self.items.iter_mut().find(|item| item.transaction.id == id) {
            f(item);
        }
    }
}

impl Reducible for ReviewState {
    type Action = ReviewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: Some("2024-01-05".to_string()),
            description: Some("UPI/unknown merchant".to_string()),
            amount: Some(-99.0),
            category: Some("Miscellaneous".to_string()),
            confidence: Some("Low".to_string()),
        }
    }

    fn loaded(ids: &[&str]) -> ReviewState {
        ReviewState::default().apply(ReviewAction::Loaded(ids.iter().map(|id| tx(id)).collect()))
    }

    #[test]
    fn resolving_one_item_removes_exactly_that_item() {
        let state = loaded(&["a", "b", "c"])
            .apply(ReviewAction::SubmitStarted("b".to_string()))
            .apply(ReviewAction::SubmitSucceeded("b".to_string()));

        assert_eq!(state.items.len(), 2);
        assert!(state.item("b").is_none());
        assert!(state.item("a").is_some());
        assert!(state.item("c").is_some());
    }

    #[test]
    fn item_stays_until_backend_confirms() {
        let state = loaded(&["a"]).apply(ReviewAction::SubmitStarted("a".to_string()));
        let item = state.item("a").unwrap();
        assert!(item.is_processing());
        assert_eq!(
            item.phase,
            ReviewPhase::Submitting {
                resume: ResumePhase::Pending
            }
        );
    }

    #[test]
    fn failure_returns_item_to_pending_with_error() {
        let state = loaded(&["a"])
            .apply(ReviewAction::SubmitStarted("a".to_string()))
            .apply(ReviewAction::SubmitFailed {
                id: "a".to_string(),
                message: "Failed to update transaction. Please try again.".to_string(),
            });

        let item = state.item("a").unwrap();
        assert_eq!(item.phase, ReviewPhase::Pending);
        assert!(item.error.is_some());
        assert!(state.can_submit("a"));
    }

    #[test]
    fn custom_category_flow_resumes_input_after_failure() {
        let state = loaded(&["a"])
            .apply(ReviewAction::OpenCustomInput("a".to_string()))
            .apply(ReviewAction::EditCustom {
                id: "a".to_string(),
                text: "Pets".to_string(),
            })
            .apply(ReviewAction::SubmitStarted("a".to_string()));
        assert!(state.item("a").unwrap().shows_custom_input());
        assert!(!state.can_submit("a"));

        let state = state.apply(ReviewAction::SubmitFailed {
            id: "a".to_string(),
            message: "offline".to_string(),
        });
        let item = state.item("a").unwrap();
        assert_eq!(item.phase, ReviewPhase::AwaitingCustomInput);
        assert_eq!(item.custom_category, "Pets");
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let state = loaded(&["a"])
            .apply(ReviewAction::OpenCustomInput("a".to_string()))
            .apply(ReviewAction::SubmitStarted("a".to_string()));
        let again = state.apply(ReviewAction::SubmitStarted("a".to_string()));
        assert_eq!(again, state);
        assert!(!again.can_submit("a"));
    }

    #[test]
    fn cancel_custom_input_returns_to_pending() {
        let state = loaded(&["a"])
            .apply(ReviewAction::OpenCustomInput("a".to_string()))
            .apply(ReviewAction::EditCustom {
                id: "a".to_string(),
                text: "Gym".to_string(),
            })
            .apply(ReviewAction::CancelCustomInput("a".to_string()));
        let item = state.item("a").unwrap();
        assert_eq!(item.phase, ReviewPhase::Pending);
        assert!(item.custom_category.is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let state = loaded(&["a"]);
        assert_eq!(state.apply(ReviewAction::SubmitStarted("zzz".to_string())), state);
        assert_eq!(state.apply(ReviewAction::SubmitSucceeded("zzz".to_string())), state);
        assert!(!state.can_submit("zzz"));
    }

    #[test]
    fn select_values_map_to_choices() {
        assert_eq!(CategoryChoice::from_select(""), None);
        assert_eq!(CategoryChoice::from_select("add_new"), Some(CategoryChoice::AddNew));
        assert_eq!(
            CategoryChoice::from_select("Travel"),
            Some(CategoryChoice::Existing("Travel".to_string()))
        );
    }

    #[test]
    fn custom_category_must_not_be_blank() {
        assert_eq!(validate_custom_category("   "), Err(ValidationError::EmptyCategory));
        assert_eq!(validate_custom_category("  Pets "), Ok("Pets".to_string()));
    }
}
