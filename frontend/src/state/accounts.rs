use serde::Serialize;

use crate::error::ValidationError;
use crate::models::Account;

/// Form contents for creating or editing an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountDraft {
    #[serde(rename = "account_name")]
    pub name: String,
    #[serde(rename = "account_type")]
    pub kind: String,
}

impl AccountDraft {
    /// Returns the trimmed draft that is sent to the backend.
    pub fn validate(&self) -> Result<AccountDraft, ValidationError> {
        let name = self.name.trim();
        let kind = self.kind.trim();
        if name.is_empty() || kind.is_empty() {
            return Err(ValidationError::MissingAccountFields);
        }
        Ok(AccountDraft {
            name: name.to_string(),
            kind: kind.to_string(),
        })
    }
}

impl From<&Account> for AccountDraft {
    fn from(account: &Account) -> Self {
        AccountDraft {
            name: account.name.clone(),
            kind: account.kind.clone(),
        }
    }
}

/// The row currently swapped for an inline edit form.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub account_id: String,
    pub draft: AccountDraft,
}

impl EditSession {
    pub fn start(account: &Account) -> Self {
        EditSession {
            account_id: account.id.clone(),
            draft: AccountDraft::from(account),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountType {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const ACCOUNT_TYPES: [AccountType; 4] = [
    AccountType {
        label: "Bank Account",
        icon: "🏦",
        color: "bg-blue-100 text-blue-800",
    },
    AccountType {
        label: "Credit Card",
        icon: "💳",
        color: "bg-purple-100 text-purple-800",
    },
    AccountType {
        label: "Savings",
        icon: "🐷",
        color: "bg-green-100 text-green-800",
    },
    AccountType {
        label: "Wallet",
        icon: "👛",
        color: "bg-yellow-100 text-yellow-800",
    },
];

const UNKNOWN_TYPE_COLOR: &str = "bg-gray-100 text-gray-800";

pub fn account_type_icon(kind: &str) -> &'static str {
    ACCOUNT_TYPES
        .iter()
        .find(|t| t.label == kind)
        .map_or(ACCOUNT_TYPES[3].icon, |t| t.icon)
}

pub fn account_type_color(kind: &str) -> &'static str {
    ACCOUNT_TYPES
        .iter()
        .find(|t| t.label == kind)
        .map_or(UNKNOWN_TYPE_COLOR, |t| t.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_both_fields() {
        let missing_type = AccountDraft {
            name: "HDFC Savings".to_string(),
            kind: String::new(),
        };
        assert_eq!(missing_type.validate(), Err(ValidationError::MissingAccountFields));

        let blank_name = AccountDraft {
            name: "   ".to_string(),
            kind: "Savings".to_string(),
        };
        assert_eq!(blank_name.validate(), Err(ValidationError::MissingAccountFields));
    }

    #[test]
    fn valid_draft_is_trimmed() {
        let draft = AccountDraft {
            name: "  Travel card ".to_string(),
            kind: "Credit Card".to_string(),
        };
        assert_eq!(
            draft.validate(),
            Ok(AccountDraft {
                name: "Travel card".to_string(),
                kind: "Credit Card".to_string(),
            })
        );
    }

    #[test]
    fn draft_serializes_with_backend_field_names() {
        let draft = AccountDraft {
            name: "Cash".to_string(),
            kind: "Wallet".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"account_name": "Cash", "account_type": "Wallet"})
        );
    }

    #[test]
    fn edit_session_starts_from_the_account() {
        let account = Account {
            id: "65f0c0ffee".to_string(),
            name: "Main".to_string(),
            kind: "Bank Account".to_string(),
        };
        let session = EditSession::start(&account);
        assert_eq!(session.account_id, "65f0c0ffee");
        assert_eq!(session.draft.name, "Main");
        assert_eq!(session.draft.kind, "Bank Account");
    }

    #[test]
    fn unknown_types_fall_back_to_wallet_icon_and_neutral_colour() {
        assert_eq!(account_type_icon("Credit Card"), "💳");
        assert_eq!(account_type_icon("Brokerage"), "👛");
        assert_eq!(account_type_color("Savings"), "bg-green-100 text-green-800");
        assert_eq!(account_type_color(""), "bg-gray-100 text-gray-800");
    }
}
