use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "account_name")]
    pub name: String,
    #[serde(rename = "account_type", default)]
    pub kind: String,
}

/// A transaction as shown by the table and review views. The backend keeps
/// the column names of whatever statement was imported, so decoding goes
/// through [`RawTransaction`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawTransaction")]
pub struct Transaction {
    pub id: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub confidence: Option<String>,
}

#[derive(Deserialize)]
struct RawTransaction {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "Date", default)]
    date: Option<Value>,
    #[serde(rename = "Timestamp", default)]
    timestamp: Option<Value>,
    #[serde(rename = "Transaction details", default)]
    details: Option<Value>,
    #[serde(rename = "Description", default)]
    description: Option<Value>,
    #[serde(rename = "Amount", default)]
    amount: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction {
            id: raw.id,
            date: text(raw.date).or_else(|| text(raw.timestamp)),
            description: text(raw.details).or_else(|| text(raw.description)),
            amount: raw.amount.as_ref().and_then(number),
            category: text(raw.category),
            confidence: text(raw.confidence),
        }
    }
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Amounts arrive either as numbers or as numeric strings ("-1,250.00").
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_spending: f64,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub net_cash_flow: f64,
    #[serde(default)]
    pub transaction_count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryTotal {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total: f64,
}

impl CategoryTotal {
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Subscription {
    pub merchant: String,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub avg_amount: f64,
    #[serde(default)]
    pub last_payment_date: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct CategoryUpdate<'a> {
    pub category: &'a str,
}

#[derive(Serialize)]
pub struct AiQuery<'a> {
    pub query: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_statement_column_names() {
        let tx: Transaction = serde_json::from_value(json!({
            "_id": "64f1",
            "Date": "2024-03-02",
            "Transaction details": "UPI/Swiggy/Order",
            "Amount": -450.5,
            "category": "Food",
            "confidence": "High",
            "account_id": "acc-1"
        }))
        .unwrap();

        assert_eq!(tx.id, "64f1");
        assert_eq!(tx.date.as_deref(), Some("2024-03-02"));
        assert_eq!(tx.description.as_deref(), Some("UPI/Swiggy/Order"));
        assert_eq!(tx.amount, Some(-450.5));
        assert_eq!(tx.category.as_deref(), Some("Food"));
        assert_eq!(tx.confidence.as_deref(), Some("High"));
    }

    #[test]
    fn falls_back_to_alternate_columns() {
        let tx: Transaction = serde_json::from_value(json!({
            "_id": "64f2",
            "Timestamp": "2024-03-02T10:00:00",
            "Description": "Salary",
            "Amount": "1,200.00"
        }))
        .unwrap();

        assert_eq!(tx.date.as_deref(), Some("2024-03-02T10:00:00"));
        assert_eq!(tx.description.as_deref(), Some("Salary"));
        assert_eq!(tx.amount, Some(1200.0));
        assert_eq!(tx.category, None);
        assert_eq!(tx.confidence, None);
    }

    #[test]
    fn unparseable_or_null_fields_become_missing() {
        let tx: Transaction = serde_json::from_value(json!({
            "_id": "64f3",
            "Amount": "n/a",
            "category": null,
            "confidence": "",
            "Transaction details": "  "
        }))
        .unwrap();

        assert_eq!(tx.amount, None);
        assert_eq!(tx.category, None);
        assert_eq!(tx.confidence, None);
        assert_eq!(tx.description, None);
    }

    #[test]
    fn account_uses_backend_field_names() {
        let account: Account = serde_json::from_value(json!({
            "_id": "a1",
            "account_name": "HDFC Savings",
            "account_type": "Savings",
            "user_id": "placeholder_user"
        }))
        .unwrap();
        assert_eq!(account.name, "HDFC Savings");
        assert_eq!(account.kind, "Savings");
    }

    #[test]
    fn category_total_without_label_is_uncategorized() {
        let total: CategoryTotal =
            serde_json::from_value(json!({"category": null, "total": 12.5})).unwrap();
        assert_eq!(total.label(), "Uncategorized");
    }
}
