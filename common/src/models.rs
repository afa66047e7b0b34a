use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::TxType;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub balance: Decimal,
}

impl User {
    pub fn new(id: i64, name: &str, email: &str, phone: &str, balance: Decimal) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            balance,
        }
    }
}

/// One balance change. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    pub user_id: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(user_id: i64, amount: Decimal, tx_type: TxType) -> Self {
        Self {
            user_id,
            amount,
            tx_type,
            timestamp: Utc::now(),
        }
    }
}
