//! In-memory user store and transaction log.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    errors::{Result, WalletError},
    models::{Transaction, User},
    utils::TxType,
};

/// Outcome of a successful wallet update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalletUpdate {
    pub user_id: i64,
    pub tx_type: TxType,
    pub balance: Decimal,
}

impl WalletUpdate {
    pub fn message(&self) -> String {
        format!("Wallet updated successfully for user {}", self.user_id)
    }
}

#[derive(Default)]
struct LedgerState {
    users: Vec<User>,
    // user id -> position in `users`
    index: HashMap<i64, usize>,
    transactions: Vec<Transaction>,
}

impl LedgerState {
    fn insert_user(&mut self, user: User) {
        match self.index.get(&user.id) {
            Some(&pos) => self.users[pos] = user,
            None => {
                self.index.insert(user.id, self.users.len());
                self.users.push(user);
            }
        }
    }

    fn user_mut(&mut self, user_id: i64) -> Option<&mut User> {
        let pos = *self.index.get(&user_id)?;
        self.users.get_mut(pos)
    }
}

/// Owns every user and every transaction.
///
/// A single lock covers both collections, so a balance change and its log
/// entry are always observed together.
pub struct WalletLedger {
    state: RwLock<LedgerState>,
}

impl WalletLedger {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        let mut state = LedgerState::default();
        for user in users {
            state.insert_user(user);
        }

        Self {
            state: RwLock::new(state),
        }
    }

    /// Ledger preloaded with the two demo users.
    pub fn seeded() -> Self {
        Self::new(seed_users())
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.state.read().await.users.clone()
    }

    pub async fn update_wallet(
        &self,
        user_id: i64,
        amount: Decimal,
        tx_type: &str,
    ) -> Result<WalletUpdate> {
        let mut state = self.state.write().await;

        let user = state
            .user_mut(user_id)
            .ok_or_else(WalletError::user_not_found)?;
        let tx_type: TxType = tx_type.parse()?;

        if amount < Decimal::ZERO {
            return Err(WalletError::invalid_argument("Amount must not be negative"));
        }

        let balance = match tx_type {
            TxType::Deposit => user
                .balance
                .checked_add(amount)
                .ok_or_else(|| WalletError::invalid_argument("Amount out of range"))?,
            TxType::Withdraw => {
                if user.balance < amount {
                    return Err(WalletError::insufficient_funds());
                }
                user.balance - amount
            }
        };

        user.balance = balance;
        state
            .transactions
            .push(Transaction::new(user_id, amount, tx_type));

        info!(
            user_id = %user_id,
            tx_type = %tx_type,
            amount = %amount,
            balance = %balance,
            "Wallet updated"
        );

        Ok(WalletUpdate {
            user_id,
            tx_type,
            balance,
        })
    }

    pub async fn fetch_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        if !state.index.contains_key(&user_id) {
            return Err(WalletError::user_not_found());
        }

        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        User::new(
            1,
            "Alice",
            "alice@example.com",
            "1234567890",
            Decimal::from(100),
        ),
        User::new(2, "Bob", "bob@example.com", "9876543210", Decimal::from(200)),
    ]
}
