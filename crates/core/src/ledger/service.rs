//! Ledger service for transaction CRUD and cash-flow reporting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nestegg_shared::UserId;
use rust_decimal::Decimal;
use tracing::info;

use super::aggregator::{summarize, surplus_report};
use super::error::LedgerError;
use super::types::{
    LedgerSummary, NewTransaction, SurplusReport, Transaction, TransactionFilter,
    TransactionUpdate,
};
use crate::store::{CategoryStore, StoreError, TransactionStore};

/// Ledger service.
pub struct LedgerService {
    transactions: Arc<dyn TransactionStore>,
    categories: Arc<dyn CategoryStore>,
}

impl LedgerService {
    /// Creates a new ledger service.
    #[must_use]
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            transactions,
            categories,
        }
    }

    /// Lists matching transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub async fn list(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        validate_filter(filter)?;
        Ok(self.transactions.list_transactions(user_id, filter).await?)
    }

    /// Records a transaction at `timestamp`, or now when absent.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank category or zero amount, and
    /// `DuplicateTimestamp` when the instant is already taken.
    pub async fn create(
        &self,
        user_id: UserId,
        input: NewTransaction,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError> {
        let input = NewTransaction {
            category: normalize_category(&input.category)?,
            amount: validate_amount(input.amount)?,
        };
        let timestamp = timestamp.unwrap_or_else(Utc::now);

        let tx = self
            .transactions
            .insert_transaction(user_id, timestamp, input)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => LedgerError::DuplicateTimestamp(timestamp),
                other => LedgerError::Store(other),
            })?;

        info!(user_id = %user_id, timestamp = %tx.timestamp, amount = %tx.amount, "Transaction recorded");
        Ok(tx)
    }

    /// Updates category and/or amount of the transaction at `timestamp`.
    ///
    /// `new_timestamp` is accepted only when it equals `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns `TimestampImmutable` when asked to move the transaction and
    /// `NotFound` when there is none at `timestamp`.
    pub async fn update(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        changes: TransactionUpdate,
        new_timestamp: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError> {
        if new_timestamp.is_some_and(|t| t != timestamp) {
            return Err(LedgerError::TimestampImmutable);
        }
        let changes = TransactionUpdate {
            category: changes.category.as_deref().map(normalize_category).transpose()?,
            amount: changes.amount.map(validate_amount).transpose()?,
        };

        self.transactions
            .update_transaction(user_id, timestamp, changes)
            .await?
            .ok_or(LedgerError::NotFound(timestamp))
    }

    /// Deletes the transaction at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing was deleted.
    pub async fn delete(&self, user_id: UserId, timestamp: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.transactions.delete_transaction(user_id, timestamp).await? {
            info!(user_id = %user_id, timestamp = %timestamp, "Transaction deleted");
            Ok(())
        } else {
            Err(LedgerError::NotFound(timestamp))
        }
    }

    /// Totals the matching transactions.
    pub async fn summary(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<LedgerSummary, LedgerError> {
        Ok(summarize(&self.list(user_id, filter).await?))
    }

    /// Computes the user's current surplus over all transactions.
    pub async fn surplus(&self, user_id: UserId) -> Result<SurplusReport, LedgerError> {
        let transactions = self
            .transactions
            .list_transactions(user_id, &TransactionFilter::default())
            .await?;
        let categories = self.categories.list_categories(user_id).await?;
        Ok(surplus_report(&transactions, &categories))
    }
}

fn validate_filter(filter: &TransactionFilter) -> Result<(), LedgerError> {
    match (filter.from, filter.to) {
        (Some(from), Some(to)) if from > to => Err(LedgerError::InvalidRange),
        _ => Ok(()),
    }
}

fn normalize_category(raw: &str) -> Result<String, LedgerError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(LedgerError::EmptyCategory);
    }
    Ok(category.to_string())
}

fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount.is_zero() {
        Err(LedgerError::ZeroAmount)
    } else {
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::NewCategory;
    use crate::ledger::types::FlowDirection;
    use crate::memory::MemoryStore;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn service() -> (Arc<MemoryStore>, LedgerService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), LedgerService::new(store.clone(), store))
    }

    fn input(category: &str, amount: Decimal) -> NewTransaction {
        NewTransaction {
            category: category.to_string(),
            amount,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let (_, ledger) = service();
        let user = UserId::new();

        ledger.create(user, input(" Salary ", dec!(4000)), Some(at(1))).await.unwrap();
        ledger.create(user, input("Rent", dec!(-1500)), Some(at(3))).await.unwrap();
        ledger.create(user, input("Coffee", dec!(-4.5)), Some(at(2))).await.unwrap();

        let all = ledger.list(user, &TransactionFilter::default()).await.unwrap();
        let stamps: Vec<_> = all.iter().map(|t| t.timestamp).collect();
        assert_eq!(stamps, vec![at(3), at(2), at(1)]);
        assert_eq!(all[2].category, "Salary");

        let outflows = ledger
            .list(
                user,
                &TransactionFilter {
                    direction: Some(FlowDirection::Outflow),
                    from: Some(at(2)),
                    to: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(outflows.len(), 2);

        assert!(ledger.list(UserId::new(), &TransactionFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_timestamp_to_now() {
        let (_, ledger) = service();
        let before = Utc::now();
        let tx = ledger
            .create(UserId::new(), input("Gift", dec!(50)), None)
            .await
            .unwrap();
        assert!(tx.timestamp >= before);
        assert!(tx.timestamp <= Utc::now() + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (_, ledger) = service();
        let user = UserId::new();

        let err = ledger.create(user, input(" ", dec!(5)), None).await.unwrap_err();
        assert!(matches!(err, LedgerError::EmptyCategory));

        let err = ledger.create(user, input("Misc", dec!(0)), None).await.unwrap_err();
        assert!(matches!(err, LedgerError::ZeroAmount));
    }

    #[tokio::test]
    async fn test_duplicate_timestamp_conflicts() {
        let (_, ledger) = service();
        let user = UserId::new();
        ledger.create(user, input("A", dec!(1)), Some(at(5))).await.unwrap();

        let err = ledger.create(user, input("B", dec!(2)), Some(at(5))).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTimestamp(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_, ledger) = service();
        let user = UserId::new();
        ledger.create(user, input("Food", dec!(-20)), Some(at(4))).await.unwrap();

        let updated = ledger
            .update(
                user,
                at(4),
                TransactionUpdate {
                    category: Some("Groceries".into()),
                    amount: Some(dec!(-22.75)),
                },
                Some(at(4)),
            )
            .await
            .unwrap();
        assert_eq!(updated.category, "Groceries");
        assert_eq!(updated.amount, dec!(-22.75));

        let err = ledger
            .update(user, at(4), TransactionUpdate::default(), Some(at(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TimestampImmutable));

        let err = ledger
            .update(UserId::new(), at(4), TransactionUpdate::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));

        ledger.delete(user, at(4)).await.unwrap();
        let err = ledger.delete(user, at(4)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let (_, ledger) = service();
        let filter = TransactionFilter {
            direction: None,
            from: Some(at(10)),
            to: Some(at(1)),
        };
        let err = ledger.list(UserId::new(), &filter).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRange));
    }

    #[tokio::test]
    async fn test_summary_and_surplus() {
        let (store, ledger) = service();
        let user = UserId::new();
        ledger.create(user, input("Salary", dec!(5000)), Some(at(1))).await.unwrap();
        ledger.create(user, input("Rent", dec!(-1800)), Some(at(2))).await.unwrap();
        store
            .insert_category(
                user,
                NewCategory {
                    name: "Savings".into(),
                    size: dec!(1000),
                },
            )
            .await
            .unwrap();

        let summary = ledger.summary(user, &TransactionFilter::default()).await.unwrap();
        assert_eq!(summary.net, dec!(3200));

        let report = ledger.surplus(user).await.unwrap();
        assert_eq!(report.budgeted_total, dec!(1000));
        assert_eq!(report.surplus, dec!(2200));
    }
}
