//! Lifecycle repository: the persistence half of apply and annul.
//!
//! Status flips are compare-and-swap updates on `lock_version`. The
//! loser of a concurrent flip re-reads the row and reports the state it
//! actually found, never a spurious storage error.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use contar_core::ledger::{LedgerError, TransactionHeader, validate_lines};
use contar_core::lifecycle::{LifecycleService, ReversalService, TransactionStatus};
use contar_shared::{CompanyId, TransactionId};

use crate::entities::transactions;

use super::account::load_account_refs;
use super::transaction::{TransactionWithLines, find_scoped, insert_header, insert_lines, lines_of};
use super::{
    MAX_SWAP_ATTEMPTS, line_input_from_model, line_to_core, lost_swap_outcome, module_from_db,
    status_from_db, status_to_db, storage,
};

/// Result of annulling a transaction.
#[derive(Debug, Clone)]
pub struct AnnulResult {
    /// The original transaction, now Reversed.
    pub original: TransactionWithLines,
    /// The compensating transaction, posted in the same step.
    pub compensating: TransactionWithLines,
}

/// Repository for transaction lifecycle transitions.
#[derive(Debug, Clone)]
pub struct LifecycleRepository {
    db: DatabaseConnection,
}

impl LifecycleRepository {
    /// Creates a new lifecycle repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies (posts) a draft transaction.
    ///
    /// Re-runs full validation against the lines as currently stored,
    /// then flips Draft to Posted with a version-guarded update. On
    /// validation failure the draft is left untouched. Losing the swap
    /// to a concurrent draft edit retries against the fresh lines;
    /// losing it to a status change reports the observed state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidStateForApply`, a validation error,
    /// or `Storage`.
    pub async fn apply(
        &self,
        company_id: CompanyId,
        transaction_id: TransactionId,
    ) -> Result<TransactionWithLines, LedgerError> {
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let current = find_scoped(&self.db, company_id, transaction_id).await?;
            let transition = LifecycleService::apply(status_from_db(&current.status))?;

            let line_rows = lines_of(&self.db, transaction_id).await?;
            let inputs: Vec<_> = line_rows.iter().map(line_input_from_model).collect();
            let accounts = load_account_refs(&self.db, &inputs).await?;
            validate_lines(company_id, module_from_db(&current.module), &inputs, |id| {
                accounts.get(&id).copied()
            })?;

            let flipped = self
                .flip_status(&self.db, &current, transition.to, None)
                .await?;
            if !flipped {
                let latest = find_scoped(&self.db, company_id, transaction_id).await?;
                lost_swap_outcome(
                    status_from_db(&latest.status),
                    TransactionStatus::Draft,
                    LedgerError::InvalidStateForApply,
                )?;
                continue;
            }

            let transaction = find_scoped(&self.db, company_id, transaction_id).await?;
            return Ok(TransactionWithLines {
                transaction,
                lines: line_rows,
            });
        }

        Err(LedgerError::Storage(format!(
            "transaction {transaction_id} kept changing concurrently"
        )))
    }

    /// Annuls (reverses) a posted transaction.
    ///
    /// In one database transaction: marks the original Reversed with a
    /// version-guarded update, and inserts a compensating transaction
    /// with mirrored lines, posted directly and back-referencing the
    /// original. Both effects commit together or neither does.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidStateForAnnul`, or `Storage`.
    pub async fn annul(
        &self,
        company_id: CompanyId,
        transaction_id: TransactionId,
    ) -> Result<AnnulResult, LedgerError> {
        let current = find_scoped(&self.db, company_id, transaction_id).await?;
        let transition = LifecycleService::annul(status_from_db(&current.status))?;

        let original_rows = lines_of(&self.db, transaction_id).await?;
        let original_lines: Vec<_> = original_rows.iter().map(line_to_core).collect();
        let mirrored = ReversalService::mirror_lines(&original_lines);

        let header = TransactionHeader {
            company_id,
            business_date: current.business_date,
            description: ReversalService::reversal_description(transaction_id),
            module: module_from_db(&current.module),
            correlation_id: current.correlation_id.clone(),
        };

        let txn = self.db.begin().await.map_err(storage)?;

        let compensating = insert_header(
            &txn,
            &header,
            TransactionStatus::Posted,
            Some(transaction_id),
        )
        .await?;
        let compensating_lines = insert_lines(
            &txn,
            TransactionId::from_uuid(compensating.id),
            company_id,
            &mirrored,
        )
        .await?;

        let flipped = self
            .flip_status(&txn, &current, transition.to, Some(compensating.id))
            .await?;
        if !flipped {
            txn.rollback().await.map_err(storage)?;
            let latest = find_scoped(&self.db, company_id, transaction_id).await?;
            return Err(LedgerError::InvalidStateForAnnul(status_from_db(
                &latest.status,
            )));
        }

        txn.commit().await.map_err(storage)?;

        let original = find_scoped(&self.db, company_id, transaction_id).await?;
        Ok(AnnulResult {
            original: TransactionWithLines {
                transaction: original,
                lines: original_rows,
            },
            compensating: TransactionWithLines {
                transaction: compensating,
                lines: compensating_lines,
            },
        })
    }

    /// Compare-and-swap status flip guarded by `lock_version`.
    ///
    /// Returns false when zero rows were affected, meaning a concurrent
    /// caller won the race.
    async fn flip_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: &transactions::Model,
        to: TransactionStatus,
        reversed_by: Option<Uuid>,
    ) -> Result<bool, LedgerError> {
        let now = Utc::now();
        let mut update = transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, Expr::value(status_to_db(to)))
            .col_expr(
                transactions::Column::LockVersion,
                Expr::value(current.lock_version + 1),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(now));

        match to {
            TransactionStatus::Posted => {
                update = update.col_expr(transactions::Column::PostedAt, Expr::value(Some(now)));
            }
            TransactionStatus::Reversed => {
                update = update.col_expr(
                    transactions::Column::ReversedByTransactionId,
                    Expr::value(reversed_by),
                );
            }
            TransactionStatus::Draft => {}
        }

        let result = update
            .filter(transactions::Column::Id.eq(current.id))
            .filter(transactions::Column::CompanyId.eq(current.company_id))
            .filter(transactions::Column::LockVersion.eq(current.lock_version))
            .filter(transactions::Column::Status.eq(current.status.clone()))
            .exec(conn)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected > 0)
    }
}
