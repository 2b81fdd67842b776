//! Transaction repository for ledger transaction database operations.
//!
//! Owns creation, draft editing, deletion, and the company-scoped read
//! paths. Lifecycle flips (apply and annul) live in the lifecycle
//! repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use contar_core::adapters::SourceDocument;
use contar_core::ledger::{
    LedgerError, LineInput, SourceModule, TransactionHeader, validate_lines,
};
use contar_core::lifecycle::{LifecycleService, TransactionStatus};
use contar_shared::{AccountId, CompanyId, TransactionId};

use crate::entities::{ledger_lines, transactions};

use super::account::load_account_refs;
use super::{
    MAX_SWAP_ATTEMPTS, lost_swap_outcome, module_to_db, status_from_db, status_to_db, storage,
};

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Header fields from the originating document.
    pub header: TransactionHeader,
    /// The ledger lines.
    pub lines: Vec<LineInput>,
    /// Whether to post in the same step instead of leaving a draft.
    pub post_immediately: bool,
}

impl CreateTransactionInput {
    /// Builds repository input from a source document.
    ///
    /// This is the bridge every functional module crosses: the document
    /// describes itself, the repository persists whatever it produced.
    #[must_use]
    pub fn from_document<D: SourceDocument>(doc: &D) -> Self {
        Self {
            header: doc.header(),
            lines: doc.lines(),
            post_immediately: doc.post_immediately(),
        }
    }
}

/// Input for replacing a draft transaction.
///
/// Updates are wholesale: the header fields here and the full line set
/// replace whatever the draft held before. The module tag never changes;
/// it names the document's origin, not its current shape.
#[derive(Debug, Clone)]
pub struct UpdateTransactionInput {
    /// The new business date.
    pub business_date: chrono::NaiveDate,
    /// The new description.
    pub description: String,
    /// The new correlation reference.
    pub correlation_id: Option<String>,
    /// The replacement line set.
    pub lines: Vec<LineInput>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Filter by originating module.
    pub module: Option<SourceModule>,
    /// Filter by date range start.
    pub date_from: Option<chrono::NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<chrono::NaiveDate>,
    /// Filter by correlation reference.
    pub correlation_id: Option<String>,
}

/// Transaction with its lines.
#[derive(Debug, Clone)]
pub struct TransactionWithLines {
    /// Transaction header row.
    pub transaction: transactions::Model,
    /// Ledger line rows.
    pub lines: Vec<ledger_lines::Model>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction with its lines in one database transaction.
    ///
    /// When `post_immediately` is set the line set is validated first and
    /// the transaction lands as Posted; otherwise it lands as Draft and
    /// validation waits until apply.
    ///
    /// # Errors
    ///
    /// Returns a validation error when posting immediately with an
    /// invalid line set, or `Storage` if the database fails.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionWithLines, LedgerError> {
        if input.post_immediately {
            let accounts = load_account_refs(&self.db, &input.lines).await?;
            validate_lines(
                input.header.company_id,
                input.header.module,
                &input.lines,
                |id| accounts.get(&id).copied(),
            )?;
        } else {
            ensure_non_negative(&input.lines)?;
        }

        let status = if input.post_immediately {
            TransactionStatus::Posted
        } else {
            TransactionStatus::Draft
        };

        let txn = self.db.begin().await.map_err(storage)?;
        let transaction = insert_header(&txn, &input.header, status, None).await?;
        let lines = insert_lines(
            &txn,
            TransactionId::from_uuid(transaction.id),
            input.header.company_id,
            &input.lines,
        )
        .await?;
        txn.commit().await.map_err(storage)?;

        Ok(TransactionWithLines { transaction, lines })
    }

    /// Gets a transaction with its lines, scoped to the company.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction does not exist in this
    /// company, whether it is missing or owned by another tenant.
    pub async fn get(
        &self,
        company_id: CompanyId,
        transaction_id: TransactionId,
    ) -> Result<TransactionWithLines, LedgerError> {
        let transaction = find_scoped(&self.db, company_id, transaction_id).await?;
        let lines = lines_of(&self.db, transaction_id).await?;
        Ok(TransactionWithLines { transaction, lines })
    }

    /// Lists transactions for a company with optional filters.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn list(
        &self,
        company_id: CompanyId,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, LedgerError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id.into_inner()));

        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status_to_db(status)));
        }

        if let Some(module) = filter.module {
            query = query.filter(transactions::Column::Module.eq(module_to_db(module)));
        }

        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::BusinessDate.gte(date_from));
        }

        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::BusinessDate.lte(date_to));
        }

        if let Some(correlation_id) = filter.correlation_id {
            query = query.filter(transactions::Column::CorrelationId.eq(correlation_id));
        }

        query
            .order_by_desc(transactions::Column::BusinessDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage)
    }

    /// Lists the lines posted to an account, scoped to the company.
    ///
    /// The account's tenancy is checked first: asking for another
    /// company's account fails with `TenantMismatch` instead of
    /// returning an empty list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `TenantMismatch`, or `Storage`.
    pub async fn lines_by_account(
        &self,
        company_id: CompanyId,
        account_id: AccountId,
    ) -> Result<Vec<ledger_lines::Model>, LedgerError> {
        super::AccountRepository::new(self.db.clone())
            .ensure_company_account(company_id, account_id)
            .await?;

        ledger_lines::Entity::find()
            .filter(ledger_lines::Column::CompanyId.eq(company_id.into_inner()))
            .filter(ledger_lines::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(ledger_lines::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage)
    }

    /// Replaces a draft transaction's header fields and lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction is missing in this company,
    /// `InvalidStateForEdit` unless it is a draft, or `Storage`.
    pub async fn update(
        &self,
        company_id: CompanyId,
        transaction_id: TransactionId,
        input: UpdateTransactionInput,
    ) -> Result<TransactionWithLines, LedgerError> {
        ensure_non_negative(&input.lines)?;

        for _ in 0..MAX_SWAP_ATTEMPTS {
            let current = find_scoped(&self.db, company_id, transaction_id).await?;
            LifecycleService::guard_edit(status_from_db(&current.status))?;

            let txn = self.db.begin().await.map_err(storage)?;

            let now = Utc::now();
            let result = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::BusinessDate,
                    Expr::value(input.business_date),
                )
                .col_expr(
                    transactions::Column::Description,
                    Expr::value(input.description.clone()),
                )
                .col_expr(
                    transactions::Column::CorrelationId,
                    Expr::value(input.correlation_id.clone()),
                )
                .col_expr(
                    transactions::Column::LockVersion,
                    Expr::value(current.lock_version + 1),
                )
                .col_expr(transactions::Column::UpdatedAt, Expr::value(now))
                .filter(transactions::Column::Id.eq(transaction_id.into_inner()))
                .filter(transactions::Column::CompanyId.eq(company_id.into_inner()))
                .filter(transactions::Column::LockVersion.eq(current.lock_version))
                .filter(transactions::Column::Status.eq(status_to_db(TransactionStatus::Draft)))
                .exec(&txn)
                .await
                .map_err(storage)?;

            if result.rows_affected == 0 {
                txn.rollback().await.map_err(storage)?;
                let latest = find_scoped(&self.db, company_id, transaction_id).await?;
                // Still a draft means a concurrent edit won; go again
                // against the fresh version. A status change errors out.
                lost_swap_outcome(
                    status_from_db(&latest.status),
                    TransactionStatus::Draft,
                    LedgerError::InvalidStateForEdit,
                )?;
                continue;
            }

            ledger_lines::Entity::delete_many()
                .filter(ledger_lines::Column::TransactionId.eq(transaction_id.into_inner()))
                .exec(&txn)
                .await
                .map_err(storage)?;

            let lines = insert_lines(&txn, transaction_id, company_id, &input.lines).await?;
            txn.commit().await.map_err(storage)?;

            let transaction = find_scoped(&self.db, company_id, transaction_id).await?;
            return Ok(TransactionWithLines { transaction, lines });
        }

        Err(LedgerError::Storage(format!(
            "transaction {transaction_id} kept changing concurrently"
        )))
    }

    /// Deletes a draft transaction and its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction is missing in this company,
    /// `InvalidStateForDelete` unless it is a draft, or `Storage`.
    pub async fn delete(
        &self,
        company_id: CompanyId,
        transaction_id: TransactionId,
    ) -> Result<(), LedgerError> {
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let current = find_scoped(&self.db, company_id, transaction_id).await?;
            LifecycleService::guard_delete(status_from_db(&current.status))?;

            let txn = self.db.begin().await.map_err(storage)?;

            ledger_lines::Entity::delete_many()
                .filter(ledger_lines::Column::TransactionId.eq(transaction_id.into_inner()))
                .exec(&txn)
                .await
                .map_err(storage)?;

            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(transaction_id.into_inner()))
                .filter(transactions::Column::CompanyId.eq(company_id.into_inner()))
                .filter(transactions::Column::LockVersion.eq(current.lock_version))
                .filter(transactions::Column::Status.eq(status_to_db(TransactionStatus::Draft)))
                .exec(&txn)
                .await
                .map_err(storage)?;

            if result.rows_affected == 0 {
                txn.rollback().await.map_err(storage)?;
                let latest = find_scoped(&self.db, company_id, transaction_id).await?;
                lost_swap_outcome(
                    status_from_db(&latest.status),
                    TransactionStatus::Draft,
                    LedgerError::InvalidStateForDelete,
                )?;
                continue;
            }

            txn.commit().await.map_err(storage)?;
            return Ok(());
        }

        Err(LedgerError::Storage(format!(
            "transaction {transaction_id} kept changing concurrently"
        )))
    }
}

/// Shape check for draft writes, which skip full validation.
///
/// Drafts may be unbalanced and reference unresolved accounts, but a
/// negative amount is malformed caller input at any stage and must not
/// reach storage only to bounce off a CHECK constraint.
pub(crate) fn ensure_non_negative(lines: &[LineInput]) -> Result<(), LedgerError> {
    for (index, line) in lines.iter().enumerate() {
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::MalformedLine(index));
        }
    }
    Ok(())
}

/// Finds a transaction by id within a company, or `NotFound`.
pub(crate) async fn find_scoped<C: sea_orm::ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
    transaction_id: TransactionId,
) -> Result<transactions::Model, LedgerError> {
    transactions::Entity::find_by_id(transaction_id.into_inner())
        .filter(transactions::Column::CompanyId.eq(company_id.into_inner()))
        .one(conn)
        .await
        .map_err(storage)?
        .ok_or(LedgerError::NotFound(transaction_id.into_inner()))
}

/// Loads the lines of a transaction in insertion order.
pub(crate) async fn lines_of<C: sea_orm::ConnectionTrait>(
    conn: &C,
    transaction_id: TransactionId,
) -> Result<Vec<ledger_lines::Model>, LedgerError> {
    ledger_lines::Entity::find()
        .filter(ledger_lines::Column::TransactionId.eq(transaction_id.into_inner()))
        .order_by_asc(ledger_lines::Column::CreatedAt)
        .order_by_asc(ledger_lines::Column::Id)
        .all(conn)
        .await
        .map_err(storage)
}

/// Inserts a transaction header row.
pub(crate) async fn insert_header(
    txn: &DatabaseTransaction,
    header: &TransactionHeader,
    status: TransactionStatus,
    reverses_transaction_id: Option<TransactionId>,
) -> Result<transactions::Model, LedgerError> {
    let now = Utc::now().into();
    let posted_at = if status == TransactionStatus::Posted {
        Some(now)
    } else {
        None
    };

    let model = transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        company_id: Set(header.company_id.into_inner()),
        module: Set(module_to_db(header.module)),
        business_date: Set(header.business_date),
        description: Set(header.description.clone()),
        correlation_id: Set(header.correlation_id.clone()),
        status: Set(status_to_db(status)),
        lock_version: Set(0),
        reverses_transaction_id: Set(reverses_transaction_id.map(TransactionId::into_inner)),
        reversed_by_transaction_id: Set(None),
        posted_at: Set(posted_at),
        created_at: Set(now),
        updated_at: Set(now),
    };

    model.insert(txn).await.map_err(storage)
}

/// Inserts the line rows of a transaction.
pub(crate) async fn insert_lines(
    txn: &DatabaseTransaction,
    transaction_id: TransactionId,
    company_id: CompanyId,
    lines: &[LineInput],
) -> Result<Vec<ledger_lines::Model>, LedgerError> {
    let now = Utc::now().into();
    let mut result = Vec::with_capacity(lines.len());

    for line in lines {
        let (debit, credit) = line.amounts();
        let model = ledger_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            transaction_id: Set(transaction_id.into_inner()),
            company_id: Set(company_id.into_inner()),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(debit),
            credit: Set(credit),
            description: Set(line.description.clone()),
            correlation_id: Set(line.correlation_id.clone()),
            created_at: Set(now),
        };
        result.push(model.insert(txn).await.map_err(storage)?);
    }

    Ok(result)
}
