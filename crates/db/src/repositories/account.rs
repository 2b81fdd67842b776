//! Account repository for chart-of-accounts lookups.
//!
//! The validator never talks to the database; this repository loads the
//! account rows a line set references and hands them over as
//! [`AccountRef`]s. Tenancy and postability judgments stay in the
//! validator so one code path decides them everywhere.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};

use contar_core::ledger::{AccountRef, LedgerError, LineInput};
use contar_shared::{AccountId, CompanyId};

use crate::entities::chart_of_accounts;

use super::storage;

/// Loads account references for every distinct account a line set touches.
///
/// Rows are fetched by id without a company predicate on purpose: the
/// validator compares ownership itself, so a foreign account fails as
/// `InvalidAccount` exactly like a missing one. Inactive accounts are
/// treated as non-postable.
pub(crate) async fn load_account_refs<C: ConnectionTrait>(
    conn: &C,
    lines: &[LineInput],
) -> Result<HashMap<AccountId, AccountRef>, LedgerError> {
    let ids: Vec<_> = lines
        .iter()
        .map(|line| line.account_id.into_inner())
        .collect();

    let rows = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(storage)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = AccountId::from_uuid(row.id);
            (
                id,
                AccountRef {
                    id,
                    company_id: CompanyId::from_uuid(row.company_id),
                    is_postable: row.is_postable && row.is_active,
                },
            )
        })
        .collect())
}

/// Account repository for company-scoped account checks.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks that an account exists and belongs to the given company.
    ///
    /// Used by the query surface before listing lines by account, where
    /// a cross-tenant account must fail loudly instead of returning an
    /// empty result.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no account with this id exists.
    /// - `TenantMismatch` if the account belongs to another company.
    /// - `Storage` if the query fails.
    pub async fn ensure_company_account(
        &self,
        company_id: CompanyId,
        account_id: AccountId,
    ) -> Result<(), LedgerError> {
        let row = chart_of_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound(account_id.into_inner()))?;

        if row.company_id != company_id.into_inner() {
            return Err(LedgerError::TenantMismatch);
        }

        Ok(())
    }
}
