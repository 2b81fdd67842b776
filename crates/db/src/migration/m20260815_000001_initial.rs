//! Initial database migration.
//!
//! Creates the enums, core tables, and indexes for the ledger engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(LEDGER_LINES_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Transaction lifecycle status
CREATE TYPE transaction_status AS ENUM (
    'draft',
    'posted',
    'reversed'
);

-- Originating module
CREATE TYPE source_module AS ENUM (
    'manual',
    'ventas',
    'compras',
    'bancos',
    'cxc',
    'cxp'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    is_postable BOOLEAN NOT NULL DEFAULT TRUE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    parent_id UUID REFERENCES chart_of_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_company_code UNIQUE (company_id, code)
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    module source_module NOT NULL,
    business_date DATE NOT NULL,
    description TEXT NOT NULL,
    correlation_id VARCHAR(255),
    status transaction_status NOT NULL DEFAULT 'draft',
    lock_version INTEGER NOT NULL DEFAULT 0,
    reverses_transaction_id UUID REFERENCES transactions(id),
    reversed_by_transaction_id UUID REFERENCES transactions(id),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGER_LINES_SQL: &str = r"
CREATE TABLE ledger_lines (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    company_id UUID NOT NULL REFERENCES companies(id),
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT,
    correlation_id VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_lines_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_lines_one_sided CHECK (debit = 0 OR credit = 0)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_transactions_company_date
    ON transactions(company_id, business_date);
CREATE INDEX idx_transactions_company_status
    ON transactions(company_id, status);
CREATE INDEX idx_transactions_correlation
    ON transactions(correlation_id)
    WHERE correlation_id IS NOT NULL;
CREATE INDEX idx_ledger_lines_transaction
    ON ledger_lines(transaction_id);
CREATE INDEX idx_ledger_lines_company_account
    ON ledger_lines(company_id, account_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_lines CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS source_module;
";
