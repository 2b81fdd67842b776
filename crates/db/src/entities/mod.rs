//! `SeaORM` entity definitions.

pub mod chart_of_accounts;
pub mod companies;
pub mod ledger_lines;
pub mod sea_orm_active_enums;
pub mod transactions;
