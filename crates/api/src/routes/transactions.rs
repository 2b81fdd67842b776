//! Transaction lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use contar_core::ledger::{
    EntrySide, LedgerError, LineInput, SourceModule, TransactionHeader,
};
use contar_core::lifecycle::TransactionStatus;
use contar_db::entities::{ledger_lines, transactions};
use contar_db::repositories::{
    CreateTransactionInput, LifecycleRepository, TransactionFilter, TransactionRepository,
    TransactionWithLines, UpdateTransactionInput,
};
use contar_shared::{AccountId, CompanyId, TransactionId};

use crate::AppState;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/transactions", get(list_transactions))
        .route("/companies/{company_id}/transactions", post(create_transaction))
        .route(
            "/companies/{company_id}/transactions/{transaction_id}",
            get(get_transaction),
        )
        .route(
            "/companies/{company_id}/transactions/{transaction_id}",
            put(update_transaction),
        )
        .route(
            "/companies/{company_id}/transactions/{transaction_id}",
            delete(delete_transaction),
        )
        .route(
            "/companies/{company_id}/transactions/{transaction_id}/apply",
            post(apply_transaction),
        )
        .route(
            "/companies/{company_id}/transactions/{transaction_id}/annul",
            post(annul_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by originating module.
    pub module: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Filter by correlation reference.
    pub correlation_id: Option<String>,
}

/// Request body for a single line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account ID.
    pub account_id: Uuid,
    /// Amount as a decimal string.
    pub amount: String,
    /// Line side: "debit" or "credit".
    pub side: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional reference to the originating document.
    pub correlation_id: Option<String>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Originating module tag.
    pub module: String,
    /// Business date (YYYY-MM-DD).
    pub business_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional reference to the originating document.
    pub correlation_id: Option<String>,
    /// Whether to post in the same step instead of leaving a draft.
    #[serde(default)]
    pub post_immediately: bool,
    /// Ledger lines.
    pub lines: Vec<LineRequest>,
}

/// Request body for replacing a draft transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Business date (YYYY-MM-DD).
    pub business_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional reference to the originating document.
    pub correlation_id: Option<String>,
    /// Replacement line set.
    pub lines: Vec<LineRequest>,
}

/// Response for a single line.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Account ID.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: String,
    /// Credit amount.
    pub credit: String,
    /// Description.
    pub description: Option<String>,
    /// Correlation reference.
    pub correlation_id: Option<String>,
}

/// Response for a transaction with its lines.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Company ID.
    pub company_id: Uuid,
    /// Originating module tag.
    pub module: String,
    /// Business date.
    pub business_date: String,
    /// Description.
    pub description: String,
    /// Correlation reference.
    pub correlation_id: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Original transaction this one compensates, if any.
    pub reverses_transaction_id: Option<Uuid>,
    /// Compensating transaction that annulled this one, if any.
    pub reversed_by_transaction_id: Option<Uuid>,
    /// When the transaction was posted.
    pub posted_at: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
    /// Ledger lines.
    pub lines: Vec<LineResponse>,
    /// Total debits.
    pub total_debit: String,
    /// Total credits.
    pub total_credit: String,
}

/// Response for a transaction list item (without lines).
#[derive(Debug, Serialize)]
pub struct TransactionListItem {
    /// Transaction ID.
    pub id: Uuid,
    /// Originating module tag.
    pub module: String,
    /// Business date.
    pub business_date: String,
    /// Description.
    pub description: String,
    /// Correlation reference.
    pub correlation_id: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
}

// ============================================================================
// Mapping helpers
// ============================================================================

/// Maps a ledger error to its HTTP response, logging server faults.
pub(crate) fn error_response(err: &LedgerError) -> Response {
    if err.is_retryable() {
        error!(error = %err, "Storage failure");
    } else {
        info!(error = %err, code = err.error_code(), "Request rejected");
    }

    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

fn bad_request(code: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Parses request lines into validator inputs.
fn parse_lines(lines: &[LineRequest]) -> Result<Vec<LineInput>, Response> {
    lines
        .iter()
        .map(|line| {
            let amount = Decimal::from_str(&line.amount)
                .map_err(|_| bad_request("INVALID_AMOUNT", "Amount is not a valid decimal"))?;
            let side = match line.side.to_lowercase().as_str() {
                "debit" => EntrySide::Debit,
                "credit" => EntrySide::Credit,
                _ => return Err(bad_request("INVALID_SIDE", "Side must be debit or credit")),
            };
            Ok(LineInput {
                account_id: AccountId::from_uuid(line.account_id),
                amount,
                side,
                description: line.description.clone(),
                correlation_id: line.correlation_id.clone(),
            })
        })
        .collect()
}

fn line_response(line: &ledger_lines::Model) -> LineResponse {
    LineResponse {
        id: line.id,
        account_id: line.account_id,
        debit: line.debit.to_string(),
        credit: line.credit.to_string(),
        description: line.description.clone(),
        correlation_id: line.correlation_id.clone(),
    }
}

fn list_item(transaction: &transactions::Model) -> TransactionListItem {
    TransactionListItem {
        id: transaction.id,
        module: module_tag(&transaction.module),
        business_date: transaction.business_date.to_string(),
        description: transaction.description.clone(),
        correlation_id: transaction.correlation_id.clone(),
        status: status_tag(&transaction.status),
        created_at: transaction.created_at.to_rfc3339(),
    }
}

pub(crate) fn transaction_response(result: &TransactionWithLines) -> TransactionResponse {
    let transaction = &result.transaction;
    let (total_debit, total_credit) = result.lines.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debit, credit), line| (debit + line.debit, credit + line.credit),
    );

    TransactionResponse {
        id: transaction.id,
        company_id: transaction.company_id,
        module: module_tag(&transaction.module),
        business_date: transaction.business_date.to_string(),
        description: transaction.description.clone(),
        correlation_id: transaction.correlation_id.clone(),
        status: status_tag(&transaction.status),
        reverses_transaction_id: transaction.reverses_transaction_id,
        reversed_by_transaction_id: transaction.reversed_by_transaction_id,
        posted_at: transaction.posted_at.map(|at| at.to_rfc3339()),
        created_at: transaction.created_at.to_rfc3339(),
        updated_at: transaction.updated_at.to_rfc3339(),
        lines: result.lines.iter().map(line_response).collect(),
        total_debit: total_debit.to_string(),
        total_credit: total_credit.to_string(),
    }
}

fn module_tag(module: &contar_db::entities::sea_orm_active_enums::SourceModule) -> String {
    use contar_db::entities::sea_orm_active_enums::SourceModule as Db;
    match module {
        Db::Manual => SourceModule::Manual,
        Db::Ventas => SourceModule::Ventas,
        Db::Compras => SourceModule::Compras,
        Db::Bancos => SourceModule::Bancos,
        Db::Cxc => SourceModule::Cxc,
        Db::Cxp => SourceModule::Cxp,
    }
    .as_str()
    .to_string()
}

fn status_tag(status: &contar_db::entities::sea_orm_active_enums::TransactionStatus) -> String {
    use contar_db::entities::sea_orm_active_enums::TransactionStatus as Db;
    match status {
        Db::Draft => TransactionStatus::Draft,
        Db::Posted => TransactionStatus::Posted,
        Db::Reversed => TransactionStatus::Reversed,
    }
    .as_str()
    .to_string()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/companies/{company_id}/transactions` - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let Some(module) = SourceModule::parse(&payload.module) else {
        return bad_request("INVALID_MODULE", "Unknown source module");
    };

    let lines = match parse_lines(&payload.lines) {
        Ok(lines) => lines,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        header: TransactionHeader {
            company_id: CompanyId::from_uuid(company_id),
            business_date: payload.business_date,
            description: payload.description,
            module,
            correlation_id: payload.correlation_id,
        },
        lines,
        post_immediately: payload.post_immediately,
    };

    match repo.create(input).await {
        Ok(result) => {
            info!(
                company_id = %company_id,
                transaction_id = %result.transaction.id,
                status = %status_tag(&result.transaction.status),
                "Transaction created"
            );
            (StatusCode::CREATED, Json(transaction_response(&result))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/companies/{company_id}/transactions` - List transactions.
async fn list_transactions(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if let Some(status) = &query.status {
        if TransactionStatus::parse(status).is_none() {
            return bad_request("INVALID_STATUS", "Unknown transaction status");
        }
    }
    if let Some(module) = &query.module {
        if SourceModule::parse(module).is_none() {
            return bad_request("INVALID_MODULE", "Unknown source module");
        }
    }

    let filter = TransactionFilter {
        status: query.status.as_deref().and_then(TransactionStatus::parse),
        module: query.module.as_deref().and_then(SourceModule::parse),
        date_from: query.from,
        date_to: query.to,
        correlation_id: query.correlation_id,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list(CompanyId::from_uuid(company_id), filter).await {
        Ok(transactions) => {
            let items: Vec<TransactionListItem> = transactions.iter().map(list_item).collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/companies/{company_id}/transactions/{transaction_id}` - Get one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path((company_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo
        .get(
            CompanyId::from_uuid(company_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await
    {
        Ok(result) => (StatusCode::OK, Json(transaction_response(&result))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/companies/{company_id}/transactions/{transaction_id}` - Replace a draft.
async fn update_transaction(
    State(state): State<AppState>,
    Path((company_id, transaction_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let lines = match parse_lines(&payload.lines) {
        Ok(lines) => lines,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        business_date: payload.business_date,
        description: payload.description,
        correlation_id: payload.correlation_id,
        lines,
    };

    match repo
        .update(
            CompanyId::from_uuid(company_id),
            TransactionId::from_uuid(transaction_id),
            input,
        )
        .await
    {
        Ok(result) => {
            info!(
                company_id = %company_id,
                transaction_id = %transaction_id,
                "Transaction updated"
            );
            (StatusCode::OK, Json(transaction_response(&result))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/companies/{company_id}/transactions/{transaction_id}` - Delete a draft.
async fn delete_transaction(
    State(state): State<AppState>,
    Path((company_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo
        .delete(
            CompanyId::from_uuid(company_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await
    {
        Ok(()) => {
            info!(
                company_id = %company_id,
                transaction_id = %transaction_id,
                "Transaction deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/companies/{company_id}/transactions/{transaction_id}/apply` - Post a draft.
async fn apply_transaction(
    State(state): State<AppState>,
    Path((company_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = LifecycleRepository::new((*state.db).clone());
    match repo
        .apply(
            CompanyId::from_uuid(company_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await
    {
        Ok(result) => {
            info!(
                company_id = %company_id,
                transaction_id = %transaction_id,
                "Transaction applied"
            );
            (StatusCode::OK, Json(transaction_response(&result))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/companies/{company_id}/transactions/{transaction_id}/annul` - Reverse a posted transaction.
async fn annul_transaction(
    State(state): State<AppState>,
    Path((company_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = LifecycleRepository::new((*state.db).clone());
    match repo
        .annul(
            CompanyId::from_uuid(company_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await
    {
        Ok(result) => {
            info!(
                company_id = %company_id,
                transaction_id = %transaction_id,
                compensating_id = %result.compensating.transaction.id,
                "Transaction annulled"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "original": transaction_response(&result.original),
                    "compensating": transaction_response(&result.compensating),
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_accepts_decimal_strings() {
        let request = vec![LineRequest {
            account_id: Uuid::now_v7(),
            amount: "100.50".to_string(),
            side: "debit".to_string(),
            description: None,
            correlation_id: None,
        }];
        let lines = parse_lines(&request).unwrap();
        assert_eq!(lines[0].amount, Decimal::from_str("100.50").unwrap());
        assert_eq!(lines[0].side, EntrySide::Debit);
    }

    #[test]
    fn test_parse_lines_rejects_bad_amount() {
        let request = vec![LineRequest {
            account_id: Uuid::now_v7(),
            amount: "not-a-number".to_string(),
            side: "debit".to_string(),
            description: None,
            correlation_id: None,
        }];
        assert!(parse_lines(&request).is_err());
    }

    #[test]
    fn test_parse_lines_rejects_bad_side() {
        let request = vec![LineRequest {
            account_id: Uuid::now_v7(),
            amount: "1.00".to_string(),
            side: "sideways".to_string(),
            description: None,
            correlation_id: None,
        }];
        assert!(parse_lines(&request).is_err());
    }

    #[test]
    fn test_parse_lines_side_is_case_insensitive() {
        let request = vec![LineRequest {
            account_id: Uuid::now_v7(),
            amount: "1.00".to_string(),
            side: "CREDIT".to_string(),
            description: None,
            correlation_id: None,
        }];
        let lines = parse_lines(&request).unwrap();
        assert_eq!(lines[0].side, EntrySide::Credit);
    }
}
