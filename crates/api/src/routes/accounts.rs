//! Account-scoped ledger query routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use contar_db::repositories::TransactionRepository;
use contar_shared::{AccountId, CompanyId};

use crate::AppState;
use crate::routes::transactions::error_response;

/// Creates the account query routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/accounts/{account_id}/lines",
        get(lines_by_account),
    )
}

/// Response for a line as seen from an account.
#[derive(Debug, Serialize)]
pub struct AccountLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// The transaction this line belongs to.
    pub transaction_id: Uuid,
    /// Debit amount.
    pub debit: String,
    /// Credit amount.
    pub credit: String,
    /// Description.
    pub description: Option<String>,
    /// Correlation reference.
    pub correlation_id: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

/// GET `/companies/{company_id}/accounts/{account_id}/lines` - Lines posted to an account.
async fn lines_by_account(
    State(state): State<AppState>,
    Path((company_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo
        .lines_by_account(
            CompanyId::from_uuid(company_id),
            AccountId::from_uuid(account_id),
        )
        .await
    {
        Ok(lines) => {
            let items: Vec<AccountLineResponse> = lines
                .iter()
                .map(|line| AccountLineResponse {
                    id: line.id,
                    transaction_id: line.transaction_id,
                    debit: line.debit.to_string(),
                    credit: line.credit.to_string(),
                    description: line.description.clone(),
                    correlation_id: line.correlation_id.clone(),
                    created_at: line.created_at.to_rfc3339(),
                })
                .collect();
            (StatusCode::OK, Json(json!({ "lines": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}
