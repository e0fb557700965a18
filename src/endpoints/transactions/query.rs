use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    auth_middleware::LoggedInUser, data::Transaction, error::ApiError, services, state::AppState,
};

#[utoipa::path(
    get,
    path = "/transactions",
    operation_id = "transactions/query",
    responses(
        (status = 200, body = Vec<Transaction>),
        (status = 401)
    )
)]
pub async fn query(
    State(state): State<AppState>,
    user: LoggedInUser,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = services::transactions::list(&state.data, &user.id).await?;

    Ok(Json(transactions))
}
