use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    auth_middleware::LoggedInUser,
    error::ApiError,
    services::{self, transactions::Overview},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/transactions/overview",
    operation_id = "transactions/overview",
    responses(
        (status = 200, body = Overview),
        (status = 401)
    )
)]
pub async fn overview(
    State(state): State<AppState>,
    user: LoggedInUser,
) -> Result<impl IntoResponse, ApiError> {
    let overview = services::transactions::overview(&state.data, &user.id).await?;

    Ok(Json(overview))
}
